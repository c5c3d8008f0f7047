// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `resolver.rs`

use super::*;
use crate::errors::ApiError;
use crate::pagination::Page;
use crate::providers::{
    ComputeApi, HostDetail, InstanceDetail, NetworkInterface, OrchestratorApi, TaskDetail,
};
use async_trait::async_trait;
use std::collections::HashMap;

fn not_found(endpoint: &str) -> ApiError {
    ApiError::UnexpectedResponse {
        endpoint: endpoint.to_string(),
        status_code: 404,
        reason: "not found".to_string(),
    }
}

#[derive(Default)]
struct FakeOrchestrator {
    /// family -> running task ids
    running: HashMap<String, Vec<String>>,
    /// task id -> host id
    task_hosts: HashMap<String, String>,
    /// host id -> compute instance id
    host_instances: HashMap<String, String>,
    /// family whose task listing call errors
    fail_task_listing_for: Option<String>,
}

#[async_trait]
impl OrchestratorApi for FakeOrchestrator {
    async fn list_definition_families(
        &self,
        _next_token: Option<&str>,
    ) -> Result<Page<String>, ApiError> {
        Ok(Page {
            items: vec![],
            next_token: None,
        })
    }

    async fn list_running_tasks(
        &self,
        _cluster: &str,
        family: &str,
    ) -> Result<Vec<String>, ApiError> {
        if self.fail_task_listing_for.as_deref() == Some(family) {
            return Err(ApiError::UnexpectedResponse {
                endpoint: family.to_string(),
                status_code: 500,
                reason: "boom".to_string(),
            });
        }
        Ok(self.running.get(family).cloned().unwrap_or_default())
    }

    async fn describe_task(&self, _cluster: &str, task_id: &str) -> Result<TaskDetail, ApiError> {
        self.task_hosts
            .get(task_id)
            .map(|host_id| TaskDetail {
                host_id: host_id.clone(),
            })
            .ok_or_else(|| not_found(task_id))
    }

    async fn describe_host(&self, _cluster: &str, host_id: &str) -> Result<HostDetail, ApiError> {
        self.host_instances
            .get(host_id)
            .map(|instance_id| HostDetail {
                instance_id: instance_id.clone(),
            })
            .ok_or_else(|| not_found(host_id))
    }
}

#[derive(Default)]
struct FakeCompute {
    instances: HashMap<String, InstanceDetail>,
}

#[async_trait]
impl ComputeApi for FakeCompute {
    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiError> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| not_found(instance_id))
    }
}

/// A cluster where cache-service runs on i-1 at 10.0.1.5 in vpc-123.
fn happy_cluster() -> (FakeOrchestrator, FakeCompute) {
    let orchestrator = FakeOrchestrator {
        running: HashMap::from([(
            "cache-service".to_string(),
            vec!["task-1".to_string()],
        )]),
        task_hosts: HashMap::from([("task-1".to_string(), "host-1".to_string())]),
        host_instances: HashMap::from([("host-1".to_string(), "i-1".to_string())]),
        ..Default::default()
    };
    let compute = FakeCompute {
        instances: HashMap::from([(
            "i-1".to_string(),
            InstanceDetail {
                interfaces: vec![NetworkInterface {
                    private_address: "10.0.1.5".parse().unwrap(),
                    network_id: "vpc-123".to_string(),
                }],
            },
        )]),
    };
    (orchestrator, compute)
}

#[tokio::test]
async fn test_not_running_is_none_not_an_error() {
    let (orchestrator, compute) = happy_cluster();

    let resolved = resolve_family(&orchestrator, &compute, "default", "web-service")
        .await
        .unwrap();

    assert_eq!(resolved, None);
}

#[tokio::test]
async fn test_resolves_through_the_full_chain() {
    let (orchestrator, compute) = happy_cluster();

    let resolved = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap()
        .expect("cache-service is running");

    assert_eq!(resolved.address, "10.0.1.5".parse::<Ipv4Addr>().unwrap());
    assert_eq!(resolved.network_id, "vpc-123");
}

#[tokio::test]
async fn test_first_running_task_is_taken() {
    let (mut orchestrator, compute) = happy_cluster();
    // A second task that would break the chain if it were followed
    orchestrator
        .running
        .get_mut("cache-service")
        .unwrap()
        .push("task-unmapped".to_string());

    let resolved = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap()
        .expect("cache-service is running");

    assert_eq!(resolved.address, "10.0.1.5".parse::<Ipv4Addr>().unwrap());
}

#[tokio::test]
async fn test_task_listing_failure_is_distinguishable_from_not_running() {
    let (mut orchestrator, compute) = happy_cluster();
    orchestrator.fail_task_listing_for = Some("cache-service".to_string());

    let err = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::TaskListing { .. }));
    assert_eq!(err.family(), "cache-service");
}

#[tokio::test]
async fn test_broken_task_link_names_the_stage() {
    let (mut orchestrator, compute) = happy_cluster();
    orchestrator.task_hosts.clear();

    let err = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::TaskDescribe { .. }));
}

#[tokio::test]
async fn test_broken_host_link_names_the_stage() {
    let (mut orchestrator, compute) = happy_cluster();
    orchestrator.host_instances.clear();

    let err = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::HostDescribe { .. }));
}

#[tokio::test]
async fn test_broken_instance_link_names_the_stage() {
    let (orchestrator, mut compute) = happy_cluster();
    compute.instances.clear();

    let err = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::InstanceDescribe { .. }));
}

#[tokio::test]
async fn test_instance_without_interfaces_is_a_resolution_failure() {
    let (orchestrator, mut compute) = happy_cluster();
    compute
        .instances
        .insert("i-1".to_string(), InstanceDetail { interfaces: vec![] });

    let err = resolve_family(&orchestrator, &compute, "default", "cache-service")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::MissingInterface { ref instance_id, .. } if instance_id == "i-1"
    ));
}
