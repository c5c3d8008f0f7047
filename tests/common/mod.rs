// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests
//!
//! Provides an in-memory stand-in for all three collaborators (orchestrator,
//! compute metadata, DNS provider) with an observable record store, so the
//! whole discover-and-register pipeline can be driven without a network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use svcdns::errors::ApiError;
use svcdns::pagination::Page;
use svcdns::providers::{
    ComputeApi, DnsApi, HostDetail, InstanceDetail, NetworkInterface, OrchestratorApi,
    RecordChange, TaskDetail, ZoneDetail, ZoneSummary,
};

fn not_found(endpoint: &str) -> ApiError {
    ApiError::UnexpectedResponse {
        endpoint: endpoint.to_string(),
        status_code: 404,
        reason: "not found".to_string(),
    }
}

/// In-memory cluster plus DNS provider.
#[derive(Default)]
pub struct TestWorld {
    pub families: Vec<String>,
    pub page_size: usize,
    /// family -> running task ids
    pub running: HashMap<String, Vec<String>>,
    /// task id -> host id
    pub task_hosts: HashMap<String, String>,
    /// host id -> compute instance id
    pub host_instances: HashMap<String, String>,
    /// compute instance id -> detail
    pub instances: HashMap<String, InstanceDetail>,
    /// zone summaries with their association details
    pub zones: Vec<(ZoneSummary, ZoneDetail)>,
    /// zone id -> record name -> last applied change
    pub records: Mutex<HashMap<String, HashMap<String, RecordChange>>>,
}

impl TestWorld {
    /// A world with one zone for `network_id` and no services yet.
    pub fn with_zone(zone_id: &str, zone_name: &str, network_id: &str) -> Self {
        Self {
            zones: vec![(
                ZoneSummary {
                    zone_id: zone_id.to_string(),
                    zone_name: zone_name.to_string(),
                },
                ZoneDetail {
                    associated_network_ids: vec![network_id.to_string()],
                },
            )],
            ..Default::default()
        }
    }

    /// Define a family without any running task.
    pub fn add_family(&mut self, family: &str) {
        self.families.push(family.to_string());
    }

    /// Define a family with one running task resolving to `address` in `network_id`.
    pub fn add_running_service(&mut self, family: &str, address: &str, network_id: &str) {
        let task_id = format!("task-{family}");
        let host_id = format!("host-{family}");
        let instance_id = format!("i-{family}");

        self.families.push(family.to_string());
        self.running.insert(family.to_string(), vec![task_id.clone()]);
        self.task_hosts.insert(task_id, host_id.clone());
        self.host_instances.insert(host_id, instance_id.clone());
        self.instances.insert(
            instance_id,
            InstanceDetail {
                interfaces: vec![NetworkInterface {
                    private_address: address.parse().unwrap(),
                    network_id: network_id.to_string(),
                }],
            },
        );
    }

    /// Snapshot of the record store for one zone.
    pub fn zone_records(&self, zone_id: &str) -> HashMap<String, RecordChange> {
        self.records
            .lock()
            .unwrap()
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl OrchestratorApi for TestWorld {
    async fn list_definition_families(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<String>, ApiError> {
        let start: usize = next_token.map_or(0, |t| t.parse().unwrap());
        let page_size = if self.page_size == 0 {
            self.families.len().max(1)
        } else {
            self.page_size
        };
        let end = (start + page_size).min(self.families.len());

        Ok(Page {
            items: self.families[start..end].to_vec(),
            next_token: (end < self.families.len()).then(|| end.to_string()),
        })
    }

    async fn list_running_tasks(
        &self,
        _cluster: &str,
        family: &str,
    ) -> Result<Vec<String>, ApiError> {
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

#[async_trait]
impl ComputeApi for TestWorld {
    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiError> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| not_found(instance_id))
    }
}

#[async_trait]
impl DnsApi for TestWorld {
    async fn list_zones(&self) -> Result<Vec<ZoneSummary>, ApiError> {
        Ok(self.zones.iter().map(|(summary, _)| summary.clone()).collect())
    }

    async fn get_zone_detail(&self, zone_id: &str) -> Result<ZoneDetail, ApiError> {
        self.zones
            .iter()
            .find(|(summary, _)| summary.zone_id == zone_id)
            .map(|(_, detail)| detail.clone())
            .ok_or_else(|| not_found(zone_id))
    }

    async fn upsert_record(
        &self,
        zone_id: &str,
        change: &RecordChange,
    ) -> Result<String, ApiError> {
        self.records
            .lock()
            .unwrap()
            .entry(zone_id.to_string())
            .or_default()
            .insert(change.name.clone(), change.clone());
        Ok(format!("change-{}", change.name))
    }
}
