// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resolution of a service family to a running instance's network location.
//!
//! A matched family is resolved through three sequential lookups, each
//! depending on the prior result: the running task, the host (container
//! instance) it is scheduled on, and the compute instance backing that host.
//! The primary network interface of the compute instance carries the
//! private address published for the service.

use crate::errors::ResolveError;
use crate::providers::{ComputeApi, OrchestratorApi};
use std::net::Ipv4Addr;
use tracing::debug;

/// Network location of a running service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstance {
    /// Private IPv4 address of the primary network interface
    pub address: Ipv4Addr,
    /// Identifier of the network (VPC) the instance runs in
    pub network_id: String,
}

/// Resolve a service family to the address of a currently running instance.
///
/// Returns `Ok(None)` when the family has no running task; a defined but
/// not-running service is a normal, common state and not an error. When
/// multiple tasks are running for the family, the first in API response
/// order is taken; this system publishes a single address per service and
/// does not balance across instances.
///
/// # Errors
///
/// Any lookup in the chain failing for a presumed-running service surfaces
/// as a [`ResolveError`] naming the broken stage, distinguishable from the
/// not-running case.
pub async fn resolve_family(
    orchestrator: &dyn OrchestratorApi,
    compute: &dyn ComputeApi,
    cluster: &str,
    family: &str,
) -> Result<Option<ResolvedInstance>, ResolveError> {
    let task_ids = orchestrator
        .list_running_tasks(cluster, family)
        .await
        .map_err(|source| ResolveError::TaskListing {
            family: family.to_string(),
            source,
        })?;

    let Some(task_id) = task_ids.first() else {
        return Ok(None);
    };

    if task_ids.len() > 1 {
        debug!(
            family = %family,
            running = task_ids.len(),
            task_id = %task_id,
            "multiple running tasks, taking the first"
        );
    }

    let task = orchestrator
        .describe_task(cluster, task_id)
        .await
        .map_err(|source| ResolveError::TaskDescribe {
            family: family.to_string(),
            task_id: task_id.clone(),
            source,
        })?;

    let host = orchestrator
        .describe_host(cluster, &task.host_id)
        .await
        .map_err(|source| ResolveError::HostDescribe {
            family: family.to_string(),
            host_id: task.host_id.clone(),
            source,
        })?;

    let instance = compute
        .describe_instance(&host.instance_id)
        .await
        .map_err(|source| ResolveError::InstanceDescribe {
            family: family.to_string(),
            instance_id: host.instance_id.clone(),
            source,
        })?;

    let Some(interface) = instance.interfaces.first() else {
        return Err(ResolveError::MissingInterface {
            family: family.to_string(),
            instance_id: host.instance_id,
        });
    };

    debug!(
        family = %family,
        task_id = %task_id,
        host_id = %task.host_id,
        instance_id = %host.instance_id,
        address = %interface.private_address,
        "resolved running service instance"
    );

    Ok(Some(ResolvedInstance {
        address: interface.private_address,
        network_id: interface.network_id.clone(),
    }))
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
