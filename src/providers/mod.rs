// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Narrow interfaces to the external collaborators.
//!
//! The discovery pipeline consumes three remote services, each behind a small
//! async trait: the cluster orchestrator (definition and task listing), the
//! compute metadata service (instance detail), and the DNS provider (zones
//! and record upserts). The traits own the contract; [`http`] carries the
//! HTTP/JSON clients the binary wires in, and tests substitute in-memory
//! fakes.

pub mod http;

use crate::errors::ApiError;
use crate::pagination::Page;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Detail of a running task, as returned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    /// Identifier of the host (container instance) the task is scheduled on
    pub host_id: String,
}

/// Detail of a host (container instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDetail {
    /// Identifier of the compute instance backing the host
    pub instance_id: String,
}

/// One network interface of a compute instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Private IPv4 address of the interface
    pub private_address: Ipv4Addr,
    /// Identifier of the network (VPC) the interface is attached to
    pub network_id: String,
}

/// Detail of a compute instance.
///
/// The first interface is the primary one; an empty list means the instance
/// detail was malformed for discovery purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDetail {
    /// Network interfaces, primary first
    pub interfaces: Vec<NetworkInterface>,
}

/// Summary entry of the hosted zone listing.
///
/// The summary does not carry network associations; those require a
/// per-zone detail call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// Provider identifier of the zone
    pub zone_id: String,
    /// Domain suffix of the zone (e.g., "internal.")
    pub zone_name: String,
}

/// Association detail of a hosted zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDetail {
    /// Identifiers of the networks the zone is associated with
    pub associated_network_ids: Vec<String>,
}

/// A single record change submitted to the DNS provider.
///
/// Upsert semantics: create-if-absent, overwrite-if-present. Submitting the
/// same change twice produces no observable difference from submitting it
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    /// Fully-qualified record name
    pub name: String,
    /// Record type (always "A" for service discovery)
    pub record_type: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Record value (the service's private IPv4 address)
    pub value: String,
}

/// Cluster orchestration API: service definitions, tasks, and hosts.
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// List one page of service definition family names.
    ///
    /// Pass `None` for the first page and the returned continuation token
    /// for subsequent pages; the listing is complete when a page carries no
    /// token.
    async fn list_definition_families(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<String>, ApiError>;

    /// List identifiers of tasks currently running for a family in a cluster.
    async fn list_running_tasks(
        &self,
        cluster: &str,
        family: &str,
    ) -> Result<Vec<String>, ApiError>;

    /// Resolve the host a running task is scheduled on.
    async fn describe_task(&self, cluster: &str, task_id: &str) -> Result<TaskDetail, ApiError>;

    /// Resolve the compute instance backing a host.
    async fn describe_host(&self, cluster: &str, host_id: &str) -> Result<HostDetail, ApiError>;
}

/// Compute metadata API: instance detail.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Fetch the network interfaces of a compute instance.
    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiError>;
}

/// DNS provider API: hosted zones and record upserts.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// List all hosted zones visible to the account (summaries only).
    async fn list_zones(&self) -> Result<Vec<ZoneSummary>, ApiError>;

    /// Fetch the network associations of a zone.
    async fn get_zone_detail(&self, zone_id: &str) -> Result<ZoneDetail, ApiError>;

    /// Upsert a record into a zone, returning the provider's change id.
    async fn upsert_record(
        &self,
        zone_id: &str,
        change: &RecordChange,
    ) -> Result<String, ApiError>;
}
