// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Discovery of running services across the cluster.
//!
//! The aggregator drives one stateless pass: enumerate every service
//! definition family, match each against the naming convention, resolve
//! matches to a running instance's address, and locate the private zone for
//! the cluster's network on the first successful resolution. The result is a
//! [`Snapshot`] handed to the reconciler.
//!
//! One broken service must not block discovery of the others: per-family
//! resolution failures are collected into the snapshot, while a failed
//! definition listing or zone lookup aborts the run.

use crate::errors::{DiscoveryError, ResolveError};
use crate::naming::service_short_name;
use crate::pagination::collect_paginated;
use crate::providers::{ComputeApi, DnsApi, OrchestratorApi};
use crate::resolver::resolve_family;
use crate::zone::locate_zone;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A discoverable service resolved to a running instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredService {
    /// Published short name (family with the convention suffix stripped)
    pub name: String,
    /// Original service definition family
    pub family: String,
    /// Private IPv4 address of the running instance
    pub address: Ipv4Addr,
}

/// The network a discovery run resolved against.
///
/// Resolved at most once per run: all discovered services share exactly one
/// network context, and one private zone per network is assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    /// Identifier of the network (VPC) the cluster runs in
    pub network_id: String,
    /// Provider identifier of the resolved zone
    pub zone_id: String,
    /// Domain suffix of the resolved zone
    pub zone_name: String,
}

/// A per-family resolution failure recorded during a run.
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    /// The family that matched the convention but failed to resolve
    pub family: String,
    /// What broke along the resolution chain
    pub error: ResolveError,
}

/// The unit of work handed from discovery to the reconciler.
///
/// Invariant: `network` is fully resolved whenever `services` is non-empty.
/// The zone is located on the first successful resolution and zone-location
/// failure aborts the run, so a service is never recorded without a zone.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Services resolved to a running instance, in enumeration order
    pub services: Vec<DiscoveredService>,
    /// Network context, present once any service resolved
    pub network: Option<NetworkContext>,
    /// Families that matched the convention but failed to resolve
    pub failures: Vec<ResolutionFailure>,
}

/// Drives one discovery pass over the cluster.
///
/// Holds the collaborator handles and the cluster identity; retains no state
/// across [`discover`](Discoverer::discover) calls. Running discovery twice
/// against unchanged cluster state yields an identical snapshot.
pub struct Discoverer {
    orchestrator: Arc<dyn OrchestratorApi>,
    compute: Arc<dyn ComputeApi>,
    dns: Arc<dyn DnsApi>,
    cluster: String,
}

impl Discoverer {
    /// Create a discoverer for the given cluster.
    pub fn new(
        orchestrator: Arc<dyn OrchestratorApi>,
        compute: Arc<dyn ComputeApi>,
        dns: Arc<dyn DnsApi>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            compute,
            dns,
            cluster: cluster.into(),
        }
    }

    /// Run one discovery pass and assemble a snapshot.
    ///
    /// Families not matching the naming convention are skipped silently;
    /// matched families with no running task are skipped and logged; matched
    /// families whose resolution chain breaks are recorded in
    /// [`Snapshot::failures`] and do not stop the pass.
    ///
    /// # Errors
    ///
    /// Fails only when the definition listing is unreachable or when the
    /// private zone for the cluster's network cannot be located.
    pub async fn discover(&self) -> Result<Snapshot, DiscoveryError> {
        let orchestrator = self.orchestrator.as_ref();
        let families = collect_paginated(|token| async move {
            orchestrator
                .list_definition_families(token.as_deref())
                .await
        })
        .await
        .map_err(|source| DiscoveryError::Listing { source })?;

        info!(
            cluster = %self.cluster,
            families = families.len(),
            "enumerated service definition families"
        );

        let mut snapshot = Snapshot::default();

        for family in families {
            let Some(short_name) = service_short_name(&family) else {
                debug!(family = %family, "found non-service definition, skipping");
                continue;
            };

            info!(family = %family, name = %short_name, "service definition found");

            match resolve_family(orchestrator, self.compute.as_ref(), &self.cluster, &family).await
            {
                Ok(None) => {
                    info!(family = %family, "not running, skipping");
                }
                Ok(Some(instance)) => {
                    info!(family = %family, address = %instance.address, "running");

                    // The zone is shared by every service in the run; locate
                    // it once, on the first successfully resolved instance.
                    if snapshot.network.is_none() {
                        let zone = locate_zone(self.dns.as_ref(), &instance.network_id).await?;
                        info!(
                            network_id = %instance.network_id,
                            zone_id = %zone.zone_id,
                            zone_name = %zone.zone_name,
                            "located private zone for network"
                        );
                        snapshot.network = Some(NetworkContext {
                            network_id: instance.network_id.clone(),
                            zone_id: zone.zone_id,
                            zone_name: zone.zone_name,
                        });
                    }

                    snapshot.services.push(DiscoveredService {
                        name: short_name.to_string(),
                        family: family.clone(),
                        address: instance.address,
                    });
                }
                Err(error) => {
                    warn!(
                        family = %family,
                        error = %error,
                        "resolution failed, continuing with remaining families"
                    );
                    snapshot.failures.push(ResolutionFailure { family, error });
                }
            }
        }

        info!(
            discovered = snapshot.services.len(),
            failed = snapshot.failures.len(),
            "discovery pass complete"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod discovery_tests;
