// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of a discovery snapshot into the private zone.
//!
//! One A record is upserted per discovered service, named
//! `{short_name}.{zone_name}` and pointing at the instance's private
//! address. The upsert is create-if-absent, overwrite-if-present, so
//! applying the same snapshot twice leaves the zone in the same state as
//! applying it once.
//!
//! A failed upsert never blocks the rest of the batch: outcomes are
//! collected per service into a [`RunReport`].

use crate::constants::DNS_RECORD_TYPE_A;
use crate::discovery::Snapshot;
use crate::errors::ApiError;
use crate::providers::{DnsApi, RecordChange};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// A record successfully written for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRecord {
    /// Published short name of the service
    pub name: String,
    /// Fully-qualified record name
    pub fqdn: String,
    /// Address the record points at
    pub address: Ipv4Addr,
    /// Change id returned by the DNS provider
    pub change_id: String,
}

/// A failed upsert, recorded without aborting the batch.
#[derive(Debug, Clone)]
pub struct FailedUpsert {
    /// Published short name of the service
    pub name: String,
    /// Fully-qualified record name the upsert targeted
    pub fqdn: String,
    /// What the provider returned
    pub error: ApiError,
}

/// Per-service outcomes of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Services whose records were written
    pub registered: Vec<RegisteredRecord>,
    /// Services skipped by the caller's filter
    pub skipped: Vec<String>,
    /// Services whose upsert failed
    pub failed: Vec<FailedUpsert>,
}

impl RunReport {
    /// True when any upsert failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registered {} record(s), skipped {}, failed {}",
            self.registered.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Upsert one A record per discovered service into the located zone.
///
/// When `filter` is non-empty, only services whose short name or family
/// appears in it are registered; the rest are reported as skipped. An empty
/// snapshot performs zero writes.
pub async fn register_services(
    dns: &dyn DnsApi,
    snapshot: &Snapshot,
    filter: &[String],
    ttl: u32,
) -> RunReport {
    let mut report = RunReport::default();

    let Some(network) = &snapshot.network else {
        // Nothing resolved this run; the snapshot invariant guarantees the
        // service list is empty too.
        debug!("no network context in snapshot, nothing to register");
        return report;
    };

    for service in &snapshot.services {
        if !filter.is_empty()
            && !filter
                .iter()
                .any(|wanted| *wanted == service.name || *wanted == service.family)
        {
            debug!(name = %service.name, "not in requested services, skipping");
            report.skipped.push(service.name.clone());
            continue;
        }

        let fqdn = format!("{}.{}", service.name, network.zone_name);
        let change = RecordChange {
            name: fqdn.clone(),
            record_type: DNS_RECORD_TYPE_A.to_string(),
            ttl,
            value: service.address.to_string(),
        };

        info!(fqdn = %fqdn, address = %service.address, "registering service record");

        match dns.upsert_record(&network.zone_id, &change).await {
            Ok(change_id) => {
                debug!(fqdn = %fqdn, change_id = %change_id, "record upsert accepted");
                report.registered.push(RegisteredRecord {
                    name: service.name.clone(),
                    fqdn,
                    address: service.address,
                    change_id,
                });
            }
            Err(error) => {
                warn!(
                    fqdn = %fqdn,
                    error = %error,
                    "record upsert failed, continuing with remaining services"
                );
                report.failed.push(FailedUpsert {
                    name: service.name.clone(),
                    fqdn,
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod reconciler_tests;
