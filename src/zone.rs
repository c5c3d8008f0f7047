// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Private zone lookup for a cluster network.
//!
//! The zone listing only carries summaries; network associations require a
//! per-zone detail call. The locator walks the listing, fetches each
//! candidate's detail, and returns the first zone associated with the given
//! network. A 1:1 network-to-zone relationship is assumed throughout.

use crate::errors::ZoneError;
use crate::providers::DnsApi;
use tracing::{debug, warn};

/// A private zone resolved for a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedZone {
    /// Provider identifier of the zone
    pub zone_id: String,
    /// Domain suffix of the zone (e.g., "internal.")
    pub zone_name: String,
}

/// Locate the private zone associated with a network.
///
/// Only the first associated network of each candidate zone is inspected
/// when testing for a match; zones associated with more than one network are
/// matched on their first association only, as the upstream provider API
/// exposed it. A warning is logged when a zone carries more than one
/// association so the ambiguity is visible.
///
/// # Errors
///
/// Returns [`ZoneError::NotFound`] when no zone is associated with the
/// network; the caller is expected to fail the whole run rather than
/// register services without a target zone. Listing or detail transport
/// failures surface as their own variants.
pub async fn locate_zone(dns: &dyn DnsApi, network_id: &str) -> Result<LocatedZone, ZoneError> {
    let zones = dns
        .list_zones()
        .await
        .map_err(|source| ZoneError::Listing { source })?;

    debug!(
        candidates = zones.len(),
        network_id = %network_id,
        "inspecting hosted zones for network association"
    );

    for zone in zones {
        let detail = dns
            .get_zone_detail(&zone.zone_id)
            .await
            .map_err(|source| ZoneError::Detail {
                zone_id: zone.zone_id.clone(),
                source,
            })?;

        if detail.associated_network_ids.len() > 1 {
            warn!(
                zone_id = %zone.zone_id,
                associations = detail.associated_network_ids.len(),
                "zone is associated with multiple networks, only the first is inspected"
            );
        }

        if detail.associated_network_ids.first().map(String::as_str) == Some(network_id) {
            return Ok(LocatedZone {
                zone_id: zone.zone_id,
                zone_name: zone.zone_name,
            });
        }
    }

    Err(ZoneError::NotFound {
        network_id: network_id.to_string(),
    })
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
