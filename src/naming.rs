// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Naming convention matching for discoverable services.
//!
//! A service definition family opts into discovery purely by its name: any
//! family ending in `-service` is published under the name with the suffix
//! stripped (`cache-service` -> `cache`). Families that do not follow the
//! convention are ignored, so the convention must not be used for
//! definitions that are not services.

use crate::constants::SERVICE_NAME_SUFFIX;

/// Derive the published short name for a service definition family.
///
/// Returns `Some(short_name)` iff the family name ends with the convention
/// suffix and something is left once it is stripped; a bare `-service` would
/// yield an empty record owner name and does not match. There are no failure
/// modes: malformed names simply don't match.
///
/// # Example
///
/// ```rust
/// use svcdns::naming::service_short_name;
///
/// assert_eq!(service_short_name("cache-service"), Some("cache"));
/// assert_eq!(service_short_name("worker-batch"), None);
/// ```
#[must_use]
pub fn service_short_name(family: &str) -> Option<&str> {
    match family.strip_suffix(SERVICE_NAME_SUFFIX) {
        Some(short) if !short.is_empty() => Some(short),
        _ => None,
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod naming_tests;
