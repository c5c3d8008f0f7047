// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `naming.rs`

use super::*;

#[test]
fn test_suffix_match_strips_suffix() {
    assert_eq!(service_short_name("cache-service"), Some("cache"));
    assert_eq!(service_short_name("web-service"), Some("web"));
    assert_eq!(service_short_name("billing-api-service"), Some("billing-api"));
}

#[test]
fn test_non_matching_names_are_ignored() {
    assert_eq!(service_short_name("worker-batch"), None);
    assert_eq!(service_short_name("cache"), None);
    assert_eq!(service_short_name("service-worker"), None);
    assert_eq!(service_short_name(""), None);
}

#[test]
fn test_suffix_must_be_at_the_end() {
    // Contains the suffix text but does not end with it
    assert_eq!(service_short_name("cache-service-v2"), None);
}

#[test]
fn test_bare_suffix_does_not_match() {
    // A bare "-service" would publish an empty record name
    assert_eq!(service_short_name("-service"), None);
}

#[test]
fn test_short_name_plus_suffix_reconstructs_original() {
    for family in ["cache-service", "web-service", "a-service", "x-y-z-service"] {
        let short = service_short_name(family).expect("family follows the convention");
        assert_eq!(format!("{short}{}", SERVICE_NAME_SUFFIX), family);
    }
}

#[test]
fn test_match_is_exactly_suffix_driven() {
    // Matching iff the name ends with the suffix and a name remains
    for (family, expected) in [
        ("cache-service", true),
        ("worker-batch", false),
        ("-service", false),
        ("my-service", true),
    ] {
        assert_eq!(service_short_name(family).is_some(), expected, "{family}");
    }
}
