// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for svcdns.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Naming Convention Constants
// ============================================================================

/// Suffix marking a service definition family as discoverable.
///
/// A family named `cache-service` is published as `cache`; families without
/// the suffix are ignored entirely.
pub const SERVICE_NAME_SUFFIX: &str = "-service";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Record type written for every discovered service
pub const DNS_RECORD_TYPE_A: &str = "A";

/// Default TTL for published service records (seconds)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 20;

// ============================================================================
// Cluster Identity Constants
// ============================================================================

/// Environment variable naming the cluster to discover services in
pub const CLUSTER_ENV_VAR: &str = "SVCDNS_CLUSTER";

/// Path to the cluster agent's configuration file, consulted when the
/// environment variable is unset
pub const AGENT_CONFIG_PATH: &str = "/etc/cluster/agent.conf";

/// Key carrying the cluster name inside the agent configuration file
pub const AGENT_CONFIG_CLUSTER_KEY: &str = "CLUSTER";

/// Cluster name used when neither the environment nor the agent
/// configuration names one
pub const DEFAULT_CLUSTER: &str = "default";

// ============================================================================
// Endpoint Environment Variables
// ============================================================================

/// Environment variable for the orchestrator API base URL
pub const ORCHESTRATOR_URL_ENV_VAR: &str = "SVCDNS_ORCHESTRATOR_URL";

/// Environment variable for the compute metadata API base URL
pub const COMPUTE_URL_ENV_VAR: &str = "SVCDNS_COMPUTE_URL";

/// Environment variable for the DNS provider API base URL
pub const DNS_URL_ENV_VAR: &str = "SVCDNS_DNS_URL";

// ============================================================================
// HTTP Transport Constants
// ============================================================================

/// Per-request timeout for all provider API calls (seconds)
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Maximum retries after the first attempt of an idempotent call
pub const MAX_CALL_RETRIES: u32 = 2;

/// Initial retry interval (50ms)
pub const RETRY_INITIAL_INTERVAL_MILLIS: u64 = 50;

/// Maximum interval between retries (2 seconds)
pub const RETRY_MAX_INTERVAL_SECS: u64 = 2;

/// Backoff multiplier (exponential growth factor)
pub const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
pub const RANDOMIZATION_FACTOR: f64 = 0.1;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;
