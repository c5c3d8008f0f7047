// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Run configuration, resolved once at process start.
//!
//! Cluster identity follows a deterministic order: an explicit override (CLI)
//! wins, then the environment variable, then the cluster agent's own
//! configuration file, then the well-known default. The resolution happens
//! exactly once and the result travels in an explicit [`Config`] handed to
//! the pipeline; nothing is probed at module load time or cached globally.

use crate::constants::{
    AGENT_CONFIG_CLUSTER_KEY, AGENT_CONFIG_PATH, CLUSTER_ENV_VAR, COMPUTE_URL_ENV_VAR,
    DEFAULT_CLUSTER, DEFAULT_RECORD_TTL_SECS, DNS_URL_ENV_VAR, ORCHESTRATOR_URL_ENV_VAR,
};
use anyhow::{Context, Result};
use std::fmt;
use tracing::info;

/// Everything a run needs, assembled before the pipeline starts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster to discover services in
    pub cluster: String,
    /// Base URL of the cluster orchestration API
    pub orchestrator_url: String,
    /// Base URL of the compute metadata API
    pub compute_url: String,
    /// Base URL of the DNS provider API
    pub dns_url: String,
    /// TTL for published service records (seconds)
    pub record_ttl: u32,
}

/// Where the cluster identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSource {
    /// Explicit `--cluster` override
    Override,
    /// The `SVCDNS_CLUSTER` environment variable
    Environment,
    /// The cluster agent's configuration file
    AgentConfig,
    /// The built-in default
    Default,
}

impl fmt::Display for ClusterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "command line"),
            Self::Environment => write!(f, "environment"),
            Self::AgentConfig => write!(f, "agent config"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl Config {
    /// Assemble the configuration from the process environment.
    ///
    /// `cluster_override` and `ttl_override` come from the CLI and take
    /// precedence over everything else.
    ///
    /// # Errors
    ///
    /// Fails when one of the provider endpoint variables is unset; there is
    /// no sensible default for a remote API location.
    pub fn from_env(cluster_override: Option<String>, ttl_override: Option<u32>) -> Result<Self> {
        let env_cluster = std::env::var(CLUSTER_ENV_VAR).ok();
        let agent_config = std::fs::read_to_string(AGENT_CONFIG_PATH).ok();

        let (cluster, source) =
            resolve_cluster(cluster_override, env_cluster, agent_config.as_deref());
        info!(cluster = %cluster, source = %source, "cluster identified");

        Ok(Self {
            cluster,
            orchestrator_url: required_env(ORCHESTRATOR_URL_ENV_VAR)?,
            compute_url: required_env(COMPUTE_URL_ENV_VAR)?,
            dns_url: required_env(DNS_URL_ENV_VAR)?,
            record_ttl: ttl_override.unwrap_or(DEFAULT_RECORD_TTL_SECS),
        })
    }
}

/// Read a required environment variable.
fn required_env(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("environment variable {name} must be set"))
}

/// Resolve the cluster identity from its possible sources.
///
/// Pure so the precedence order is testable without touching the process
/// environment: override, then environment value, then agent configuration
/// contents, then [`DEFAULT_CLUSTER`].
#[must_use]
pub fn resolve_cluster(
    cluster_override: Option<String>,
    env_value: Option<String>,
    agent_config: Option<&str>,
) -> (String, ClusterSource) {
    if let Some(cluster) = cluster_override {
        return (cluster, ClusterSource::Override);
    }
    if let Some(cluster) = env_value {
        return (cluster, ClusterSource::Environment);
    }
    if let Some(cluster) = agent_config.and_then(cluster_from_agent_config) {
        return (cluster, ClusterSource::AgentConfig);
    }
    (DEFAULT_CLUSTER.to_string(), ClusterSource::Default)
}

/// Extract the cluster name from the agent's configuration file contents.
///
/// The file is a flat `KEY=value` listing; comments start with `#`. The last
/// `CLUSTER` assignment wins, matching how the agent itself reads the file.
#[must_use]
pub fn cluster_from_agent_config(contents: &str) -> Option<String> {
    let mut cluster = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() != AGENT_CONFIG_CLUSTER_KEY {
            continue;
        }
        let value = value.trim().trim_matches('"');
        if !value.is_empty() {
            cluster = Some(value.to_string());
        }
    }

    cluster
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
