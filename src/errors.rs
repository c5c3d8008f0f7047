// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for discovery and registration.
//!
//! This module provides specialized error types for:
//! - Provider API transport failures (connection, timeout, unexpected status)
//! - Per-family resolution failures along the task -> host -> instance chain
//! - Private zone lookup failures
//! - Fatal run-level failures
//!
//! Resolution failures are collected per family rather than aborting a run;
//! zone lookup failures are fatal because there is no safe place to register
//! anything without a target zone.

use crate::retry::is_retryable_http_status;
use thiserror::Error;

/// Errors raised by the HTTP provider clients.
///
/// These represent transport-level failures when calling the orchestrator,
/// compute metadata, or DNS provider APIs, before any domain interpretation
/// of the response.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// HTTP connection failed (network unreachable, connection refused)
    #[error("HTTP connection to {endpoint} failed: {reason}")]
    ConnectionFailed {
        /// The endpoint that couldn't be reached
        endpoint: String,
        /// Reason for the connection failure
        reason: String,
    },

    /// HTTP request exceeded the configured per-call timeout
    #[error("HTTP request to {endpoint} timed out")]
    RequestTimeout {
        /// The endpoint that timed out
        endpoint: String,
    },

    /// The provider returned a non-success HTTP status
    #[error("Unexpected HTTP response from {endpoint}: {status_code} {reason}")]
    UnexpectedResponse {
        /// The endpoint that returned the response
        endpoint: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        reason: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// The endpoint that returned the body
        endpoint: String,
        /// Explanation of the decode failure
        reason: String,
    },
}

impl ApiError {
    /// Returns true if this error is transient and the call should be retried.
    ///
    /// Connection failures, timeouts, and retryable HTTP statuses (429, 5xx
    /// gateway-class errors) are transient. Client errors and malformed
    /// bodies are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::RequestTimeout { .. } => true,
            Self::UnexpectedResponse { status_code, .. } => {
                is_retryable_http_status(*status_code)
            }
            Self::MalformedResponse { .. } => false,
        }
    }
}

/// Errors along the task -> host -> compute instance resolution chain.
///
/// A family with zero running tasks is NOT an error (the resolver returns
/// `Ok(None)`); these variants cover a presumed-running service whose chain
/// lookup returned an empty or malformed result. Each names the stage that
/// broke so run reports can say exactly where resolution stopped.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// Listing running tasks for the family failed
    #[error("listing running tasks for family '{family}' failed: {source}")]
    TaskListing {
        /// The service definition family being resolved
        family: String,
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// The running task could not be described to find its host
    #[error("describing task '{task_id}' for family '{family}' failed: {source}")]
    TaskDescribe {
        /// The service definition family being resolved
        family: String,
        /// The task that could not be described
        task_id: String,
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// The host (container instance) could not be described
    #[error("describing host '{host_id}' for family '{family}' failed: {source}")]
    HostDescribe {
        /// The service definition family being resolved
        family: String,
        /// The host that could not be described
        host_id: String,
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// The underlying compute instance could not be described
    #[error("describing compute instance '{instance_id}' for family '{family}' failed: {source}")]
    InstanceDescribe {
        /// The service definition family being resolved
        family: String,
        /// The compute instance that could not be described
        instance_id: String,
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// The compute instance reported no network interfaces
    #[error("compute instance '{instance_id}' for family '{family}' has no network interface")]
    MissingInterface {
        /// The service definition family being resolved
        family: String,
        /// The interface-less compute instance
        instance_id: String,
    },
}

impl ResolveError {
    /// The service definition family this failure belongs to.
    #[must_use]
    pub fn family(&self) -> &str {
        match self {
            Self::TaskListing { family, .. }
            | Self::TaskDescribe { family, .. }
            | Self::HostDescribe { family, .. }
            | Self::InstanceDescribe { family, .. }
            | Self::MissingInterface { family, .. } => family,
        }
    }
}

/// Errors locating the private zone for a network.
///
/// All of these are fatal for a run: services cannot be registered without a
/// target zone.
#[derive(Error, Debug, Clone)]
pub enum ZoneError {
    /// Listing hosted zones failed
    #[error("listing hosted zones failed: {source}")]
    Listing {
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// Fetching the association detail for a candidate zone failed
    #[error("fetching detail for zone '{zone_id}' failed: {source}")]
    Detail {
        /// The candidate zone
        zone_id: String,
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// No hosted zone is associated with the network
    #[error("no private zone is associated with network '{network_id}'")]
    NotFound {
        /// The network that has no associated zone
        network_id: String,
    },
}

/// Fatal errors that abort a whole discovery run.
///
/// Per-family resolution failures are collected in the snapshot instead and
/// never surface here.
#[derive(Error, Debug, Clone)]
pub enum DiscoveryError {
    /// The service definition listing itself was unreachable
    #[error("listing service definition families failed: {source}")]
    Listing {
        /// Underlying transport error
        #[source]
        source: ApiError,
    },

    /// The private zone for the cluster's network could not be located
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
