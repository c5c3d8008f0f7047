// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for provider API calls.
//!
//! This module provides utilities for retrying transient API errors
//! (connection failures, timeouts, 429, 5xx) with exponential backoff, while
//! failing fast on permanent errors (4xx client errors).
//!
//! Only idempotent calls go through [`with_retry`]. Listing and describe
//! calls are idempotent reads; the record UPSERT is idempotent by definition
//! (applying it twice produces the same record state as applying it once),
//! so it is retried under the same bound.

use crate::constants::{
    BACKOFF_MULTIPLIER, MAX_CALL_RETRIES, RANDOMIZATION_FACTOR, RETRY_INITIAL_INTERVAL_MILLIS,
    RETRY_MAX_INTERVAL_SECS,
};
use crate::errors::ApiError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Simple exponential backoff implementation.
///
/// Provides exponential backoff with randomization (jitter) to prevent
/// thundering herd. The total number of attempts is bounded by the caller;
/// this type only produces the sleep intervals.
pub struct ExponentialBackoff {
    /// Current interval duration
    current_interval: Duration,
    /// Maximum interval duration
    max_interval: Duration,
    /// Backoff multiplier (typically 2.0 for doubling)
    multiplier: f64,
    /// Randomization factor (e.g., 0.1 for ±10%)
    randomization_factor: f64,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff with specified parameters.
    fn new(
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
        randomization_factor: f64,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            max_interval,
            multiplier,
            randomization_factor,
        }
    }

    /// Get the next backoff interval.
    pub fn next_backoff(&mut self) -> Duration {
        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        // Exponential growth, capped at the maximum interval
        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        jittered
    }

    /// Apply randomization (jitter) to an interval.
    fn apply_jitter(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let delta = secs * self.randomization_factor;
        let min = secs - delta;
        let max = secs + delta;

        let mut rng = rand::thread_rng();
        let jittered = rng.gen_range(min..=max);

        Duration::from_secs_f64(jittered.max(0.0))
    }
}

/// Create the backoff configuration for provider API retries.
///
/// # Configuration
///
/// - **Initial interval**: 50ms
/// - **Max interval**: 2 seconds
/// - **Multiplier**: 2.0 (exponential growth)
/// - **Randomization**: ±10% (prevents thundering herd)
///
/// With the default retry bound of 2 retries, a failing call sleeps roughly
/// 50ms and 100ms before giving up.
#[must_use]
pub fn call_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(RETRY_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(RETRY_MAX_INTERVAL_SECS),
        BACKOFF_MULTIPLIER,
        RANDOMIZATION_FACTOR,
    )
}

/// Determine if an HTTP status code is retryable.
///
/// # Retryable Status Codes
///
/// - **429** (Too Many Requests) - Rate limiting
/// - **500** (Internal Server Error) - Server error
/// - **502** (Bad Gateway) - Proxy/gateway error
/// - **503** (Service Unavailable) - Temporary unavailability
/// - **504** (Gateway Timeout) - Gateway timeout
#[must_use]
pub fn is_retryable_http_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Retry an idempotent provider API call with exponential backoff.
///
/// Automatically retries on transient errors (per [`ApiError::is_transient`])
/// up to `MAX_CALL_RETRIES` times after the first attempt, and fails
/// immediately on permanent errors.
///
/// # Arguments
///
/// * `operation` - Async function that performs the API call
/// * `operation_name` - Human-readable name for logging (e.g., "list zones")
///
/// # Errors
///
/// Returns the last error if a non-retryable error is encountered or all
/// retries are exhausted.
pub async fn with_retry<T, F, Fut>(mut operation: F, operation_name: &str) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut backoff = call_backoff();
    let max_attempts = 1 + MAX_CALL_RETRIES;
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        "API call succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                if !e.is_transient() {
                    error!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable API error, failing immediately"
                    );
                    return Err(e);
                }

                if attempt >= max_attempts {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        "Retries exhausted, giving up"
                    );
                    return Err(e);
                }

                let duration = backoff.next_backoff();
                warn!(
                    operation = operation_name,
                    attempt = attempt,
                    retry_after = ?duration,
                    error = %e,
                    "Retryable API error, will retry"
                );
                tokio::time::sleep(duration).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
