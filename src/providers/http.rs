// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP/JSON clients for the provider traits.
//!
//! Each collaborator is reached through a small REST surface; any server
//! speaking these shapes works. All calls share one [`reqwest::Client`]
//! (carrying the per-call timeout) and go through the bounded retry in
//! [`crate::retry`]. Reads are idempotent; the record upsert is retried too
//! because an A-record UPSERT applied twice equals one application.

use super::{
    ComputeApi, DnsApi, HostDetail, InstanceDetail, OrchestratorApi, RecordChange, TaskDetail,
    ZoneDetail, ZoneSummary,
};
use crate::errors::ApiError;
use crate::pagination::Page;
use crate::retry::with_retry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Build an API base URL from a server address.
///
/// Converts "discovery.internal:8080" to `http://discovery.internal:8080`;
/// addresses already carrying a scheme are kept, trailing slashes trimmed.
pub(crate) fn build_api_url(server: &str) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", server.trim_end_matches('/'))
    }
}

/// Map a reqwest transport failure onto [`ApiError`].
fn transport_error(endpoint: &str, err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::RequestTimeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ApiError::ConnectionFailed {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Turn an HTTP response into the expected JSON shape.
async fn decode_response<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let reason = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(url = %url, status = %status, error = %reason, "HTTP API request failed");
        return Err(ApiError::UnexpectedResponse {
            endpoint: url.to_string(),
            status_code: status.as_u16(),
            reason,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::MalformedResponse {
            endpoint: url.to_string(),
            reason: e.to_string(),
        })
}

/// Issue a GET request and decode the JSON body.
async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, ApiError> {
    debug!(method = "GET", url = %url, "HTTP API request");

    let response = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| transport_error(url, &e))?;

    decode_response(url, response).await
}

/// Issue a POST request with a JSON body and decode the JSON response.
async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<T, ApiError> {
    debug!(method = "POST", url = %url, "HTTP API request");

    let response = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(url, &e))?;

    decode_response(url, response).await
}

/// One page of the definition family listing on the wire.
#[derive(Debug, Deserialize)]
struct DefinitionFamiliesResponse {
    families: Vec<String>,
    #[serde(default)]
    next_token: Option<String>,
}

/// Running task listing on the wire.
#[derive(Debug, Deserialize)]
struct TaskListResponse {
    task_ids: Vec<String>,
}

/// Hosted zone listing on the wire.
#[derive(Debug, Deserialize)]
struct ZoneListResponse {
    zones: Vec<ZoneSummary>,
}

/// Accepted record change on the wire.
#[derive(Debug, Deserialize)]
struct ChangeResponse {
    change_id: String,
}

/// HTTP client for the cluster orchestration API.
#[derive(Debug, Clone)]
pub struct HttpOrchestratorClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpOrchestratorClient {
    /// Create a client for the orchestrator at `server`.
    #[must_use]
    pub fn new(http: reqwest::Client, server: &str) -> Self {
        Self {
            http,
            base_url: build_api_url(server),
        }
    }
}

#[async_trait]
impl OrchestratorApi for HttpOrchestratorClient {
    async fn list_definition_families(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<String>, ApiError> {
        let url = format!("{}/v1/definitions", self.base_url);
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(token) = next_token {
            query.push(("next_token", token));
        }

        let response: DefinitionFamiliesResponse =
            with_retry(|| get_json(&self.http, &url, &query), "list definition families").await?;

        Ok(Page {
            items: response.families,
            next_token: response.next_token,
        })
    }

    async fn list_running_tasks(
        &self,
        cluster: &str,
        family: &str,
    ) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/v1/clusters/{cluster}/tasks", self.base_url);
        let query = [("family", family), ("desired_status", "RUNNING")];

        let response: TaskListResponse =
            with_retry(|| get_json(&self.http, &url, &query), "list running tasks").await?;

        Ok(response.task_ids)
    }

    async fn describe_task(&self, cluster: &str, task_id: &str) -> Result<TaskDetail, ApiError> {
        let url = format!("{}/v1/clusters/{cluster}/tasks/{task_id}", self.base_url);

        with_retry(|| get_json(&self.http, &url, &[]), "describe task").await
    }

    async fn describe_host(&self, cluster: &str, host_id: &str) -> Result<HostDetail, ApiError> {
        let url = format!("{}/v1/clusters/{cluster}/hosts/{host_id}", self.base_url);

        with_retry(|| get_json(&self.http, &url, &[]), "describe host").await
    }
}

/// HTTP client for the compute metadata API.
#[derive(Debug, Clone)]
pub struct HttpComputeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpComputeClient {
    /// Create a client for the compute metadata service at `server`.
    #[must_use]
    pub fn new(http: reqwest::Client, server: &str) -> Self {
        Self {
            http,
            base_url: build_api_url(server),
        }
    }
}

#[async_trait]
impl ComputeApi for HttpComputeClient {
    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiError> {
        let url = format!("{}/v1/instances/{instance_id}", self.base_url);

        with_retry(|| get_json(&self.http, &url, &[]), "describe instance").await
    }
}

/// HTTP client for the DNS provider API.
#[derive(Debug, Clone)]
pub struct HttpDnsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDnsClient {
    /// Create a client for the DNS provider at `server`.
    #[must_use]
    pub fn new(http: reqwest::Client, server: &str) -> Self {
        Self {
            http,
            base_url: build_api_url(server),
        }
    }
}

#[async_trait]
impl DnsApi for HttpDnsClient {
    async fn list_zones(&self) -> Result<Vec<ZoneSummary>, ApiError> {
        let url = format!("{}/v1/zones", self.base_url);

        let response: ZoneListResponse =
            with_retry(|| get_json(&self.http, &url, &[]), "list zones").await?;

        Ok(response.zones)
    }

    async fn get_zone_detail(&self, zone_id: &str) -> Result<ZoneDetail, ApiError> {
        let url = format!("{}/v1/zones/{zone_id}", self.base_url);

        with_retry(|| get_json(&self.http, &url, &[]), "get zone detail").await
    }

    async fn upsert_record(
        &self,
        zone_id: &str,
        change: &RecordChange,
    ) -> Result<String, ApiError> {
        let url = format!("{}/v1/zones/{zone_id}/records", self.base_url);

        let response: ChangeResponse =
            with_retry(|| post_json(&self.http, &url, change), "upsert record").await?;

        Ok(response.change_id)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
