// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use svcdns::{
    config::Config,
    constants::{HTTP_TIMEOUT_SECS, TOKIO_WORKER_THREADS},
    discovery::Discoverer,
    providers::http::{HttpComputeClient, HttpDnsClient, HttpOrchestratorClient},
    providers::DnsApi,
    reconciler::register_services,
};
use tracing::{debug, info, warn};

/// Publish running cluster services into a private DNS zone.
///
/// Services opt in by naming convention: every task definition family ending
/// in "-service" with a running task is registered as an A record named
/// after the family with the suffix stripped.
#[derive(Parser, Debug)]
#[command(name = "svcdns", version)]
struct Cli {
    /// Restrict registration to these service short names or families
    service_names: Vec<String>,

    /// Suppress informational output
    #[arg(short, long)]
    quiet: bool,

    /// Cluster to discover services in (overrides environment and agent config)
    #[arg(long)]
    cluster: Option<String>,

    /// TTL in seconds for published records
    #[arg(long)]
    ttl: Option<u32>,

    /// Exit non-zero when any individual service failed to resolve or register
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("svcdns")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Initialize logging.
    //
    // Respects RUST_LOG if set; otherwise defaults to INFO, or WARN with
    // --quiet so only problems are reported.
    //
    // Respects RUST_LOG_FORMAT for the output format
    // Example: RUST_LOG_FORMAT=json svcdns
    let default_level = if cli.quiet { "warn" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .compact()
                .init();
        }
    }

    let config = Config::from_env(cli.cluster.clone(), cli.ttl)?;
    debug!(?config, "configuration assembled");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .context("building HTTP client")?;

    let orchestrator = Arc::new(HttpOrchestratorClient::new(
        http.clone(),
        &config.orchestrator_url,
    ));
    let compute = Arc::new(HttpComputeClient::new(http.clone(), &config.compute_url));
    let dns: Arc<dyn DnsApi> = Arc::new(HttpDnsClient::new(http, &config.dns_url));

    let discoverer = Discoverer::new(
        orchestrator,
        compute,
        Arc::clone(&dns),
        config.cluster.clone(),
    );

    let snapshot = discoverer.discover().await?;

    let report = register_services(
        dns.as_ref(),
        &snapshot,
        &cli.service_names,
        config.record_ttl,
    )
    .await;

    for failure in &snapshot.failures {
        warn!(family = %failure.family, error = %failure.error, "service was not registered");
    }
    for failed in &report.failed {
        warn!(fqdn = %failed.fqdn, error = %failed.error, "record upsert failed");
    }
    info!(%report, "run complete");

    let failed_services = snapshot.failures.len() + report.failed.len();
    if cli.strict && failed_services > 0 {
        anyhow::bail!("{failed_services} service(s) failed during discovery or registration");
    }

    Ok(())
}
