// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # svcdns - Cluster Service Discovery to Private DNS
//!
//! svcdns discovers running containerized services inside a compute cluster
//! by naming convention and publishes each one into a private DNS zone, so
//! other machines on the same network can address a service by a stable
//! name.
//!
//! ## Overview
//!
//! A service definition family opts in purely by name: a family called
//! `cache-service` is resolved to the private address of the host its task
//! runs on and registered as `cache.<zone>`. No per-service configuration is
//! needed, which also means the `-service` suffix must not be used for
//! definitions that are not services.
//!
//! Each run is a stateless pass: enumerate definition families, match the
//! convention, resolve matches through the task -> host -> compute instance
//! chain, locate the private zone of the cluster's network once, and upsert
//! one A record per service. Broken services are reported per family without
//! stopping the rest of the run.
//!
//! ## Modules
//!
//! - [`naming`] - Naming convention matching and short-name derivation
//! - [`resolver`] - Resolution of a family to a running instance's address
//! - [`zone`] - Private zone lookup for the cluster network
//! - [`discovery`] - The aggregator assembling a snapshot per run
//! - [`reconciler`] - Idempotent A-record upserts from a snapshot
//! - [`providers`] - Narrow interfaces to the external collaborators
//! - [`config`] - Run configuration and cluster identity resolution
//! - [`retry`] / [`pagination`] - Bounded retry and continuation-token helpers
//!
//! ## Example
//!
//! ```rust
//! use svcdns::naming::service_short_name;
//!
//! // Families ending in "-service" are discoverable
//! assert_eq!(service_short_name("cache-service"), Some("cache"));
//!
//! // Everything else is ignored
//! assert_eq!(service_short_name("worker-batch"), None);
//! ```

pub mod config;
pub mod constants;
pub mod discovery;
pub mod errors;
pub mod naming;
pub mod pagination;
pub mod providers;
pub mod reconciler;
pub mod resolver;
pub mod retry;
pub mod zone;
