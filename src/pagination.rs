// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pagination helpers for continuation-token list operations.
//!
//! The orchestrator's definition listing is paginated with a sentinel
//! continuation token: each page may carry a token for the next one, and the
//! listing is complete when no token is returned. This module provides a
//! collector that follows the token chain until exhausted.

use crate::errors::ApiError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// One page of a continuation-token listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items carried by this page
    pub items: Vec<T>,
    /// Token for the next page, absent on the final page
    pub next_token: Option<String>,
}

/// Collect all items of a paginated listing.
///
/// Calls `fetch_page` with `None` for the first page and with each returned
/// continuation token afterwards, until a page comes back without one. The
/// listing is finite and restartable only by re-issuing the call chain.
///
/// # Arguments
///
/// * `fetch_page` - Async function fetching one page for a continuation token
///
/// # Errors
///
/// Returns the first transport error; a partially collected listing is never
/// returned.
pub async fn collect_paginated<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let mut all_items = Vec::new();
    let mut next_token: Option<String> = None;
    let mut page_count = 0;

    loop {
        page_count += 1;
        let page = fetch_page(next_token.take()).await?;

        let item_count = page.items.len();
        all_items.extend(page.items);

        debug!(
            page = page_count,
            items_in_page = item_count,
            total_items = all_items.len(),
            "Fetched page from listing API"
        );

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    debug!(
        total_pages = page_count,
        total_items = all_items.len(),
        "Completed paginated list operation"
    );

    Ok(all_items)
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod pagination_tests;
