//! Paginated listing fetcher
//!
//! Dispatches one task per page, bounded by a semaphore, and fans the
//! decoded records back in over a channel. The aggregation loop drains
//! only after every page task has been joined, so a returned
//! [`FetchOutcome`] is always complete: each requested page has either
//! contributed its records or been recorded as failed.
//!
//! A page that fails (transport exhaustion, malformed envelope) never
//! discards the other pages' records; it is logged and reported in
//! [`FetchOutcome::failed_pages`].

use crate::client::{RetryingClient, SendRequest};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{House, HousesResponse};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use url::Url;

/// One page that could not be fetched or decoded
#[derive(Debug)]
pub struct PageFailure {
    /// The page number in `[1, total_pages]`
    pub page: u32,
    /// What went wrong
    pub error: Error,
}

/// Aggregate result of a paginated fetch
///
/// Record order within a page is preserved; order across pages follows
/// completion order and is unspecified.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Records from every successfully decoded, success-flagged page
    pub houses: Vec<House>,
    /// Pages that contributed nothing, with the reason
    pub failed_pages: Vec<PageFailure>,
}

/// Build the URL for one listing page
pub fn page_url(base_url: &str, page: u32, per_page: u32) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/houses", base_url.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("per_page", &per_page.to_string());
    Ok(url)
}

/// Fetch `config.total_pages` listing pages concurrently
///
/// Issues exactly one request chain per page (retries happen inside the
/// transport), with at most `config.fetch_concurrency` pages in flight.
/// Returns once every page task has finished.
///
/// # Errors
///
/// Fails only on setup problems (unbuildable page URL) or a panicked page
/// task. Per-page fetch and decode failures are reported in the outcome,
/// not as an error.
pub async fn fetch_houses<S>(client: &RetryingClient<S>, config: &Config) -> Result<FetchOutcome>
where
    S: SendRequest + Clone + Send + Sync + 'static,
{
    let total_pages = config.total_pages;
    let semaphore = Arc::new(Semaphore::new(config.fetch_concurrency.max(1)));
    // Capacity covers every page, so no page task ever blocks on send and
    // joining before draining cannot deadlock
    let (tx, mut rx) = mpsc::channel(total_pages.max(1) as usize);

    let mut handles = Vec::with_capacity(total_pages as usize);
    for page in 1..=total_pages {
        let url = page_url(&config.base_url, page, config.per_page)?;
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let tx = tx.clone();
        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquisition cannot fail
            let _permit = semaphore.acquire_owned().await.ok();
            let result = fetch_page(&client, page, &url).await;
            let _ = tx.send((page, result)).await;
        }));
    }
    drop(tx);

    // Every dispatched page must finish before the drain below is declared
    // complete
    try_join_all(handles).await?;

    let mut outcome = FetchOutcome::default();
    while let Some((page, result)) = rx.recv().await {
        match result {
            Ok(houses) => {
                tracing::debug!(page, records = houses.len(), "Page fetched");
                outcome.houses.extend(houses);
            }
            Err(error) => {
                tracing::warn!(page, error = %error, "Page fetch failed");
                outcome.failed_pages.push(PageFailure { page, error });
            }
        }
    }

    tracing::info!(
        records = outcome.houses.len(),
        failed_pages = outcome.failed_pages.len(),
        total_pages,
        "Listing fetch complete"
    );
    Ok(outcome)
}

/// Fetch and decode a single page
///
/// A page whose envelope carries `ok == false` contributes zero records,
/// even if its `houses` array is non-empty.
async fn fetch_page<S: SendRequest>(
    client: &RetryingClient<S>,
    page: u32,
    url: &Url,
) -> Result<Vec<House>> {
    let response = client.get(url).await?;
    let envelope: HousesResponse = response
        .json()
        .await
        .map_err(|source| Error::Decode { page, source })?;

    if !envelope.ok {
        tracing::warn!(page, "Server flagged page as not ok, skipping its records");
        return Ok(Vec::new());
    }
    Ok(envelope.houses)
}
