//! # housepix
//!
//! Concurrent fetcher for paginated real-estate listings with retrying
//! photo downloads.
//!
//! The crate is built around three stages:
//! - a retrying HTTP transport ([`client::RetryingClient`]) that absorbs
//!   transport failures and HTTP 503 into exponential-backoff retries
//! - a paginated fetcher ([`fetch::fetch_houses`]) that fans one task out
//!   per listing page and fans the decoded records back in
//! - an image pipeline ([`pipeline::process_images`]) where a bounded pool
//!   of workers downloads each listing's photo and persists it with a
//!   single whole-content write
//!
//! ## Quick Start
//!
//! ```no_run
//! use housepix::{Config, RetryingClient, fetch_houses, process_images};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         total_pages: 2,
//!         per_page: 5,
//!         ..Config::default()
//!     };
//!
//!     let client = RetryingClient::new(config.retry.clone())?;
//!     let outcome = fetch_houses(&client, &config).await?;
//!     let report = process_images(&client, &outcome.houses, &config).await?;
//!
//!     println!("saved {} images, {} failed", report.saved, report.failed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Exponential backoff policy
pub mod backoff;
/// Retrying HTTP transport
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Paginated listing fetcher
pub mod fetch;
/// Image download pipeline
pub mod pipeline;
/// Data model for listings and download tasks
pub mod types;
/// File naming helpers
pub mod utils;

// Re-export commonly used types
pub use backoff::ExponentialBackoff;
pub use client::{RetryingClient, SendRequest, build_http_client};
pub use config::{Config, RetryConfig};
pub use error::{Error, Result};
pub use fetch::{FetchOutcome, PageFailure, fetch_houses, page_url};
pub use pipeline::{ImageReport, process_images};
pub use types::{DownloadTask, House, HousesResponse};
pub use utils::{image_file_name, photo_extension, sanitize_address};
