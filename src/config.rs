//! Configuration types for housepix

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
///
/// All fields have sensible defaults; a zero-value `Config::default()`
/// targets the staging listing API and downloads into the current working
/// directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the listing API (the `/houses` endpoint lives under it)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of listing pages to fetch (default: 10)
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// Records per page requested from the API (default: 10)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Directory downloaded photos are written into (default: ".")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Maximum number of page requests in flight at once (default: 8)
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Number of image download workers (default: 4)
    #[serde(default = "default_image_workers")]
    pub image_workers: usize,

    /// Retry behavior for transient HTTP failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            total_pages: default_total_pages(),
            per_page: default_per_page(),
            download_dir: default_download_dir(),
            fetch_concurrency: default_fetch_concurrency(),
            image_workers: default_image_workers(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for the backoff policy
///
/// Retries follow an exponential curve starting at `initial_interval` and
/// multiplying by `multiplier` per attempt, with two caps: no single wait
/// exceeds `max_interval`, and once the accumulated wait reaches
/// `max_elapsed` the policy signals stop and the operation fails with
/// retry exhaustion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Wait before the first retry (default: 500 ms)
    #[serde(default = "default_initial_interval", with = "duration_ms_serde")]
    pub initial_interval: Duration,

    /// Cap on any single wait interval (default: 5 seconds)
    #[serde(default = "default_max_interval", with = "duration_ms_serde")]
    pub max_interval: Duration,

    /// Cap on the total time spent waiting between retries (default: 30 seconds)
    #[serde(default = "default_max_elapsed", with = "duration_ms_serde")]
    pub max_elapsed: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Add random jitter to waits (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(5),
            max_elapsed: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

fn default_base_url() -> String {
    "http://app-homevision-staging.herokuapp.com/api_project".to_string()
}

fn default_total_pages() -> u32 {
    10
}

fn default_per_page() -> u32 {
    10
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_image_workers() -> usize {
    4
}

fn default_initial_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_max_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_max_elapsed() -> Duration {
    Duration::from_secs(30)
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
