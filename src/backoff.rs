//! Exponential backoff policy for retryable HTTP requests
//!
//! The policy hands out successive wait intervals following an exponential
//! curve with two caps: a per-interval cap (`max_interval`) and a total
//! budget (`max_elapsed`). Once the budget is spent, [`ExponentialBackoff::next_interval`]
//! returns `None` and the caller gives up, surfacing the last operational
//! error.
//!
//! A policy instance tracks mutable counters and must not be shared across
//! concurrent operations: each logical request builds its own instance
//! (see [`crate::client::RetryingClient`]).

use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Resettable exponential backoff state for a single logical operation
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial_interval: Duration,
    max_interval: Duration,
    max_elapsed: Duration,
    multiplier: f64,
    jitter: bool,
    /// Next un-jittered interval to hand out
    current: Duration,
    /// Sum of un-jittered intervals handed out so far
    elapsed: Duration,
}

impl ExponentialBackoff {
    /// Create a fresh policy at the start of its curve
    pub fn new(config: &RetryConfig) -> Self {
        let initial = config.initial_interval.min(config.max_interval);
        Self {
            initial_interval: initial,
            max_interval: config.max_interval,
            max_elapsed: config.max_elapsed,
            multiplier: config.multiplier,
            jitter: config.jitter,
            current: initial,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the wait before the next retry attempt, or `None` once the
    /// total wait budget (`max_elapsed`) would be exceeded.
    ///
    /// The budget is tracked as the sum of handed-out intervals rather than
    /// wall-clock time, which keeps the stop sentinel deterministic. Jitter
    /// (uniform 1x-2x, as elsewhere in the ecosystem) is applied on top of
    /// the returned interval and does not count against the budget.
    pub fn next_interval(&mut self) -> Option<Duration> {
        let planned = self.current;
        if self.elapsed + planned > self.max_elapsed {
            return None;
        }
        self.elapsed += planned;

        let next = Duration::from_secs_f64(self.current.as_secs_f64() * self.multiplier);
        self.current = next.min(self.max_interval);

        if self.jitter {
            Some(add_jitter(planned))
        } else {
            Some(planned)
        }
    }

    /// Restart the curve from its initial interval with a full wait budget
    pub fn reset(&mut self) {
        self.current = self.initial_interval;
        self.elapsed = Duration::ZERO;
    }
}

/// Add random jitter to a wait to prevent thundering herd
///
/// Jitter is uniformly distributed between 0% and 100% of the interval, so
/// the actual wait lands between `interval` and `2 * interval`.
fn add_jitter(interval: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(interval.as_secs_f64() * (1.0 + jitter_factor))
}
