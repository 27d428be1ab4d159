//! Politeness throttle
//!
//! Inserts a randomized delay between outbound requests so the crawl never
//! exceeds the rate a human-paced browse would produce. The delay is a
//! configured base plus uniform jitter; keeping it a component of its own
//! lets a bounded-concurrency variant swap in later without losing the
//! throttling contract.

use crate::config::ThrottleConfig;
use rand::Rng;
use std::time::Duration;

/// Fixed-delay scheduler with jitter.
pub struct Throttle {
    base: Duration,
    jitter_min_ms: u64,
    jitter_max_ms: u64,
}

impl Throttle {
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            jitter_min_ms: config.jitter_min_ms,
            jitter_max_ms: config.jitter_max_ms,
        }
    }

    /// Draws the next pause duration: base delay plus uniform jitter.
    pub fn next_delay(&self) -> Duration {
        let jitter = if self.jitter_max_ms > self.jitter_min_ms {
            rand::rng().random_range(self.jitter_min_ms..=self.jitter_max_ms)
        } else {
            self.jitter_min_ms
        };
        self.base + Duration::from_millis(jitter)
    }

    /// Sleeps for one throttle interval.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Politeness pause");
        tokio::time::sleep(delay).await;
    }
}
