//! Minimum-interval throttle for outbound requests.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

/// Lets at most one call through per `min_interval`.
///
/// Callers are neither queued nor coalesced; a call that arrives early simply
/// sleeps for the remainder of the interval. Intended for a single task.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!(?remaining, "rate limit: sleeping before next request");
                sleep(remaining).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_does_not_block() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_calls_are_spaced() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.wait().await;
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn call_after_interval_does_not_block() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.wait().await;
        limiter.wait().await;

        sleep(Duration::from_millis(1100)).await;
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
