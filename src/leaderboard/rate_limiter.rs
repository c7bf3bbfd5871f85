//! Rate limiting support

use log::{debug, info};
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};
use tokio::time::{Instant, sleep};

use crate::github::{GitHubError, GitHubResult};
use crate::leaderboard::config::LeaderboardConfig;

/// Shared pause state. One worker hitting the rate limit holds back all of them.
pub(crate) struct RateLimiter {
    pub(crate) paused_until: Option<Instant>,
    pub(crate) rate_limit_hits: u32,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            paused_until: None,
            rate_limit_hits: 0,
        }
    }

    pub fn record_hit(&mut self) {
        self.rate_limit_hits += 1;
    }

    /// Extend the pause so that no call starts before `now + delay`.
    pub fn pause_for(&mut self, delay: Duration) {
        let until = Instant::now() + delay;
        self.paused_until = Some(match self.paused_until {
            Some(current) if current > until => current,
            _ => until,
        });
    }

    pub fn remaining_pause(&self) -> Option<Duration> {
        let until = self.paused_until?;
        let now = Instant::now();
        (until > now).then(|| until - now)
    }
}

/// Upper bound of the backoff window for a retry attempt (0-based):
/// `min(cap, base * 2^attempt)`.
#[must_use]
pub fn backoff_ceiling(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(cap)
}

/// Exponential backoff with equal jitter: half the window is fixed, the other
/// half is random.
#[must_use]
pub fn backoff_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let ceiling = backoff_ceiling(attempt, base, cap);
    let half = ceiling / 2;
    let half_ms = u64::try_from(half.as_millis()).unwrap_or(u64::MAX);
    let jitter = rand::rng().random_range(0..=half_ms);
    half + Duration::from_millis(jitter)
}

/// Gate every outbound call passes through: a global in-flight limit,
/// the shared rate-limit pause, a per-call timeout and rate-limit retries.
#[derive(Clone)]
pub struct RateGate {
    permits: Arc<Semaphore>,
    limiter: Arc<RwLock<RateLimiter>>,
    timeout: Duration,
    max_retries: u32,
    backoff_base: Duration,
    backoff_cap: Duration,
}

impl RateGate {
    #[must_use]
    pub fn new(config: &LeaderboardConfig) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            limiter: Arc::new(RwLock::new(RateLimiter::new())),
            timeout: config.timeout,
            max_retries: config.max_retries,
            backoff_base: config.backoff_base,
            backoff_cap: config.backoff_cap,
        }
    }

    /// Number of rate-limit responses seen so far, including the ones that
    /// exhausted their retries.
    pub async fn rate_limit_hits(&self) -> u32 {
        self.limiter.read().await.rate_limit_hits
    }

    /// Run `request` under the gate.
    ///
    /// A timeout is returned as [`GitHubError::Timeout`] and is not retried.
    /// Rate-limit responses are retried up to `max_retries` times.
    pub async fn call<T, F, Fut>(&self, operation: &str, mut request: F) -> GitHubResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GitHubResult<T>>,
    {
        let mut attempt = 0;
        loop {
            self.wait_if_paused().await;

            let permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| GitHubError::TaskCancelled)?;
            let outcome = tokio::time::timeout(self.timeout, request()).await;
            drop(permit);

            match outcome {
                Err(_) => {
                    return Err(GitHubError::Timeout {
                        operation: operation.to_string(),
                        duration: self.timeout,
                    });
                }
                Ok(Err(e)) if e.is_rate_limited() => {
                    let mut limiter = self.limiter.write().await;
                    limiter.record_hit();
                    if attempt >= self.max_retries {
                        return Err(e);
                    }
                    let delay = backoff_delay(attempt, self.backoff_base, self.backoff_cap);
                    info!(
                        "Rate limited during {operation}, backing off {delay:?} (retry {} of {})",
                        attempt + 1,
                        self.max_retries
                    );
                    limiter.pause_for(delay);
                    attempt += 1;
                }
                Ok(result) => return result,
            }
        }
    }

    async fn wait_if_paused(&self) {
        loop {
            let remaining = self.limiter.read().await.remaining_pause();
            match remaining {
                Some(wait) => {
                    debug!("Rate limit pause, waiting {wait:?}");
                    sleep(wait).await;
                }
                None => break,
            }
        }
    }
}
