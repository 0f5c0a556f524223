//! Per-identity request admission
//!
//! Sliding-window counter over admitted-request timestamps. The check and
//! the record happen under one lock so two concurrent calls cannot both pass
//! the count before either records. Windows are created lazily per identity
//! and pruned lazily on every check; no background task is needed.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Rate limiter configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Maximum admitted requests per window
    pub max_requests: u32,
    /// Window horizon
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    /// Ten requests per minute
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request admitted and recorded
    Admitted,
    /// Request rejected; retry once `retry_after` has elapsed
    Rejected { retry_after: Duration },
}

impl Admission {
    /// Whether the request was admitted
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Sliding-window rate limiter keyed by opaque client identity
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter with the given configuration
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically check and record one request for `identity`
    ///
    /// On rejection, `retry_after` is the time until the oldest recorded
    /// request leaves the window, and is always positive.
    pub fn admit(&self, identity: &str) -> Admission {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let window = windows.entry(identity.to_string()).or_default();

        while window
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.config.window)
        {
            window.pop_front();
        }

        if window.len() >= self.config.max_requests as usize {
            let retry_after = window.front().map_or(self.config.window, |oldest| {
                self.config.window.saturating_sub(now.duration_since(*oldest))
            });
            debug!(identity, retry_after_ms = retry_after.as_millis() as u64, "request rejected");
            return Admission::Rejected { retry_after };
        }

        window.push_back(now);
        Admission::Admitted
    }

    /// Drop identities whose newest request has left the window
    pub fn prune_idle(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        windows.retain(|_, window| {
            window
                .back()
                .is_some_and(|newest| now.duration_since(*newest) < self.config.window)
        });
    }

    /// Number of identities currently tracked
    pub fn tracked_identities(&self) -> usize {
        self.windows.lock().len()
    }
}
