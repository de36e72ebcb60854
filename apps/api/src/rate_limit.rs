//! Token-bucket admission control for outbound AI provider calls.
//!
//! The Gemini free tier allows a fixed number of requests per minute, so
//! every provider call is admitted through a shared `RateLimiter` keyed by a
//! fixed API identity. On rejection the caller is delayed for the reported
//! wait and admission is attempted exactly once more; a second rejection
//! surfaces as `RateLimitError::QuotaExhausted`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("API quota exhausted; blocked for {}ms", .0.as_millis())]
    QuotaExhausted(Duration),
}

struct Window {
    started_at: Instant,
    consumed: u32,
    blocked_until: Option<Instant>,
}

/// Fixed-window rate limiter shared by all callers of one external API.
///
/// `points` consumes are allowed per `duration`; exhausting the window blocks
/// the key for `block_duration`. One instance per API identity, constructed
/// at startup and shared via `Arc`.
pub struct RateLimiter {
    points: u32,
    duration: Duration,
    block_duration: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(points: u32, duration: Duration, block_duration: Duration) -> Self {
        Self {
            points,
            duration,
            block_duration,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Attempts to consume one point for `key`. On rejection returns the
    /// duration to wait before the next attempt can succeed.
    fn try_consume(&self, key: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            started_at: now,
            consumed: 0,
            blocked_until: None,
        });

        if let Some(until) = window.blocked_until {
            if now < until {
                return Err(until - now);
            }
            // Block elapsed; start a fresh window.
            window.blocked_until = None;
            window.started_at = now;
            window.consumed = 0;
        }

        if now.duration_since(window.started_at) >= self.duration {
            window.started_at = now;
            window.consumed = 0;
        }

        if window.consumed < self.points {
            window.consumed += 1;
            Ok(())
        } else {
            window.blocked_until = Some(now + self.block_duration);
            Err(self.block_duration)
        }
    }

    /// Runs `op` under quota admission for `key`.
    ///
    /// On rejection, suspends for the reported wait (other tasks keep
    /// running) and retries admission exactly once; a second rejection maps
    /// into the caller's error type via `From<RateLimitError>`. The operation
    /// itself runs at most once, and its errors propagate unchanged.
    pub async fn execute<T, E, F, Fut>(&self, key: &str, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<RateLimitError>,
    {
        match self.try_consume(key) {
            Ok(()) => op().await,
            Err(wait) => {
                warn!(
                    "rate limit exceeded for '{key}'; waiting {}ms before retrying",
                    wait.as_millis()
                );
                tokio::time::sleep(wait).await;
                match self.try_consume(key) {
                    Ok(()) => op().await,
                    Err(wait) => Err(RateLimitError::QuotaExhausted(wait).into()),
                }
            }
        }
    }
}
