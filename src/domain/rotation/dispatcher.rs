//! Bounded retry loop that spreads provider calls across the key pool.
//!
//! Each attempt takes the next key from the [`KeyPool`] and runs the caller's
//! closure under a per-attempt timeout. The closure reports a [`CallOutcome`];
//! rate limits and transient failures move on to the next key, a parse fault
//! stops immediately (another key cannot fix an unreadable reply).

use crate::domain::rotation::key_pool::{mask_key, KeyPool};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Classified result of one provider attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success(T),
    RateLimited,
    Transient(String),
    ParseFault(String),
}

impl<T> CallOutcome<T> {
    /// Chains a fallible interpretation step onto a successful attempt.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> CallOutcome<U>) -> CallOutcome<U> {
        match self {
            CallOutcome::Success(v) => f(v),
            CallOutcome::RateLimited => CallOutcome::RateLimited,
            CallOutcome::Transient(e) => CallOutcome::Transient(e),
            CallOutcome::ParseFault(e) => CallOutcome::ParseFault(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CallOutcome<U> {
        self.and_then(|v| CallOutcome::Success(f(v)))
    }
}

/// Why a dispatch produced no payload. Callers turn this into their fallback response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Degraded {
    #[error("no API keys configured")]
    Unconfigured,

    #[error("could not parse provider response: {0}")]
    ParseFault(String),

    #[error("all {attempts} attempts failed (last error: {})", last_error.as_deref().unwrap_or("none"))]
    Exhausted {
        attempts: usize,
        last_error: Option<String>,
    },
}

/// Key rotation plus retry policy, shared by every provider-backed operation.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    pool: Arc<KeyPool>,
    attempt_timeout: Duration,
}

impl Dispatcher {
    pub fn new(pool: Arc<KeyPool>, attempt_timeout: Duration) -> Self {
        Self {
            pool,
            attempt_timeout,
        }
    }

    pub fn pool(&self) -> &KeyPool {
        &self.pool
    }

    /// One attempt per key plus one spare, so a key that recovers mid-rotation gets a second look.
    pub fn default_attempts(&self) -> usize {
        self.pool.len() + 1
    }

    /// Runs `call` with the default attempt budget.
    pub async fn dispatch<T, F, Fut>(&self, call: F) -> Result<T, Degraded>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = CallOutcome<T>>,
    {
        self.dispatch_with(self.default_attempts(), call).await
    }

    /// Runs `call` at most `max_attempts` times, each with a fresh key.
    ///
    /// Attempts are strictly sequential. A success short-circuits the loop.
    pub async fn dispatch_with<T, F, Fut>(
        &self,
        max_attempts: usize,
        mut call: F,
    ) -> Result<T, Degraded>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = CallOutcome<T>>,
    {
        let mut last_error: Option<String> = None;

        for attempt in 1..=max_attempts {
            let key = match self.pool.next_key() {
                Some(k) => k.to_string(),
                None => {
                    warn!("Provider call skipped: no API keys configured");
                    return Err(Degraded::Unconfigured);
                }
            };
            let masked = mask_key(&key);

            let outcome = match tokio::time::timeout(self.attempt_timeout, call(key)).await {
                Ok(outcome) => outcome,
                Err(_) => CallOutcome::Transient(format!(
                    "attempt timed out after {:?}",
                    self.attempt_timeout
                )),
            };

            match outcome {
                CallOutcome::Success(payload) => {
                    debug!(attempt, key = %masked, "Provider call succeeded");
                    return Ok(payload);
                }
                CallOutcome::RateLimited => {
                    warn!(attempt, key = %masked, "Rate limit hit, rotating to next key");
                    last_error = Some("rate limited".to_string());
                }
                CallOutcome::Transient(e) => {
                    warn!(attempt, key = %masked, error = %e, "Provider call failed, retrying");
                    last_error = Some(e);
                }
                CallOutcome::ParseFault(e) => {
                    warn!(attempt, key = %masked, error = %e, "Provider reply could not be parsed");
                    return Err(Degraded::ParseFault(e));
                }
            }
        }

        if self.pool.is_empty() {
            return Err(Degraded::Unconfigured);
        }

        error!(
            attempts = max_attempts,
            last_error = last_error.as_deref().unwrap_or("none"),
            "Provider call exhausted its retry budget"
        );
        Err(Degraded::Exhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}
