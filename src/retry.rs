//! Retry policy and backoff schedule for transient failures.
//!
//! The retry loop is an explicit state machine: [`RetryPolicy`] holds the
//! configuration, [`RetryState`] tracks one logical call's progress, and both
//! decision functions are pure so the schedule can be unit-tested without real
//! I/O or real sleeping. The waiting itself goes through the [`Sleeper`] trait,
//! which tests replace with a recording stub.

use std::time::Duration;

use crate::error::ApiError;

/// Decides if and when a failed request is retried.
///
/// Only transient failures (rate limits, server errors, transport failures)
/// are retried, with exponentially growing delays capped at ten times the base
/// delay. When attempts run out, the caller sees the last classified error
/// unchanged.
///
/// # Examples
///
/// ```
/// use appoint::retry::{RetryPolicy, RetryState};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
/// let state = RetryState::new();
///
/// // Delay after the first failed attempt.
/// assert_eq!(policy.next_delay(&state), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` total attempts with the given
    /// base delay.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Total attempts allowed per logical call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The delay before the first retry; later retries double it.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// The cap on any single delay, computed or server-directed.
    pub fn max_delay(&self) -> Duration {
        self.base_delay.saturating_mul(10)
    }

    /// Whether the call should be retried after `error`, given how many
    /// attempts have already been made.
    pub fn should_retry(&self, error: &ApiError, state: &RetryState) -> bool {
        error.is_retryable() && state.attempt() < self.max_attempts
    }

    /// The backoff delay following attempt `n`: `base * 2^(n-1)`, capped at
    /// [`max_delay`](Self::max_delay).
    pub fn next_delay(&self, state: &RetryState) -> Duration {
        let doublings = state.attempt().saturating_sub(1).min(31);
        let factor = 2u32.saturating_pow(doublings);
        self.base_delay.saturating_mul(factor).min(self.max_delay())
    }
}

impl Default for RetryPolicy {
    /// Three total attempts, one second base delay.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Progress of one logical call through the retry loop.
///
/// Created fresh per call and discarded when the call resolves.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: u32,
    waited: Duration,
}

impl RetryState {
    /// A fresh state: on attempt 1, nothing waited yet.
    pub fn new() -> Self {
        Self {
            attempt: 1,
            waited: Duration::ZERO,
        }
    }

    /// The current attempt number, 1-based.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Cumulative backoff waited so far.
    pub fn waited(&self) -> Duration {
        self.waited
    }

    /// Records a completed backoff wait and moves to the next attempt.
    pub(crate) fn record_wait(&mut self, delay: Duration) {
        self.attempt += 1;
        self.waited += delay;
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Abstraction over waiting, so the retry loop can be driven in tests without
/// real delays.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the current call for `delay` without blocking other calls.
    async fn sleep(&self, delay: Duration);
}

/// The production [`Sleeper`], backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
