//! Retry utilities for async operations
//!
//! Exponential backoff with optional jitter; callers decide which errors
//! are worth another attempt.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retrying failed operations
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: usize,

    /// Initial interval between retries in seconds
    pub initial_interval: f64,

    /// Multiplier for the interval after each retry
    pub backoff_factor: f64,

    /// Maximum interval between retries in seconds
    pub max_interval: f64,

    /// Whether to add random jitter to intervals
    pub jitter: bool,
}

impl RetryPolicy {
    /// Create a new retry policy with the given max attempts
    ///
    /// A value of zero is treated as one attempt.
    ///
    /// ```rust
    /// use tooling::async_utils::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3);
    /// assert_eq!(policy.max_attempts, 3);
    /// ```
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_interval: 0.5,
            backoff_factor: 2.0,
            max_interval: 30.0,
            jitter: true,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1)
    }

    /// Set the initial interval between retries
    pub fn with_initial_interval(mut self, seconds: f64) -> Self {
        self.initial_interval = seconds;
        self
    }

    /// Set the backoff factor
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the maximum interval between retries
    pub fn with_max_interval(mut self, seconds: f64) -> Self {
        self.max_interval = seconds;
        self
    }

    /// Enable or disable jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay after the given failed attempt (0-indexed)
    ///
    /// `initial_interval * backoff_factor^attempt`, capped at `max_interval`,
    /// scaled by a random factor in `0.5..=1.5` when jitter is on.
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        let base_delay = self.initial_interval * self.backoff_factor.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_interval).max(0.0);

        let final_delay = if self.jitter {
            capped_delay * rand::thread_rng().gen_range(0.5..=1.5)
        } else {
            capped_delay
        };

        Duration::from_secs_f64(final_delay)
    }

    /// Check if another attempt is allowed after `attempts_made`
    pub fn should_retry(&self, attempts_made: usize) -> bool {
        attempts_made < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Execute an async operation, retrying errors accepted by `is_retryable`
///
/// Returns the final result together with the number of attempts made.
/// Errors rejected by the predicate are returned immediately.
pub async fn with_retry_if<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    operation: F,
) -> (std::result::Result<T, E>, usize)
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return (Ok(value), attempt),
            Err(error) => {
                if !is_retryable(&error) || !policy.should_retry(attempt) {
                    return (Err(error), attempt);
                }

                let delay = policy.calculate_delay(attempt - 1);
                tracing::debug!(
                    attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Execute an async operation, retrying every error
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, operation: F) -> std::result::Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    with_retry_if(policy, |_| true, operation).await.0
}
