//! Async utilities for calls to slow or flaky collaborators
//!
//! - Retry policies with exponential backoff and a retry predicate
//! - Timeout wrapper distinguishing "took too long" from "failed"
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::async_utils::retry::{RetryPolicy, with_retry_if};
//! use tooling::async_utils::timeout::with_timeout;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3).with_initial_interval(0.5);
//! let (result, attempts) = with_retry_if(
//!     &policy,
//!     |err: &String| err.contains("429"),
//!     || async {
//!         with_timeout(Duration::from_secs(10), call_model())
//!             .await
//!             .map_err(|e| e.to_string())
//!     },
//! )
//! .await;
//! ```

pub mod retry;
pub mod timeout;

pub use retry::{with_retry, with_retry_if, RetryPolicy};
pub use timeout::{with_timeout, TimeoutError};
