//! Timeout wrapper for async operations

use crate::logging::format_duration;
use std::future::Future;
use std::time::Duration;

/// Outcome of [`with_timeout`] when the operation did not succeed
#[derive(Debug, PartialEq)]
pub enum TimeoutError<E> {
    /// Operation completed but failed
    OperationFailed(E),
    /// Operation did not complete in time
    Elapsed(Duration),
}

impl<E> TimeoutError<E> {
    /// Whether the deadline was hit.
    pub fn is_elapsed(&self) -> bool {
        matches!(self, TimeoutError::Elapsed(_))
    }

    /// Collapse into the operation's error type.
    pub fn into_inner_or(self, on_elapsed: impl FnOnce(Duration) -> E) -> E {
        match self {
            TimeoutError::OperationFailed(e) => e,
            TimeoutError::Elapsed(d) => on_elapsed(d),
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TimeoutError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutError::OperationFailed(e) => write!(f, "{}", e),
            TimeoutError::Elapsed(d) => write!(f, "Operation timed out after {}", format_duration(*d)),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TimeoutError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TimeoutError::OperationFailed(e) => Some(e),
            TimeoutError::Elapsed(_) => None,
        }
    }
}

/// Execute a fallible async operation with a deadline
pub async fn with_timeout<F, T, E>(
    duration: Duration,
    operation: F,
) -> std::result::Result<T, TimeoutError<E>>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    match tokio::time::timeout(duration, operation).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(error)) => Err(TimeoutError::OperationFailed(error)),
        Err(_elapsed) => Err(TimeoutError::Elapsed(duration)),
    }
}
