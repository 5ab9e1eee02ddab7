use std::future::Future;

use crate::error::{AppResult, FailureKind};

/// Bounded retry without backoff
///
/// An attempt is repeated only while its error kind is listed in `retryable`
/// and fewer than `max_attempts` attempts have been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retryable: &'static [FailureKind],
}

impl RetryPolicy {
    /// Used for detail lookups
    pub const fn on_timeout(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            retryable: &[FailureKind::Timeout],
        }
    }

    /// Used for poster lookups: any failed request, including error statuses
    pub const fn on_request_error(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            retryable: &[
                FailureKind::Timeout,
                FailureKind::Network,
                FailureKind::Provider,
            ],
        }
    }

    pub fn is_retryable(&self, kind: FailureKind) -> bool {
        self.retryable.contains(&kind)
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt_fn: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && self.is_retryable(e.kind()) => {
                    tracing::debug!(
                        operation = %operation,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Retrying after failure"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        tracing::warn!(
                            operation = %operation,
                            attempts = attempt,
                            error = %e,
                            "Giving up after repeated failures"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}
