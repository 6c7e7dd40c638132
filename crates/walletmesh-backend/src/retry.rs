//! Retry with exponential backoff for backend RPC calls.
//!
//! Used only for the external RPC interface, never for peer messaging
//! (broadcast fan-out is at-most-once by design). After the final attempt
//! the error propagates to the caller and halts that workflow branch; there
//! is no cancellation token.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{BackendError, Result};

/// Backoff configuration: fixed attempt budget, doubling delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per subsequent attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Run `operation` under the retry policy.
///
/// Only errors reporting a retryable code are retried; terminal errors and
/// the final attempt's error propagate immediately.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    op_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = policy.base_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < policy.max_attempts => {
                warn!(
                    op = op_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "retryable backend error, backing off"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(error) => {
                warn!(op = op_name, attempt, %error, "backend operation failed");
                return Err(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn flaky(failures: u32) -> (Arc<AtomicU32>, impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32>> + Send>>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let op = move || {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= failures {
                    Err(BackendError::unavailable("node down"))
                } else {
                    Ok(n)
                }
            }) as std::pin::Pin<Box<dyn Future<Output = Result<u32>> + Send>>
        };
        (calls, op)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_twice_then_succeed() {
        let policy = RetryPolicy::default();
        let (calls, op) = flaky(2);

        let start = Instant::now();
        let value = with_retry(&policy, "balance", op).await.unwrap();
        let elapsed = start.elapsed();

        // Third attempt succeeds after backing off 500ms then 1000ms.
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(elapsed >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_propagate_error() {
        let policy = RetryPolicy::default();
        let (calls, op) = flaky(u32::MAX);

        let result = with_retry(&policy, "balance", op).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), policy.max_attempts);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_is_not_retried() {
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<()> = with_retry(&policy, "load", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(BackendError::wallet_not_found("ghost"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_immediate_success_does_not_sleep() {
        let policy = RetryPolicy::default();
        let value = with_retry(&policy, "noop", || async { Ok(42u32) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }
}
