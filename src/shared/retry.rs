//! Retry with exponential backoff
//!
//! Used where a failed attempt is expected to succeed on re-read: losing
//! the optimistic version check on a property's rating recompute, or a
//! transient storage failure. Validation and reference errors are never
//! retried.

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::DomainResult;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(1),
        }
    }
}

/// Execute an async domain operation, retrying transient failures
/// ([`DomainError::is_transient`]) with exponential backoff. Permanent
/// errors and exhausted attempts are surfaced to the caller verbatim.
pub async fn retry_transient<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> DomainResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = DomainResult<T>>,
{
    let mut delay = config.initial_delay;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt == config.max_attempts || !err.is_transient() {
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = config.max_attempts,
                        error = %err,
                        "operation failed permanently"
                    );
                    return Err(err);
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "transient failure, retrying"
                );

                tokio::time::sleep(delay).await;

                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
        }
    }

    unreachable!("loop exits via return")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_concurrency_conflicts_until_success() {
        let attempts = AtomicU32::new(0);
        let result = retry_transient(&RetryConfig::default(), "test_op", || async {
            if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DomainError::ConcurrencyConflict("version moved".into()))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_validation_errors() {
        let attempts = AtomicU32::new(0);
        let result: DomainResult<()> =
            retry_transient(&RetryConfig::default(), "test_op", || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::Validation("bad rating".into()))
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn surfaces_persistent_contention_after_bound() {
        let config = RetryConfig {
            max_attempts: 4,
            initial_delay: Duration::from_millis(1),
            ..RetryConfig::default()
        };
        let attempts = AtomicU32::new(0);
        let result: DomainResult<()> = retry_transient(&config, "test_op", || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::ConcurrencyConflict("still racing".into()))
        })
        .await;

        assert!(matches!(result, Err(DomainError::ConcurrencyConflict(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }
}
