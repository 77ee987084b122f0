//! Retry executor.

use super::backoff::JitteredBackoff;
use super::policy::{RetryNotice, RetryPolicy};
use super::settings::RetrySettings;
use crate::classify::ErrorSource;
use backon::Retryable;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Run `work` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
///
/// Returns the first successful value, or the error of the last attempt.
/// Errors of earlier attempts are only observable through
/// [`RetryPolicy::on_retry`].
///
/// # Example
///
/// ```rust
/// use note_retry::{ApiError, RetryPolicy, RetrySettings, retry_with_backoff};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let calls = AtomicU32::new(0);
/// let policy = RetryPolicy::classified(
///     RetrySettings::default()
///         .with_initial_delay(Duration::from_millis(1))
///         .with_jitter(false),
/// );
///
/// let result = retry_with_backoff(
///     || async {
///         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
///             Err(ApiError::new(503, "Service Unavailable"))
///         } else {
///             Ok("summary")
///         }
///     },
///     &policy,
/// )
/// .await;
///
/// assert_eq!(result, Ok("summary"));
/// assert_eq!(calls.load(Ordering::SeqCst), 2);
/// # }
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "retry_with_backoff",
        skip_all,
        fields(max_attempts = policy.settings().max_attempts)
    )
)]
pub async fn retry_with_backoff<T, E, F, Fut>(work: F, policy: &RetryPolicy<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Debug,
{
    let backoff = JitteredBackoff::from_settings(policy.settings());
    let max_attempts = backoff.max_retries() + 1;
    let mut failures = 0u32;
    let mut retries = 0u32;

    let result = work
        .retry(backoff)
        .sleep(tokio::time::sleep)
        .when(|err: &E| {
            failures += 1;
            // The last attempt's error is returned as is, retryable or not.
            failures < max_attempts && policy.should_retry(err)
        })
        .notify(|err: &E, delay: Duration| {
            retries += 1;
            let notice = RetryNotice {
                attempt: retries,
                delay,
            };
            policy.notify(err, notice);

            #[cfg(feature = "tracing")]
            debug!(
                error = ?err,
                attempt = notice.attempt,
                retry_after_ms = %delay.as_millis(),
                "Retrying after failed attempt"
            );
        })
        .await;

    #[cfg(feature = "tracing")]
    if let Err(ref err) = result {
        if failures >= max_attempts {
            warn!(error = ?err, attempts = failures, "Retry attempts exhausted");
        } else {
            warn!(error = ?err, attempts = failures, "Giving up on non-retryable error");
        }
    }

    result
}

/// [`retry_with_backoff`] with the predicate bound to the error classifier.
///
/// Authentication, quota and client errors stop immediately; everything else
/// is retried within the budget of `settings`.
pub async fn retry_classified<T, E, F, Fut>(work: F, settings: &RetrySettings) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: ErrorSource + Debug + 'static,
{
    retry_with_backoff(work, &RetryPolicy::classified(settings.clone())).await
}

impl<E: Debug> RetryPolicy<E> {
    /// Run `work` under this policy. Same as [`retry_with_backoff`].
    pub async fn run<T, F, Fut>(&self, work: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        retry_with_backoff(work, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_settings(max_attempts: u32) -> RetrySettings {
        RetrySettings::default()
            .with_max_attempts(max_attempts)
            .with_initial_delay(Duration::from_millis(100))
            .with_jitter(false)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::<ApiError>::new(fast_settings(3));

        let result = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ApiError>(7)
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::<ApiError>::new(fast_settings(1));

        let result: Result<(), _> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::new(503, "unavailable"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_error_wins() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::<ApiError>::new(fast_settings(3));

        let result: Result<(), _> = policy
            .run(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(ApiError::new(500, format!("failure #{}", n)))
            })
            .await;

        assert_eq!(result, Err(ApiError::new(500, "failure #3")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_predicate_skipped_after_last_attempt() {
        for (max_attempts, expected_checks) in [(1, 0), (2, 1), (3, 2)] {
            let checks = Arc::new(AtomicU32::new(0));
            let counter = Arc::clone(&checks);
            let policy = RetryPolicy::<ApiError>::new(fast_settings(max_attempts)).when(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            });

            let result: Result<(), _> = policy
                .run(|| async { Err(ApiError::new(503, "unavailable")) })
                .await;

            assert!(result.is_err());
            assert_eq!(
                checks.load(Ordering::SeqCst),
                expected_checks,
                "max_attempts {}",
                max_attempts
            );
        }
    }

    /// Generic over `'a`, so this only compiles if the executor asks no more
    /// of `E` than `Debug`.
    async fn run_borrowed<'a>(
        policy: &RetryPolicy<&'a str>,
        message: &'a str,
    ) -> Result<(), &'a str> {
        retry_with_backoff(|| async { Err(message) }, policy).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_borrowed_error_type() {
        let policy = RetryPolicy::<&'static str>::new(fast_settings(2));

        assert_eq!(
            run_borrowed(&policy, "connection reset").await,
            Err("connection reset")
        );
    }
}
