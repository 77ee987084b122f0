//! Retry policy: settings plus the retryability predicate and retry hook.

use super::settings::RetrySettings;
use crate::classify::{ErrorSource, classify};
use crate::errors::RetryableError;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Predicate deciding whether a failed attempt may be retried.
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Callback type for retry notifications.
///
/// Invoked once per scheduled retry, before sleeping, with the error that
/// caused it and a [`RetryNotice`]. A task runner can use it to persist its
/// retry count and next retry time.
pub type OnRetryCallback<E> = Arc<dyn Fn(&E, RetryNotice) + Send + Sync>;

/// Details of a scheduled retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryNotice {
    /// The 1-based attempt that just failed.
    pub attempt: u32,
    /// How long the executor sleeps before the next attempt.
    pub delay: Duration,
}

/// Full retry policy for one invocation of the executor.
///
/// # Example
///
/// ```rust
/// use note_retry::{RetryPolicy, RetrySettings};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::<std::io::Error>::new(
///     RetrySettings::default().with_initial_delay(Duration::from_millis(200)),
/// )
/// .when(|err| err.kind() != std::io::ErrorKind::PermissionDenied)
/// .on_retry(|err, notice| {
///     println!("attempt {} failed ({}), retrying in {:?}", notice.attempt, err, notice.delay);
/// });
/// ```
pub struct RetryPolicy<E> {
    settings: RetrySettings,
    is_retryable: RetryPredicate<E>,
    on_retry: Option<OnRetryCallback<E>>,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            is_retryable: Arc::clone(&self.is_retryable),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("settings", &self.settings)
            .field("is_retryable", &"...")
            .field("on_retry", &self.on_retry.as_ref().map(|_| "..."))
            .finish()
    }
}

impl<E: 'static> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new(RetrySettings::default())
    }
}

impl<E: 'static> RetryPolicy<E> {
    /// Policy that treats every error as retryable.
    pub fn new(settings: RetrySettings) -> Self {
        Self {
            settings,
            is_retryable: Arc::new(|_: &E| true),
            on_retry: None,
        }
    }

    /// Replace the retryability predicate.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.is_retryable = Arc::new(predicate);
        self
    }

    /// Set a callback to be invoked on each retry attempt.
    pub fn on_retry<F>(mut self, callback: F) -> Self
    where
        F: Fn(&E, RetryNotice) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(callback));
        self
    }
}

impl<E> RetryPolicy<E> {
    /// Replace the settings, keeping predicate and callback.
    pub fn with_settings(mut self, settings: RetrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Get reference to the retry settings.
    pub fn settings(&self) -> &RetrySettings {
        &self.settings
    }

    /// Ask the predicate whether `error` may be retried.
    pub fn should_retry(&self, error: &E) -> bool {
        (self.is_retryable)(error)
    }

    /// Invoke the retry callback, if one is set.
    pub fn notify(&self, error: &E, notice: RetryNotice) {
        if let Some(ref callback) = self.on_retry {
            callback(error, notice);
        }
    }
}

impl<E: RetryableError + 'static> RetryPolicy<E> {
    /// Bind the predicate to [`RetryableError::is_retryable`].
    pub fn when_retryable(self) -> Self {
        self.when(|err: &E| err.is_retryable())
    }
}

impl<E: ErrorSource + 'static> RetryPolicy<E> {
    /// Policy whose predicate is `classify(error).retryable()`.
    pub fn classified(settings: RetrySettings) -> Self {
        Self::new(settings).when(|err: &E| classify(err).retryable())
    }
}
