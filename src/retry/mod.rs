//! Retry with exponential, jittered backoff.

pub(crate) mod backoff;
pub(crate) mod executor;
pub(crate) mod policy;
pub(crate) mod settings;

pub use backoff::{JITTER_FRACTION, JitteredBackoff, JitteredBackoffIter, apply_jitter};
pub use executor::{retry_classified, retry_with_backoff};
pub use policy::{OnRetryCallback, RetryNotice, RetryPolicy, RetryPredicate};
pub use settings::{
    ENV_BACKOFF_MULTIPLIER, ENV_INITIAL_DELAY_MS, ENV_JITTER, ENV_MAX_ATTEMPTS, ENV_MAX_DELAY_MS,
    RetrySettings,
};
