//! # Note Retry
//!
//! Error classification and retry with jittered exponential backoff for
//! work that calls an LLM API, such as classifying, tagging or summarizing
//! notes.
//!
//! The crate has three parts:
//!
//! | Part | Entry point | Purpose |
//! |------|-------------|---------|
//! | Classifier | [`classify`] | Turn any error into an [`ErrorClassification`] |
//! | Executor | [`retry_with_backoff`] | Re-run failed work with growing, jittered delays |
//! | Messages | [`to_user_message`] | Render a fixed, user-safe message per [`ErrorKind`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use note_retry::{
//!     ApiError, RetryPolicy, RetrySettings, classify, retry_with_backoff, to_user_message,
//! };
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let settings = RetrySettings::from_env()
//!     .with_initial_delay(Duration::from_millis(1))
//!     .with_jitter(false);
//!
//! // Retry transient failures, stop at the first permanent one.
//! let policy = RetryPolicy::classified(settings).on_retry(|err: &ApiError, notice| {
//!     eprintln!("attempt {} failed: {}", notice.attempt, err);
//! });
//!
//! let result: Result<String, ApiError> =
//!     retry_with_backoff(|| async { Err(ApiError::new(401, "Invalid API key")) }, &policy).await;
//!
//! if let Err(err) = result {
//!     let message = to_user_message(&classify(&err));
//!     assert_eq!(message.title, "Authentication failed");
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller (task runner)
//!         │
//!         ▼
//! retry_with_backoff ──── RetryPolicy.is_retryable ──── classify
//!         │                                                │
//!         ▼                                                ▼
//!   work closure                                   to_user_message
//! ```
//!
//! ## Features
//!
//! - `tracing` - tracing instrumentation (enabled by default)

pub mod classify;
pub mod errors;
pub mod messages;
pub mod retry;

// Re-export commonly used types at the crate root
pub use classify::{DynError, ErrorClassification, ErrorKind, ErrorSource, classify};
pub use errors::{ApiError, ConfigError, RetryableError};
pub use messages::{
    Locale, UserMessage, to_localized_user_message, to_user_message, user_message_for_kind,
    user_message_for_kind_name,
};
pub use retry::{
    RetryNotice, RetryPolicy, RetrySettings, retry_classified, retry_with_backoff,
};
