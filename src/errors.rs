//! Error types and traits shared across the crate.

use thiserror::Error;

/// Trait for errors that can be classified as retryable or permanent.
///
/// The retry executor never inspects error values directly; it asks a
/// predicate. Types implementing this trait can be plugged in with
/// [`RetryPolicy::when_retryable`](crate::retry::RetryPolicy::when_retryable).
///
/// # Examples
///
/// ```rust
/// use note_retry::RetryableError;
///
/// enum SummarizeError {
///     UpstreamBusy,   // Retry
///     PromptTooLong,  // Don't retry, the same input fails again
/// }
///
/// impl RetryableError for SummarizeError {
///     fn is_retryable(&self) -> bool {
///         matches!(self, SummarizeError::UpstreamBusy)
///     }
/// }
/// ```
pub trait RetryableError {
    /// Returns true if this error represents a transient failure
    /// that might succeed when the same work is attempted again.
    fn is_retryable(&self) -> bool;
}

/// Error returned by an LLM or HTTP API call.
///
/// Work closures that talk to an upstream API can surface this type so the
/// classifier sees both the status code and the provider's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_api_error(*status, message))]
pub struct ApiError {
    /// HTTP status returned by the upstream, if any response arrived.
    pub status: Option<u16>,
    /// Message text reported by the upstream or the transport.
    pub message: String,
}

fn render_api_error(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("API error (HTTP {}): {}", status, message),
        None => format!("API error: {}", message),
    }
}

impl ApiError {
    /// Create an error carrying an HTTP status.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an error for a failure that produced no HTTP response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl RetryableError for ApiError {
    fn is_retryable(&self) -> bool {
        crate::classify::classify(self).retryable()
    }
}

/// Error produced when a retry settings document cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has wrongly typed fields.
    #[error("Invalid retry settings: {0}")]
    InvalidDocument(#[source] serde_json::Error),
}
