//! Classification result value.

use super::kind::ErrorKind;
use crate::errors::RetryableError;
use serde::Serialize;

/// Structured verdict about a single failure.
///
/// Built fresh for every classified error. `retryable` is derived from
/// `kind` on construction and cannot be set independently.
///
/// The `original` rendering of the source error is kept for logs only and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorClassification {
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    retryable: bool,
    detail: String,
    #[serde(skip)]
    original: String,
}

impl ErrorClassification {
    /// Create a classification. Retryability follows from `kind`.
    pub fn new(
        kind: ErrorKind,
        http_status: Option<u16>,
        detail: impl Into<String>,
        original: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            http_status,
            retryable: kind.is_retryable(),
            detail: detail.into(),
            original: original.into(),
        }
    }

    /// The assigned category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status exposed by the source error, if any.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Whether the failed work may be attempted again.
    pub fn retryable(&self) -> bool {
        self.retryable
    }

    /// Best-effort message text. For logging, not for end users.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Debug rendering of the source error.
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl RetryableError for ErrorClassification {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_follows_kind() {
        let auth = ErrorClassification::new(ErrorKind::Authentication, Some(401), "bad key", "");
        assert!(!auth.retryable());
        assert!(!auth.is_retryable());

        let server = ErrorClassification::new(ErrorKind::Server, Some(502), "bad gateway", "");
        assert!(server.retryable());
    }

    #[test]
    fn test_serialization_omits_original() {
        let classification = ErrorClassification::new(
            ErrorKind::RateLimit,
            Some(429),
            "Rate limit exceeded",
            "secret-bearing debug output",
        );
        let json = serde_json::to_value(&classification).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "rate_limit",
                "httpStatus": 429,
                "retryable": true,
                "detail": "Rate limit exceeded",
            })
        );
    }
}
