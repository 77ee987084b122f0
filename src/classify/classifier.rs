//! Keyword and status based error classification.

use super::classification::ErrorClassification;
use super::kind::ErrorKind;
use super::source::ErrorSource;

#[cfg(feature = "tracing")]
use tracing::debug;

const AUTHENTICATION_KEYWORDS: &[&str] = &[
    "api key",
    "authentication",
    "unauthorized",
    "invalid api key",
    "forbidden",
    // zh-CN
    "未授权",
    "认证",
    "密钥",
];

const QUOTA_KEYWORDS: &[&str] = &["quota", "credit", "balance", "billing", "usage limit"];

const RATE_LIMIT_KEYWORDS: &[&str] = &["rate limit", "too many requests"];

const NETWORK_KEYWORDS: &[&str] = &["network", "econnrefused", "enotfound"];

const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "etimedout"];

const PARSING_KEYWORDS: &[&str] = &["json", "parse", "invalid response", "unexpected token"];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// Extract the HTTP status: `status`, then `status_code`, then `response_status`.
pub fn extract_status<S: ErrorSource + ?Sized>(source: &S) -> Option<u16> {
    source
        .status()
        .or_else(|| source.status_code())
        .or_else(|| source.response_status())
}

/// Extract the message: `message`, then `nested_message`, then `text`,
/// else the string conversion of the value.
pub fn extract_message<S: ErrorSource + ?Sized>(source: &S) -> String {
    source
        .message()
        .or_else(|| source.nested_message())
        .or_else(|| source.text())
        .map(|message| message.into_owned())
        .unwrap_or_else(|| source.describe())
}

/// Decide the kind for a status and lowercased message.
///
/// First match wins. Quota language is checked before the generic 429 rule so
/// that an exhausted account is not retried as a transient rate limit.
pub fn kind_for(status: Option<u16>, lowered_message: &str) -> ErrorKind {
    let msg = lowered_message;

    if matches!(status, Some(401 | 403)) || contains_any(msg, AUTHENTICATION_KEYWORDS) {
        return ErrorKind::Authentication;
    }
    if contains_any(msg, QUOTA_KEYWORDS) {
        return ErrorKind::QuotaExceeded;
    }
    if status == Some(429) || contains_any(msg, RATE_LIMIT_KEYWORDS) {
        return ErrorKind::RateLimit;
    }
    if contains_any(msg, NETWORK_KEYWORDS) {
        return ErrorKind::Network;
    }
    if contains_any(msg, TIMEOUT_KEYWORDS) {
        return ErrorKind::Timeout;
    }
    match status {
        Some(500..=599) => return ErrorKind::Server,
        Some(400..=499) => return ErrorKind::Client,
        _ => {}
    }
    if contains_any(msg, PARSING_KEYWORDS) {
        return ErrorKind::Parsing;
    }
    ErrorKind::Unknown
}

/// Classify an error.
///
/// Total over every [`ErrorSource`]: values exposing nothing recognizable
/// (including `None` and JSON `null`) classify as [`ErrorKind::Unknown`].
///
/// # Example
///
/// ```rust
/// use note_retry::{classify, ErrorKind};
/// use serde_json::json;
///
/// let classification = classify(&json!({ "status": 500, "message": "Internal Server Error" }));
/// assert_eq!(classification.kind(), ErrorKind::Server);
/// assert_eq!(classification.http_status(), Some(500));
/// assert!(classification.retryable());
/// ```
pub fn classify<S: ErrorSource>(error: S) -> ErrorClassification {
    let status = extract_status(&error);
    let detail = extract_message(&error);
    let kind = kind_for(status, &detail.to_lowercase());

    let classification = ErrorClassification::new(kind, status, detail, error.describe());

    #[cfg(feature = "tracing")]
    debug!(
        kind = %classification.kind(),
        http_status = ?classification.http_status(),
        retryable = classification.retryable(),
        detail = %classification.detail(),
        "Classified error"
    );

    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_rules() {
        let cases = [
            (401, ErrorKind::Authentication),
            (403, ErrorKind::Authentication),
            (429, ErrorKind::RateLimit),
            (500, ErrorKind::Server),
            (503, ErrorKind::Server),
            (599, ErrorKind::Server),
            (400, ErrorKind::Client),
            (404, ErrorKind::Client),
            (422, ErrorKind::Client),
            (302, ErrorKind::Unknown),
        ];

        for (status, expected) in cases {
            assert_eq!(kind_for(Some(status), ""), expected, "status {}", status);
        }
    }

    #[test]
    fn test_keyword_rules() {
        let cases = [
            ("invalid api key provided", ErrorKind::Authentication),
            ("request forbidden", ErrorKind::Authentication),
            ("monthly usage limit reached", ErrorKind::QuotaExceeded),
            ("too many requests", ErrorKind::RateLimit),
            ("network unreachable", ErrorKind::Network),
            ("connect econnrefused 127.0.0.1:443", ErrorKind::Network),
            ("getaddrinfo enotfound api.example.com", ErrorKind::Network),
            ("request timeout after 30s", ErrorKind::Timeout),
            ("unexpected token < in json at position 0", ErrorKind::Parsing),
            ("something odd happened", ErrorKind::Unknown),
            ("未授权的请求", ErrorKind::Authentication),
            ("api 密钥无效", ErrorKind::Authentication),
        ];

        for (message, expected) in cases {
            assert_eq!(kind_for(None, message), expected, "message {:?}", message);
        }
    }

    #[test]
    fn test_priority_order() {
        // Quota language beats a bare 429.
        assert_eq!(
            kind_for(Some(429), "you exceeded your current quota"),
            ErrorKind::QuotaExceeded
        );
        // Authentication beats everything, including server statuses.
        assert_eq!(
            kind_for(Some(500), "unauthorized"),
            ErrorKind::Authentication
        );
        // Network keywords are checked before timeouts.
        assert_eq!(kind_for(None, "network timeout"), ErrorKind::Network);
        // Near misses of keywords fall through to the status rules.
        assert_eq!(kind_for(Some(400), "rate_limit_error"), ErrorKind::Client);
        assert_eq!(kind_for(Some(404), "lookup timed out"), ErrorKind::Client);
        assert_eq!(kind_for(Some(500), "missing api_key field"), ErrorKind::Server);
        // Status-based client rule is checked before parsing keywords.
        assert_eq!(kind_for(Some(400), "could not parse body"), ErrorKind::Client);
    }

    #[test]
    fn test_extract_order() {
        let value = serde_json::json!({
            "statusCode": 502,
            "response": { "status": 504 },
            "error": { "message": "upstream failed" },
        });
        assert_eq!(extract_status(&value), Some(502));
        assert_eq!(extract_message(&value), "upstream failed");

        let bare = serde_json::json!(12);
        assert_eq!(extract_message(&bare), "12");
    }
}
