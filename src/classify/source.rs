//! Probes for extracting a status code and message from arbitrary errors.

use crate::errors::ApiError;
use serde_json::Value;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};
use std::io;

/// Structured view of an error value, as seen by the classifier.
///
/// Every probe is optional. The classifier tries the status probes in the
/// order `status`, `status_code`, `response_status` and the message probes
/// in the order `message`, `nested_message`, `text`, falling back to
/// `describe` when none of them answer.
pub trait ErrorSource {
    /// A top-level `status` field.
    fn status(&self) -> Option<u16> {
        None
    }

    /// A top-level `statusCode` field.
    fn status_code(&self) -> Option<u16> {
        None
    }

    /// The status of an attached HTTP response.
    fn response_status(&self) -> Option<u16> {
        None
    }

    /// A top-level `message` field.
    fn message(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// The message of a nested `error` object.
    fn nested_message(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// The value itself, when it already is a string.
    fn text(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// String conversion of the whole value.
    fn describe(&self) -> String;
}

/// Keep only values that can plausibly be an HTTP status.
pub(crate) fn plausible_status(status: u64) -> Option<u16> {
    (100..=999)
        .contains(&status)
        .then(|| u16::try_from(status).ok())
        .flatten()
}

impl<T: ErrorSource + ?Sized> ErrorSource for &T {
    fn status(&self) -> Option<u16> {
        (**self).status()
    }

    fn status_code(&self) -> Option<u16> {
        (**self).status_code()
    }

    fn response_status(&self) -> Option<u16> {
        (**self).response_status()
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        (**self).message()
    }

    fn nested_message(&self) -> Option<Cow<'_, str>> {
        (**self).nested_message()
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        (**self).text()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// `None` behaves like a missing (null) error.
impl<T: ErrorSource> ErrorSource for Option<T> {
    fn status(&self) -> Option<u16> {
        self.as_ref().and_then(|e| e.status())
    }

    fn status_code(&self) -> Option<u16> {
        self.as_ref().and_then(|e| e.status_code())
    }

    fn response_status(&self) -> Option<u16> {
        self.as_ref().and_then(|e| e.response_status())
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|e| e.message())
    }

    fn nested_message(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|e| e.nested_message())
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|e| e.text())
    }

    fn describe(&self) -> String {
        match self {
            Some(e) => e.describe(),
            None => "undefined".to_string(),
        }
    }
}

impl ErrorSource for str {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl ErrorSource for String {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

// =============================================================================
// JSON error objects
// =============================================================================

fn json_status(value: Option<&Value>) -> Option<u16> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(plausible_status),
        Value::String(s) => s.trim().parse::<u64>().ok().and_then(plausible_status),
        _ => None,
    }
}

fn json_str(value: Option<&Value>) -> Option<Cow<'_, str>> {
    value?.as_str().map(Cow::Borrowed)
}

/// Duck-typed error objects as returned by HTTP APIs and JS-style clients.
impl ErrorSource for Value {
    fn status(&self) -> Option<u16> {
        json_status(self.get("status"))
    }

    fn status_code(&self) -> Option<u16> {
        json_status(self.get("statusCode"))
    }

    fn response_status(&self) -> Option<u16> {
        json_status(self.get("response").and_then(|r| r.get("status")))
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        json_str(self.get("message"))
    }

    fn nested_message(&self) -> Option<Cow<'_, str>> {
        json_str(self.get("error").and_then(|e| e.get("message")))
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        json_str(Some(self))
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

// =============================================================================
// Rust error types
// =============================================================================

impl ErrorSource for ApiError {
    fn status(&self) -> Option<u16> {
        self.status
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.message.as_str()))
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Transport failures are tagged with the keyword the classifier looks for,
/// since reqwest's own messages do not mention them.
impl ErrorSource for reqwest::Error {
    fn response_status(&self) -> Option<u16> {
        reqwest::Error::status(self).map(|s| s.as_u16())
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        let message = if self.is_timeout() {
            format!("timeout: {}", self)
        } else if self.is_connect() {
            format!("network: {}", self)
        } else if self.is_decode() {
            format!("invalid response: {}", self)
        } else {
            self.to_string()
        };
        Some(Cow::Owned(message))
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

impl ErrorSource for io::Error {
    fn message(&self) -> Option<Cow<'_, str>> {
        let message = match self.kind() {
            io::ErrorKind::TimedOut => format!("etimedout: {}", self),
            io::ErrorKind::ConnectionRefused => format!("econnrefused: {}", self),
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected => format!("network: {}", self),
            _ => self.to_string(),
        };
        Some(Cow::Owned(message))
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Adapter for any `std::error::Error` trait object.
///
/// The error's own display text is the message, and its first `source()`
/// provides the nested message.
///
/// ```rust
/// use note_retry::{classify, DynError, ErrorKind};
///
/// let err: Box<dyn std::error::Error> = "upstream returned invalid JSON".into();
/// let classification = classify(DynError(err.as_ref()));
/// assert_eq!(classification.kind(), ErrorKind::Parsing);
/// ```
#[derive(Clone, Copy)]
pub struct DynError<'a>(pub &'a (dyn StdError + 'a));

impl Debug for DynError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.0, f)
    }
}

impl ErrorSource for DynError<'_> {
    fn message(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.0.to_string()))
    }

    fn nested_message(&self) -> Option<Cow<'_, str>> {
        self.0.source().map(|source| Cow::Owned(source.to_string()))
    }

    fn describe(&self) -> String {
        format!("{:?}", self.0)
    }
}
