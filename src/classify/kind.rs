//! Classification kinds.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Category assigned to a failed unit of work.
///
/// Whether a kind is retryable is fixed per variant, see
/// [`ErrorKind::is_retryable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // === Permanent (Non-retryable) ===
    /// Missing, invalid or revoked credentials (HTTP 401/403).
    Authentication,
    /// Account quota, credit or billing limit reached.
    QuotaExceeded,
    /// Request rejected by the upstream as malformed (other HTTP 4xx).
    Client,

    // === Transient (Retryable) ===
    /// Upstream rate limit (HTTP 429 without quota language).
    RateLimit,
    /// Connection could not be established.
    Network,
    /// Request or connection timed out.
    Timeout,
    /// Upstream failure (HTTP 5xx).
    Server,
    /// Upstream response could not be parsed.
    Parsing,
    /// Nothing recognizable; assumed transient.
    Unknown,
}

impl ErrorKind {
    /// Every kind, in classification priority order.
    pub const ALL: [ErrorKind; 9] = [
        Self::Authentication,
        Self::QuotaExceeded,
        Self::RateLimit,
        Self::Network,
        Self::Timeout,
        Self::Server,
        Self::Client,
        Self::Parsing,
        Self::Unknown,
    ];

    /// Returns true if failures of this kind may succeed on a later attempt.
    pub const fn is_retryable(self) -> bool {
        !matches!(
            self,
            Self::Authentication | Self::QuotaExceeded | Self::Client
        )
    }

    /// Stable snake_case name, suitable for persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::QuotaExceeded => "quota_exceeded",
            Self::RateLimit => "rate_limit",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Server => "server",
            Self::Client => "client",
            Self::Parsing => "parsing",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown error kind: {0}")]
pub struct ParseErrorKindError(pub String);

impl FromStr for ErrorKind {
    type Err = ParseErrorKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseErrorKindError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        let permanent = [
            ErrorKind::Authentication,
            ErrorKind::QuotaExceeded,
            ErrorKind::Client,
        ];

        for kind in ErrorKind::ALL {
            assert_eq!(
                kind.is_retryable(),
                !permanent.contains(&kind),
                "unexpected retryability for {}",
                kind
            );
        }
    }

    #[test]
    fn test_parse_kind_names() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ErrorKind>(), Ok(kind));
        }
        assert_eq!(" RATE_LIMIT ".parse::<ErrorKind>(), Ok(ErrorKind::RateLimit));
        assert!("overloaded".parse::<ErrorKind>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
