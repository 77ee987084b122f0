//! Retry settings and their configuration sources.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::warn;

/// Environment variable for [`RetrySettings::max_attempts`].
pub const ENV_MAX_ATTEMPTS: &str = "NOTE_RETRY_MAX_ATTEMPTS";
/// Environment variable for [`RetrySettings::initial_delay`], in milliseconds.
pub const ENV_INITIAL_DELAY_MS: &str = "NOTE_RETRY_INITIAL_DELAY_MS";
/// Environment variable for [`RetrySettings::backoff_multiplier`].
pub const ENV_BACKOFF_MULTIPLIER: &str = "NOTE_RETRY_BACKOFF_MULTIPLIER";
/// Environment variable for [`RetrySettings::max_delay`], in milliseconds.
pub const ENV_MAX_DELAY_MS: &str = "NOTE_RETRY_MAX_DELAY_MS";
/// Environment variable for [`RetrySettings::jitter`].
pub const ENV_JITTER: &str = "NOTE_RETRY_JITTER";

/// Configuration for retry behavior.
///
/// Use the builder pattern to customize retry settings:
///
/// ```rust
/// use note_retry::RetrySettings;
/// use std::time::Duration;
///
/// let settings = RetrySettings::default()
///     .with_max_attempts(5)
///     .with_initial_delay(Duration::from_millis(500))
///     .with_max_delay(Duration::from_secs(60))
///     .with_backoff_multiplier(1.5)
///     .with_jitter(false);
///
/// assert_eq!(settings.max_attempts, 5);
/// ```
///
/// Fields are public; values out of range are normalized (see
/// [`RetrySettings::normalized`]) before a schedule is built, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrySettings {
    /// Total attempts including the first (default: 3).
    pub max_attempts: u32,
    /// Delay before the second attempt (default: 1 second).
    #[serde(with = "duration_ms")]
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays (default: 2.0).
    pub backoff_multiplier: f64,
    /// Upper bound of any single delay (default: 10 seconds).
    #[serde(with = "duration_ms")]
    pub max_delay: Duration,
    /// Randomize each delay by ±25% (default: true).
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(10_000),
            jitter: true,
        }
    }
}

impl RetrySettings {
    /// Set the total number of attempts, including the first.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay preceding the second attempt.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the exponential backoff factor.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the maximum delay between attempts.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Clamp every field into its valid range.
    ///
    /// - `max_attempts` is at least 1
    /// - `backoff_multiplier` is finite and at least 1
    /// - `max_delay` is at least `initial_delay`
    pub fn normalized(mut self) -> Self {
        self.max_attempts = self.max_attempts.max(1);
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            self.backoff_multiplier = 1.0;
        }
        self.max_delay = self.max_delay.max(self.initial_delay);
        self
    }

    /// Read settings from `NOTE_RETRY_*` environment variables.
    ///
    /// Missing or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// ```rust
    /// use note_retry::RetrySettings;
    /// use std::time::Duration;
    ///
    /// let settings = RetrySettings::from_lookup(|key| match key {
    ///     "NOTE_RETRY_MAX_ATTEMPTS" => Some("5".to_string()),
    ///     "NOTE_RETRY_JITTER" => Some("off".to_string()),
    ///     _ => None,
    /// });
    ///
    /// assert_eq!(settings.max_attempts, 5);
    /// assert!(!settings.jitter);
    /// assert_eq!(settings.initial_delay, Duration::from_secs(1));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_attempts: parse_or(&lookup, ENV_MAX_ATTEMPTS, defaults.max_attempts),
            initial_delay: Duration::from_millis(parse_or(
                &lookup,
                ENV_INITIAL_DELAY_MS,
                millis(defaults.initial_delay),
            )),
            backoff_multiplier: parse_or(
                &lookup,
                ENV_BACKOFF_MULTIPLIER,
                defaults.backoff_multiplier,
            ),
            max_delay: Duration::from_millis(parse_or(
                &lookup,
                ENV_MAX_DELAY_MS,
                millis(defaults.max_delay),
            )),
            jitter: lookup(ENV_JITTER)
                .and_then(|raw| parse_flag(&raw).or_else(|| malformed(ENV_JITTER, &raw)))
                .unwrap_or(defaults.jitter),
        }
        .normalized()
    }

    /// Parse settings from a JSON document such as
    /// `{"maxAttempts": 5, "initialDelay": 250}`.
    ///
    /// Every key is optional. Only an invalid document is an error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)
            .map(Self::normalized)
            .map_err(ConfigError::InvalidDocument)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|raw| {
            raw.trim()
                .parse::<T>()
                .ok()
                .or_else(|| malformed(key, &raw))
        })
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn malformed<T>(key: &str, raw: &str) -> Option<T> {
    #[cfg(feature = "tracing")]
    warn!(key = %key, value = %raw, "Ignoring malformed retry setting, using default");
    None
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(super::millis(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_settings_default() {
        let settings = RetrySettings::default();
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.initial_delay, Duration::from_millis(1000));
        assert_eq!(settings.backoff_multiplier, 2.0);
        assert_eq!(settings.max_delay, Duration::from_millis(10_000));
        assert!(settings.jitter);
    }

    #[test]
    fn test_settings_with_methods() {
        let settings = RetrySettings::default()
            .with_max_attempts(7)
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_multiplier(3.0)
            .with_max_delay(Duration::from_secs(2))
            .with_jitter(false);

        assert_eq!(settings.max_attempts, 7);
        assert_eq!(settings.initial_delay, Duration::from_millis(100));
        assert_eq!(settings.backoff_multiplier, 3.0);
        assert_eq!(settings.max_delay, Duration::from_secs(2));
        assert!(!settings.jitter);
    }

    #[test]
    fn test_normalized_clamps_ranges() {
        let settings = RetrySettings::default()
            .with_max_attempts(0)
            .with_backoff_multiplier(0.5)
            .with_initial_delay(Duration::from_secs(5))
            .with_max_delay(Duration::from_secs(1))
            .normalized();

        assert_eq!(settings.max_attempts, 1);
        assert_eq!(settings.backoff_multiplier, 1.0);
        assert_eq!(settings.max_delay, Duration::from_secs(5));

        let nan = RetrySettings::default()
            .with_backoff_multiplier(f64::NAN)
            .normalized();
        assert_eq!(nan.backoff_multiplier, 1.0);
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_MAX_ATTEMPTS, "4"),
            (ENV_INITIAL_DELAY_MS, "250"),
            (ENV_BACKOFF_MULTIPLIER, "1.5"),
            (ENV_MAX_DELAY_MS, "4000"),
            (ENV_JITTER, "false"),
        ]);
        let settings = RetrySettings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.max_attempts, 4);
        assert_eq!(settings.initial_delay, Duration::from_millis(250));
        assert_eq!(settings.backoff_multiplier, 1.5);
        assert_eq!(settings.max_delay, Duration::from_millis(4000));
        assert!(!settings.jitter);
    }

    #[test]
    fn test_from_lookup_falls_back_silently() {
        let settings = RetrySettings::from_lookup(|_| None);
        assert_eq!(settings, RetrySettings::default());

        let malformed = RetrySettings::from_lookup(|key| match key {
            ENV_MAX_ATTEMPTS => Some("three".to_string()),
            ENV_JITTER => Some("maybe".to_string()),
            ENV_INITIAL_DELAY_MS => Some("-5".to_string()),
            _ => None,
        });
        assert_eq!(malformed, RetrySettings::default());
    }

    #[test]
    fn test_from_json_partial_document() {
        let settings =
            RetrySettings::from_json_str(r#"{"maxAttempts": 5, "initialDelay": 100}"#).unwrap();

        assert_eq!(settings.max_attempts, 5);
        assert_eq!(settings.initial_delay, Duration::from_millis(100));
        assert_eq!(settings.max_delay, Duration::from_millis(10_000));
        assert!(settings.jitter);

        assert_eq!(
            RetrySettings::from_json_str("{}").unwrap(),
            RetrySettings::default()
        );
    }

    #[test]
    fn test_from_json_rejects_invalid_document() {
        assert!(matches!(
            RetrySettings::from_json_str(r#"{"maxAttempts": "lots"}"#),
            Err(ConfigError::InvalidDocument(_))
        ));
        assert!(RetrySettings::from_json_str("not json").is_err());
    }

    #[test]
    fn test_json_uses_millis() {
        let json = serde_json::to_value(RetrySettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "maxAttempts": 3,
                "initialDelay": 1000,
                "backoffMultiplier": 2.0,
                "maxDelay": 10000,
                "jitter": true,
            })
        );
    }
}
