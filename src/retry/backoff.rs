//! Exponential backoff schedule with symmetric jitter.

use super::settings::RetrySettings;
use backon::BackoffBuilder;
use rand::Rng;
use std::time::Duration;

/// Fraction of the base delay by which jitter may move it in either direction.
pub const JITTER_FRACTION: f64 = 0.25;

/// Backoff builder producing the delays between attempts.
///
/// Yields exactly `max_attempts - 1` delays. The delay preceding attempt
/// `n + 1` is `min(initial_delay * multiplier^(n - 1), max_delay)`, optionally
/// jittered by ±25% and capped at `max_delay` again afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitteredBackoff {
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
    jitter: bool,
    max_retries: u32,
}

impl JitteredBackoff {
    /// Build a schedule from settings, normalizing them first.
    pub fn from_settings(settings: &RetrySettings) -> Self {
        let settings = settings.clone().normalized();
        Self {
            initial_delay: settings.initial_delay,
            multiplier: settings.backoff_multiplier,
            max_delay: settings.max_delay,
            jitter: settings.jitter,
            max_retries: settings.max_attempts - 1,
        }
    }

    /// Number of delays (retries) this schedule yields.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl BackoffBuilder for JitteredBackoff {
    type Backoff = JitteredBackoffIter;

    fn build(self) -> Self::Backoff {
        JitteredBackoffIter {
            base: self.initial_delay,
            multiplier: self.multiplier,
            max_delay: self.max_delay,
            jitter: self.jitter,
            remaining: self.max_retries,
        }
    }
}

/// Iterator over the delays of a [`JitteredBackoff`].
#[derive(Debug, Clone)]
pub struct JitteredBackoffIter {
    base: Duration,
    multiplier: f64,
    max_delay: Duration,
    jitter: bool,
    remaining: u32,
}

impl Iterator for JitteredBackoffIter {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let actual = apply_jitter(self.base, self.jitter).min(self.max_delay);
        self.base = scale(self.base, self.multiplier, self.max_delay);
        Some(actual)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

/// Multiply `delay` by `factor`, saturating at `cap`.
fn scale(delay: Duration, factor: f64, cap: Duration) -> Duration {
    let nanos = (delay.as_nanos() as f64 * factor).round();
    if !nanos.is_finite() || nanos >= cap.as_nanos() as f64 {
        return cap;
    }
    Duration::from_nanos(nanos.max(0.0) as u64)
}

/// Move `base` uniformly within ±25% when `enabled`, never below zero.
///
/// With jitter disabled the delay is returned unchanged.
pub fn apply_jitter(base: Duration, enabled: bool) -> Duration {
    if !enabled || base.is_zero() {
        return base;
    }
    let offset: f64 = rand::thread_rng().gen_range(-JITTER_FRACTION..=JITTER_FRACTION);
    let nanos = (base.as_nanos() as f64 * (1.0 + offset)).round().max(0.0);
    if nanos >= u64::MAX as f64 {
        return base;
    }
    Duration::from_nanos(nanos as u64)
}
