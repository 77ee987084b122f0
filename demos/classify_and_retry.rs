//! Example demonstrating classification-driven retries.
//!
//! A simulated summarization call is rate limited twice before it succeeds.
//! A second call fails with a bad API key, is not retried, and is rendered
//! through the user message table.
//!
//! # Running
//!
//! ```bash
//! NOTE_RETRY_INITIAL_DELAY_MS=200 cargo run --example classify_and_retry
//! ```

use note_retry::{
    ApiError, Locale, RetryPolicy, RetrySettings, classify, retry_with_backoff,
    to_localized_user_message,
};
use std::sync::atomic::{AtomicU32, Ordering};

async fn summarize(calls: &AtomicU32) -> Result<String, ApiError> {
    match calls.fetch_add(1, Ordering::SeqCst) {
        0 | 1 => Err(ApiError::new(429, "Rate limit exceeded")),
        _ => Ok("Meeting notes: ship the beta on Friday.".to_string()),
    }
}

#[tokio::main]
async fn main() {
    // Settings come from NOTE_RETRY_* variables, falling back to defaults
    let settings = RetrySettings::from_env();
    println!("Using {:?}\n", settings);

    let policy = RetryPolicy::classified(settings).on_retry(|err: &ApiError, notice| {
        println!(
            "[RETRY #{}] {} | next attempt in {:.2}s",
            notice.attempt,
            err,
            notice.delay.as_secs_f64()
        );
    });

    let calls = AtomicU32::new(0);
    match retry_with_backoff(|| summarize(&calls), &policy).await {
        Ok(summary) => println!("Summary after {} calls: {}\n", calls.load(Ordering::SeqCst), summary),
        Err(err) => println!("Summarization failed: {}\n", err),
    }

    let result: Result<String, ApiError> = retry_with_backoff(
        || async { Err(ApiError::new(401, "Invalid API key")) },
        &policy,
    )
    .await;

    if let Err(err) = result {
        let classification = classify(&err);
        println!(
            "Gave up: kind={} status={:?} retryable={}",
            classification.kind(),
            classification.http_status(),
            classification.retryable()
        );

        for locale in [Locale::En, Locale::ZhCn] {
            let message = to_localized_user_message(&classification, locale);
            println!("  {} - {} ({})", message.title, message.message, message.suggestion);
        }
    }
}
