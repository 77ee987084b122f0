//! User-facing messages for classified failures.
//!
//! Raw error text never reaches end users; presentation layers render the
//! fixed entry for the classification's kind instead.

use crate::classify::{ErrorClassification, ErrorKind};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Language of the rendered message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    ZhCn,
}

/// Title, message and suggestion shown for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    /// Short heading, e.g. "Request timed out".
    pub title: &'static str,
    /// One sentence describing what went wrong.
    pub message: &'static str,
    /// What the user can do about it.
    pub suggestion: &'static str,
}

const fn entry(title: &'static str, message: &'static str, suggestion: &'static str) -> UserMessage {
    UserMessage {
        title,
        message,
        suggestion,
    }
}

static EN_MESSAGES: Lazy<HashMap<ErrorKind, UserMessage>> = Lazy::new(|| {
    HashMap::from([
        (
            ErrorKind::Authentication,
            entry(
                "Authentication failed",
                "The AI service rejected the configured API key.",
                "Check the API key in settings and make sure it is still valid.",
            ),
        ),
        (
            ErrorKind::QuotaExceeded,
            entry(
                "Quota exceeded",
                "The AI service account has run out of credit or quota.",
                "Top up the account balance or raise the usage limit, then try again.",
            ),
        ),
        (
            ErrorKind::RateLimit,
            entry(
                "Too many requests",
                "The AI service is limiting how often requests can be sent.",
                "Wait a moment and try again.",
            ),
        ),
        (
            ErrorKind::Network,
            entry(
                "Network error",
                "The AI service could not be reached.",
                "Check your internet connection and proxy settings.",
            ),
        ),
        (
            ErrorKind::Timeout,
            entry(
                "Request timed out",
                "The AI service took too long to respond.",
                "Try again later, or shorten the note being processed.",
            ),
        ),
        (
            ErrorKind::Server,
            entry(
                "Service unavailable",
                "The AI service ran into an internal error.",
                "This is usually temporary. Try again in a few minutes.",
            ),
        ),
        (
            ErrorKind::Client,
            entry(
                "Request rejected",
                "The AI service could not accept this request.",
                "Check the model and request settings.",
            ),
        ),
        (
            ErrorKind::Parsing,
            entry(
                "Unexpected response",
                "The AI service returned a response that could not be read.",
                "Try again. If it keeps happening, switch to another model.",
            ),
        ),
        (ErrorKind::Unknown, UNKNOWN_FALLBACK),
    ])
});

static ZH_CN_MESSAGES: Lazy<HashMap<ErrorKind, UserMessage>> = Lazy::new(|| {
    HashMap::from([
        (
            ErrorKind::Authentication,
            entry("认证失败", "AI 服务拒绝了当前配置的 API 密钥。", "请在设置中检查 API 密钥是否正确且仍然有效。"),
        ),
        (
            ErrorKind::QuotaExceeded,
            entry("额度已用尽", "AI 服务账户的余额或配额已不足。", "请充值或提高使用上限后重试。"),
        ),
        (
            ErrorKind::RateLimit,
            entry("请求过于频繁", "AI 服务限制了请求频率。", "请稍候片刻再试。"),
        ),
        (
            ErrorKind::Network,
            entry("网络错误", "无法连接到 AI 服务。", "请检查网络连接和代理设置。"),
        ),
        (
            ErrorKind::Timeout,
            entry("请求超时", "AI 服务响应时间过长。", "请稍后重试，或缩短要处理的笔记。"),
        ),
        (
            ErrorKind::Server,
            entry("服务暂不可用", "AI 服务发生内部错误。", "通常是暂时性问题，请几分钟后重试。"),
        ),
        (
            ErrorKind::Client,
            entry("请求被拒绝", "AI 服务无法接受此请求。", "请检查模型和请求设置。"),
        ),
        (
            ErrorKind::Parsing,
            entry("响应异常", "AI 服务返回的内容无法解析。", "请重试，如持续出现请更换模型。"),
        ),
        (
            ErrorKind::Unknown,
            entry("出现错误", "处理笔记时发生了意外错误。", "请稍后重试。"),
        ),
    ])
});

fn table(locale: Locale) -> &'static HashMap<ErrorKind, UserMessage> {
    match locale {
        Locale::En => &*EN_MESSAGES,
        Locale::ZhCn => &*ZH_CN_MESSAGES,
    }
}

/// Look up the entry for `kind`, falling back to the Unknown entry.
pub fn user_message_for_kind(kind: ErrorKind, locale: Locale) -> UserMessage {
    let table = table(locale);
    table
        .get(&kind)
        .or_else(|| table.get(&ErrorKind::Unknown))
        .copied()
        .unwrap_or(UNKNOWN_FALLBACK)
}

/// Look up the entry for a stored kind name such as `"rate_limit"`.
///
/// Unrecognized names resolve to the Unknown entry.
pub fn user_message_for_kind_name(name: &str, locale: Locale) -> UserMessage {
    let kind = name.parse().unwrap_or(ErrorKind::Unknown);
    user_message_for_kind(kind, locale)
}

/// English message for a classification.
///
/// ```rust
/// use note_retry::{classify, to_user_message};
/// use serde_json::json;
///
/// let classification = classify(&json!({ "status": 500, "message": "Internal Server Error" }));
/// assert_eq!(to_user_message(&classification).title, "Service unavailable");
/// ```
pub fn to_user_message(classification: &ErrorClassification) -> UserMessage {
    to_localized_user_message(classification, Locale::default())
}

/// Message for a classification in the given locale.
pub fn to_localized_user_message(
    classification: &ErrorClassification,
    locale: Locale,
) -> UserMessage {
    user_message_for_kind(classification.kind(), locale)
}

const UNKNOWN_FALLBACK: UserMessage = entry(
    "Something went wrong",
    "An unexpected error occurred while processing the note.",
    "Try again later.",
);
