//! Log Redaction Layer
//!
//! Scrubs bot tokens, API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{6,12}:[A-Za-z0-9_-]{30,}").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BOT_TOKEN_RE.replace_all(input, "[REDACTED_BOT_TOKEN]");
    API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string()
}
