//! Log Redaction
//!
//! Scrubs tokens from URLs and headers prior to logging. Token requests pass
//! through the edge, so their query strings must not reach the logs verbatim.

use regex::Regex;
use std::sync::LazyLock;

static QUERY_SECRET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(token|app_?certificate|secret|password)=([^&\s]+)").unwrap()
});
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = QUERY_SECRET_RE.replace_all(input, "$1=[REDACTED]");
    BEARER_RE.replace_all(&redacted, "Bearer [REDACTED]").to_string()
}
