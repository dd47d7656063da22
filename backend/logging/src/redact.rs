//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings (error messages, URLs)
//! before they reach a log line.

use once_cell::sync::Lazy;
use regex::Regex;

/// `key=...` query parameters, as used by Google REST APIs.
static QUERY_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([?&]key=)[^&\s)]+").unwrap());
static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static API_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"sk-[a-zA-Z0-9_\-]{16,}").unwrap());

/// Redacts credentials in a string.
pub fn redact_secrets(input: &str) -> String {
    let redacted = QUERY_KEY_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = BEARER_RE.replace_all(&redacted, "Bearer [REDACTED]");
    API_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_query_api_key() {
        let raw = "error sending request for url (https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents/patentes/abc123?key=AIzaSyD-secret_value)";
        let clean = redact_secrets(raw);
        assert!(!clean.contains("AIzaSyD-secret_value"));
        assert!(clean.contains("patentes/abc123?key=[REDACTED])"));
    }

    #[test]
    fn redacts_key_after_other_params() {
        let clean = redact_secrets("/documents/patentes?pageSize=300&key=abc&pageToken=t");
        assert_eq!(clean, "/documents/patentes?pageSize=300&key=[REDACTED]&pageToken=t");
    }

    #[test]
    fn redacts_tokens() {
        let raw = "auth Bearer eyJhbGciOiJIUzI1NiJ9.x and sk-abcdefghijklmnopqrstuv";
        let clean = redact_secrets(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert!(!clean.contains("sk-abcdefghijklmnopqrstuv"));
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(redact_secrets("No record for plate abc123"), "No record for plate abc123");
    }
}
