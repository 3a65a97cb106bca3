//! Validation and mapping utilities for the Open Supply Hub client.
//!
//! This crate carries the two schema-driven halves of the access layer:
//!
//! - [`validation`] checks input parameters against a resource's declared
//!   input schema before a request is dispatched.
//! - [`jsonld`] normalizes JSON-LD response payloads into flat records.
//!
//! It also provides [`redact_sensitive`] for scrubbing token-like values out
//! of anything destined for logs.

pub mod jsonld;
pub mod validation;

use regex::Regex;

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let patterns = [
        r"(?i)(authorization: )(?:token )?([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD))=([^\s]+)",
    ];
    let mut redacted = input.to_string();
    for pat in patterns {
        let re = Regex::new(pat).unwrap();
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_authorization_headers() {
        let scrubbed = redact_sensitive("authorization: Token abc123def456");
        assert!(!scrubbed.contains("abc123def456"));
        assert!(scrubbed.contains("<redacted>"));
    }

    #[test]
    fn redacts_token_env_assignments() {
        let scrubbed = redact_sensitive("OSH_TOKEN=super-secret-value");
        assert!(!scrubbed.contains("super-secret-value"));
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let text = "mapped 2 records for resource contributor_lists";
        assert_eq!(redact_sensitive(text), text);
    }
}
