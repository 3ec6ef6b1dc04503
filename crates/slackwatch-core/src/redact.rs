// SPDX-FileCopyrightText: 2026 Slackwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output and error messages.

use std::sync::LazyLock;

use regex::Regex;

/// Known secret patterns to redact from output.
static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Slack bot, user, and app-level tokens: xoxb-..., xoxp-..., xapp-...
        Regex::new(r"xox[abposr]-[a-zA-Z0-9\-]{10,}").unwrap(),
        Regex::new(r"xapp-[a-zA-Z0-9\-]{10,}").unwrap(),
        // Bearer tokens in headers
        Regex::new(r"Bearer\s+[a-zA-Z0-9._\-]{10,}").unwrap(),
        // JWT-shaped keys (Supabase anon and service keys)
        Regex::new(r"eyJ[a-zA-Z0-9_\-]+\.[a-zA-Z0-9_\-]+\.[a-zA-Z0-9_\-]+").unwrap(),
    ]
});

/// The redaction placeholder.
const REDACTED: &str = "[REDACTED]";

/// Number of leading characters kept by [`token_preview`].
const PREVIEW_CHARS: usize = 8;

/// Redact secrets from a string using regex patterns and exact-match values.
pub fn redact(input: &str, known_secrets: &[&str]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).to_string();
    }

    // Longest first so a secret containing another is replaced whole.
    let mut sorted: Vec<&str> = known_secrets.to_vec();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value, REDACTED);
        }
    }

    result
}

/// Short, log-safe preview of a token: its first few characters and an ellipsis.
pub fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(PREVIEW_CHARS).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        REDACTED.to_string()
    }
}
