//! Free-text input hygiene for queries and chat messages.

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_MESSAGE_CHARS: usize = 1000;

/// ASCII letters and digits, whitespace and light punctuation.
static SEARCH_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-.,!?]*$").expect("static regex compiles"));

const STRIPPED: &[char] = &[
    '<', '>', '"', '\'', '&', ';', '|', '`', '$', '(', ')', '{', '}', '\0',
];

/// Removes markup/shell metacharacters and NUL, truncates to `max_chars`, trims.
pub fn sanitize_input(text: &str, max_chars: usize) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .take(max_chars)
        .collect();
    cleaned.trim().to_string()
}

/// Whether a sanitized search query uses only the allowed characters.
pub fn is_allowed_query(query: &str) -> bool {
    SEARCH_QUERY.is_match(query)
}
