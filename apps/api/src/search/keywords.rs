//! Keyword extraction: turns a free-text query into lowercase search tokens.
//!
//! Best-effort tokenizer: no stemming, no language detection.

use std::sync::LazyLock;

use regex::Regex;

/// Maximal runs of word characters, at least two long.
static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w{2,}").expect("static regex compiles"));

/// Anything that is neither a word character nor whitespace.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex compiles"));

pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Extracts search keywords from `query`.
///
/// 1. Lowercase, take every run of ≥2 word characters, drop stop words.
/// 2. If nothing survives, fall back to the whole query with punctuation removed,
///    unless that residue is empty or made only of stop words.
pub fn extract_keywords(query: &str) -> Vec<String> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let lowered = query.to_lowercase();

    let keywords: Vec<String> = WORD_RUN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !is_stop_word(w))
        .map(str::to_string)
        .collect();

    if !keywords.is_empty() {
        return keywords;
    }

    let cleaned = PUNCTUATION.replace_all(&lowered, "");
    let cleaned = cleaned.trim();
    if cleaned.split_whitespace().all(is_stop_word) {
        return Vec::new();
    }

    vec![cleaned.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_yields_nothing() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }

    #[test]
    fn test_all_stop_words_yield_nothing() {
        assert!(extract_keywords("the a an").is_empty());
        assert!(extract_keywords("The, AND; or!").is_empty());
    }

    #[test]
    fn test_lowercases_and_drops_stop_words() {
        assert_eq!(
            extract_keywords("Senior Python Developer for the Web"),
            vec!["senior", "python", "developer", "web"]
        );
    }

    #[test]
    fn test_single_characters_are_not_tokens() {
        assert_eq!(extract_keywords("C# or R developer"), vec!["developer"]);
    }

    #[test]
    fn test_digits_and_underscores_are_word_characters() {
        assert_eq!(extract_keywords("web3 data_entry"), vec!["web3", "data_entry"]);
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        assert_eq!(extract_keywords("full-time"), vec!["full", "time"]);
    }

    #[test]
    fn test_fallback_uses_cleaned_whole_query() {
        // No run of two word characters, but the residue is not only stop words.
        assert_eq!(extract_keywords("C++ / R"), vec!["c  r"]);
        assert_eq!(extract_keywords("x!"), vec!["x"]);
    }

    #[test]
    fn test_fallback_skipped_for_pure_punctuation() {
        assert!(extract_keywords("?!...").is_empty());
    }
}
