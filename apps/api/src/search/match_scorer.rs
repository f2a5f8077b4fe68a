//! Match scoring: how well a block of text covers a keyword list, in [0, 1].
//!
//! Lenient on purpose: recall over precision. Per keyword, the first tier that
//! applies contributes, then the sum is divided by the keyword count:
//!
//! | tier                                        | credit |
//! |---------------------------------------------|--------|
//! | keyword is a substring of the text          | 1.0    |
//! | a synonym is a substring of the text        | 0.8    |
//! | 3-char prefix overlap with a text word      | 0.5    |
//! | a 3-char slice of the keyword inside a word | 0.4    |
//! | 2-char keyword inside a word                | 0.3    |

use crate::search::synonyms;

pub const EXACT_CREDIT: f64 = 1.0;
pub const SYNONYM_CREDIT: f64 = 0.8;
pub const PREFIX_CREDIT: f64 = 0.5;
pub const TRIGRAM_CREDIT: f64 = 0.4;
pub const SHORT_KEYWORD_CREDIT: f64 = 0.3;

/// Scores `text` against `keywords`. Empty text or no keywords → 0.0.
pub fn score(text: &str, keywords: &[String]) -> f64 {
    if text.is_empty() || keywords.is_empty() {
        return 0.0;
    }

    let text_lower = text.to_lowercase();
    let words: Vec<&str> = text_lower.split_whitespace().collect();

    let total: f64 = keywords
        .iter()
        .map(|kw| keyword_credit(&text_lower, &words, &kw.to_lowercase()))
        .sum();

    (total / keywords.len() as f64).min(1.0)
}

/// Credit for a single lowercase keyword against lowercase text.
fn keyword_credit(text: &str, words: &[&str], keyword: &str) -> f64 {
    if keyword.is_empty() {
        return 0.0;
    }

    if text.contains(keyword) {
        return EXACT_CREDIT;
    }

    if synonyms::expand(keyword)
        .iter()
        .any(|syn| text.contains(syn.as_str()))
    {
        return SYNONYM_CREDIT;
    }

    fuzzy_credit(words, keyword)
}

/// Partial matching against whitespace-separated words. Stops at the first word
/// that earns anything.
fn fuzzy_credit(words: &[&str], keyword: &str) -> f64 {
    let kw_len = keyword.chars().count();
    if kw_len < 2 {
        return 0.0;
    }

    let trigrams = char_windows(keyword, 3);

    for word in words {
        if kw_len >= 3 && word.chars().count() >= 3 {
            if word.contains(prefix(keyword, 3)) || keyword.contains(prefix(word, 3)) {
                return PREFIX_CREDIT;
            }
            if trigrams.iter().any(|t| word.contains(t)) {
                return TRIGRAM_CREDIT;
            }
        } else if kw_len == 2 && word.contains(keyword) {
            return SHORT_KEYWORD_CREDIT;
        }
    }

    0.0
}

/// First `n` characters of `s` (all of it when shorter).
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Every contiguous `n`-character slice of `s`.
fn char_windows(s: &str, n: usize) -> Vec<&str> {
    let bounds: Vec<usize> = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect();

    if bounds.len() <= n {
        return Vec::new();
    }

    (0..bounds.len() - n)
        .map(|i| &s[bounds[i]..bounds[i + n]])
        .collect()
}
