//! Keyword extraction shared by the resume side and the job-description side.
//!
//! Tokenization rule: lower-case, then match `[a-z]+(?:\+\+|#)?`.
//! Digits, punctuation and non-ASCII letters act as separators, so
//! "REST API" yields `rest` + `api`, "Node.js" yields `node` + `js`,
//! and "C++" / "C#" survive as `c++` / `c#`.
//!
//! A token is dropped when its alphabetic stem is two characters or fewer,
//! unless it carries a `++`/`#` suffix, or when it is in [`STOP_WORDS`].
//! A lone `+` is a separator, so grades like "A+" never become keywords.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum stem length (exclusive) for a plain alphabetic token to count.
const MIN_STEM_LEN: usize = 2;

/// English function words and resume filler that never count as keywords.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "his",
    "she", "him", "was", "one", "our", "out", "has", "have", "with", "this", "that", "from",
    "they", "will", "would", "could", "should", "must", "there", "their", "them", "these",
    "what", "about", "which", "when", "who", "how", "make", "like", "time", "just", "know",
    "take", "into", "your", "some", "see", "other", "than", "then", "now", "look", "only",
    "come", "its", "over", "also", "back", "after", "use", "well", "way", "even", "new", "want",
    "because", "give", "most", "been", "were", "such", "able", "etc", "more", "each", "both",
    "may", "via", "per", "within", "across", "including", "work", "experience", "team", "role",
    "company", "year", "years",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:\+\+|#)?").expect("token pattern is valid"));

/// Extracts the ordered, deduplicated keyword sequence of `text`.
///
/// Order is first occurrence. Never fails; empty or whitespace-only input
/// yields an empty vector.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords = Vec::new();

    for token in TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if !is_keyword(token) {
            continue;
        }
        if seen.insert(token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

fn is_keyword(token: &str) -> bool {
    let stem = token.trim_end_matches(['+', '#']);
    let has_symbol = stem.len() != token.len();

    if !has_symbol && stem.len() <= MIN_STEM_LEN {
        return false;
    }

    !STOP_WORD_SET.contains(token)
}
