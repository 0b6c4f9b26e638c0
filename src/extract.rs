// src/extract.rs
//! Derived story fields: slugs, quoted spans, and the reading-time estimate.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Reading speed used for the reading-time estimate, in words per minute.
const WORDS_PER_MINUTE: usize = 200;

/// Derive a URL slug from a display name or title.
///
/// Lowercases, drops everything except alphanumerics, `_`, `-` and spaces,
/// then collapses whitespace runs into single hyphens. Idempotent: slugifying
/// a slug returns it unchanged, and names differing only in case, punctuation
/// or spacing collapse to the same slug.
pub fn slugify(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            cleaned.push(ch);
        } else if ch.is_whitespace() {
            cleaned.push(' ');
        }
    }
    cleaned
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract double-quoted spans from converted body content.
///
/// Greedy, non-overlapping, left-to-right scan. Inner texts are returned in
/// order of appearance with the quotation marks stripped; no deduplication.
/// Whitespace-only spans are returned as-is — callers filter before persisting.
pub fn extract_quotes(content: &str) -> Vec<String> {
    static RE_QUOTE: OnceCell<Regex> = OnceCell::new();
    let re = RE_QUOTE.get_or_init(|| Regex::new(r#""([^"]+)""#).unwrap());
    re.captures_iter(content)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Estimated reading time in whole minutes, rounded up.
///
/// Empty content still reports 1 minute; a story page never shows "0 min read".
pub fn reading_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    if words == 0 {
        return 1;
    }
    ((words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE) as u32
}
