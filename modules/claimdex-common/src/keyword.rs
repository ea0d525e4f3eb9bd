//! Booking-keyword matching over free comment text.

use regex::Regex;

/// Whole-word matcher for the booking keyword.
///
/// Text is normalized before matching: lower-cased, "ё" folded to "е",
/// whitespace runs collapsed to a single space, trimmed. The keyword
/// matches only when bounded by the string edges or by characters outside
/// `[a-zа-яё0-9]` — a longer word merely containing the keyword does not
/// match.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    /// Build a matcher for `keyword`. The keyword goes through the same
    /// normalization as the text it is matched against.
    pub fn new(keyword: &str) -> Self {
        let token = normalize(keyword);
        if token.is_empty() {
            return Self { pattern: None };
        }
        let escaped = regex::escape(&token);
        let pattern = Regex::new(&format!("(^|[^a-zа-яё0-9]){escaped}([^a-zа-яё0-9]|$)"))
            .expect("escaped keyword pattern is valid");
        Self {
            pattern: Some(pattern),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        let normalized = normalize(text);
        if normalized.is_empty() {
            return false;
        }
        pattern.is_match(&normalized)
    }
}

/// Lower-case, fold "ё" to "е", collapse whitespace runs, trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('ё', "е");
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}
