use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Reference, Span};

/// Either syntax, non-greedy, so adjacent references never merge.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"!\[.*?\]\(.*?\)|<img.*?/>").expect("valid regex"));

/// Scan document text for image references in left-to-right order.
///
/// Matches are taken from the original text and never overlap.
/// The returned iterator is lazy and borrows `text`.
pub fn scan(text: &str) -> impl Iterator<Item = Reference> + '_ {
    return REFERENCE.find_iter(text).map(|m| {
        let span = Span {
            raw_text: m.as_str().to_string(),
            start: m.start(),
        };
        return if m.as_str().starts_with('!') {
            Reference::Bracket(span)
        } else {
            Reference::Tag(span)
        };
    });
}
