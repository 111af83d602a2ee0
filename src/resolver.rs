//! Reference resolution: turn a matched span into its label, source location,
//! and the tag that will carry the rewritten source.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::markup::{Tag, TagMarkup};
use crate::types::{Reference, ResolvedReference};

/// Label and location of the bracket form. Same shape the scanner matched.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^!\[(?P<label>.*?)\]\((?P<location>.*?)\)").expect("valid regex");
});

/// Attribute carrying the display text of a tag.
const LABEL_ATTRIBUTE: &str = "alt";

/// Attribute carrying the source location of a tag.
pub const SOURCE_ATTRIBUTE: &str = "src";

/// Resolve one reference into its label and source location.
///
/// The bracket form always yields a label (possibly empty) and a freshly built
/// `img` tag. The tag form is parsed through `markup` and keeps every attribute.
///
/// # Errors
///
/// Returns `Error::MalformedReference` if the bracket syntax does not parse,
/// or if a tag has no usable `src` attribute. The document path in the error
/// is left empty for the caller to fill in.
pub fn resolve(reference: &Reference, markup: &dyn TagMarkup) -> Result<ResolvedReference, Error> {
    return match reference {
        Reference::Bracket(span) => resolve_bracket(&span.raw_text),
        Reference::Tag(span) => resolve_tag(&span.raw_text, markup),
    };
}

/// Build a malformed-reference error without document context.
fn malformed(raw: &str, reason: &str) -> Error {
    return Error::MalformedReference {
        document: PathBuf::new(),
        raw: raw.to_string(),
        reason: reason.to_string(),
    };
}

/// Parse `![label](location)`.
///
/// # Errors
///
/// Returns `Error::MalformedReference` if `raw` is not bracket syntax.
fn resolve_bracket(raw: &str) -> Result<ResolvedReference, Error> {
    let Some(cap) = BRACKET.captures(raw) else {
        return Err(malformed(raw, "expected ![label](location)"));
    };
    let (Some(label), Some(location)) = (cap.name("label"), cap.name("location")) else {
        return Err(malformed(raw, "expected ![label](location)"));
    };

    return Ok(ResolvedReference {
        label: Some(label.as_str().to_string()),
        source_location: location.as_str().to_string(),
        tag: Tag::image(Some(label.as_str())),
    });
}

/// Parse `<img ... src="location" ... />` through the markup capability.
///
/// # Errors
///
/// Returns `Error::MalformedReference` if the tag does not parse or lacks `src`.
fn resolve_tag(raw: &str, markup: &dyn TagMarkup) -> Result<ResolvedReference, Error> {
    let tag = markup.parse(raw)?;

    let source_location = match tag.attribute(SOURCE_ATTRIBUTE) {
        None => return Err(malformed(raw, "no src attribute")),
        Some("") => return Err(malformed(raw, "empty src attribute")),
        Some(location) => location.to_string(),
    };
    let label = tag.attribute(LABEL_ATTRIBUTE).map(str::to_string);

    return Ok(ResolvedReference {
        label,
        source_location,
        tag,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::HtmlTagMarkup;
    use crate::types::Span;

    fn bracket(raw: &str) -> Reference {
        Reference::Bracket(Span { raw_text: raw.to_string(), start: 0 })
    }

    fn tag(raw: &str) -> Reference {
        Reference::Tag(Span { raw_text: raw.to_string(), start: 0 })
    }

    #[test]
    fn bracket_yields_label_and_location() {
        let resolved = resolve(&bracket("![cat](cat.png)"), &HtmlTagMarkup).unwrap();
        assert_eq!(resolved.label.as_deref(), Some("cat"));
        assert_eq!(resolved.source_location, "cat.png");
        assert_eq!(resolved.tag, Tag::image(Some("cat")));
    }

    #[test]
    fn bracket_label_may_be_empty() {
        let resolved = resolve(&bracket("![](https://x.test/a.png)"), &HtmlTagMarkup).unwrap();
        assert_eq!(resolved.label.as_deref(), Some(""));
        assert_eq!(resolved.source_location, "https://x.test/a.png");
    }

    #[test]
    fn tag_yields_src_and_alt() {
        let resolved = resolve(
            &tag(r#"<img src="https://example.com/x.png" alt="x" />"#),
            &HtmlTagMarkup,
        )
        .unwrap();
        assert_eq!(resolved.label.as_deref(), Some("x"));
        assert_eq!(resolved.source_location, "https://example.com/x.png");
    }

    #[test]
    fn tag_without_alt_has_no_label() {
        let resolved = resolve(&tag(r#"<img src="a/b.png" />"#), &HtmlTagMarkup).unwrap();
        assert_eq!(resolved.label, None);
        assert_eq!(resolved.source_location, "a/b.png");
    }

    #[test]
    fn tag_without_src_is_malformed() {
        let err = resolve(&tag(r#"<img alt="x" />"#), &HtmlTagMarkup).unwrap_err();
        assert!(
            matches!(err, Error::MalformedReference { ref reason, .. } if reason == "no src attribute")
        );
    }

    #[test]
    fn tag_with_empty_src_is_malformed() {
        let err = resolve(&tag(r#"<img src="" />"#), &HtmlTagMarkup).unwrap_err();
        assert!(matches!(err, Error::MalformedReference { .. }));
    }
}
