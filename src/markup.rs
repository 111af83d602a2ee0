//! Tag markup capability: parse one self-contained tag into ordered attributes
//! and serialize it back.
//!
//! The pipeline only sees [`TagMarkup`]; [`HtmlTagMarkup`] is the regex-backed
//! implementation wired into the binary.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

/// Name/value pairs inside a tag. Quoted, unquoted, and valueless forms.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .expect("valid regex");
});

/// Element name directly after the opening angle bracket.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"^<\s*([A-Za-z][A-Za-z0-9:_-]*)").expect("valid regex"));

/// One attribute in source order. `value` is `None` for bare attributes like `loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written.
    pub name: String,
    /// Decoded attribute value.
    pub value: Option<String>,
}

/// Regex-backed markup parser for the embedded `<img ... />` form.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTagMarkup;

impl TagMarkup for HtmlTagMarkup {
    fn parse(&self, raw: &str) -> Result<Tag, Error> {
        let Some(element) = ELEMENT.captures(raw) else {
            return Err(malformed(raw, "not a markup tag"));
        };
        let (Some(whole), Some(name)) = (element.get(0), element.get(1)) else {
            return Err(malformed(raw, "not a markup tag"));
        };

        let rest = raw.get(whole.end()..).unwrap_or("");
        let body = rest.strip_suffix('>').unwrap_or(rest);
        let body = body.strip_suffix('/').unwrap_or(body);

        let attributes = ATTRIBUTE
            .captures_iter(body)
            .filter_map(|cap| {
                let attr_name = cap.get(1)?.as_str().to_string();
                let value = cap
                    .get(2)
                    .or_else(|| return cap.get(3))
                    .or_else(|| return cap.get(4))
                    .map(|m| return decode_entities(m.as_str()));
                return Some(Attribute { name: attr_name, value });
            })
            .collect();

        return Ok(Tag {
            attributes,
            name: name.as_str().to_string(),
        });
    }

    fn serialize(&self, tag: &Tag) -> String {
        let mut out = format!("<{}", tag.name);
        for attribute in &tag.attributes {
            out.push(' ');
            out.push_str(&attribute.name);
            if let Some(value) = &attribute.value {
                out.push_str("=\"");
                out.push_str(&encode_entities(value));
                out.push('"');
            }
        }
        out.push_str("/>");
        return out;
    }
}

/// A parsed tag: element name plus attributes in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Element name, e.g. `img`.
    pub name: String,
}

impl Tag {
    /// Value of the first attribute named `name` (ASCII case-insensitive).
    /// A bare attribute reads as the empty string.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        return self
            .attributes
            .iter()
            .find(|a| return a.name.eq_ignore_ascii_case(name))
            .map(|a| return a.value.as_deref().unwrap_or(""));
    }

    /// A fresh `img` tag whose display text is `label` (empty if absent).
    pub fn image(label: Option<&str>) -> Self {
        return Self {
            attributes: vec![Attribute {
                name: "alt".to_string(),
                value: Some(label.unwrap_or("").to_string()),
            }],
            name: "img".to_string(),
        };
    }

    /// Replace the value of `name` in place, or append it when missing.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|a| return a.name.eq_ignore_ascii_case(name))
        {
            existing.value = Some(value.to_string());
            return;
        }
        self.attributes.push(Attribute {
            name: name.to_string(),
            value: Some(value.to_string()),
        });
    }
}

/// Narrow interface over whatever parses and emits tag markup.
pub trait TagMarkup {
    /// Parse the attributes of one self-contained tag string.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedReference` if `raw` does not open with a tag name.
    fn parse(&self, raw: &str) -> Result<Tag, Error>;

    /// Emit a self-closing tag string.
    fn serialize(&self, tag: &Tag) -> String;
}

/// Decode the handful of entities that appear in attribute values.
fn decode_entities(value: &str) -> String {
    return value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
}

/// Escape a value for a double-quoted attribute.
fn encode_entities(value: &str) -> String {
    return value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
}

/// Build a malformed-reference error. The document is attached by the pipeline.
fn malformed(raw: &str, reason: &str) -> Error {
    return Error::MalformedReference {
        document: PathBuf::new(),
        raw: raw.to_string(),
        reason: reason.to_string(),
    };
}
