/// Core domain types for imgpull references and relocations.
use std::ops::Range;
use std::path::PathBuf;

use crate::markup::Tag;

/// One image reference matched in a document by the scanner.
/// The variant records which syntax matched; the span is identical for both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Bracket form: `![label](location)`.
    Bracket(Span),
    /// Embedded tag form: `<img ... />`.
    Tag(Span),
}

impl Reference {
    /// Syntax name used in log output.
    pub const fn kind_name(&self) -> &'static str {
        return match self {
            Reference::Bracket(_) => "bracket",
            Reference::Tag(_) => "tag",
        };
    }

    /// Exact matched text.
    pub fn raw_text(&self) -> &str {
        return &self.span().raw_text;
    }

    /// Byte range of the match in the original document.
    pub fn range(&self) -> Range<usize> {
        let span = self.span();
        return span.start..span.end();
    }

    /// The matched span regardless of syntax.
    pub const fn span(&self) -> &Span {
        return match self {
            Reference::Bracket(span) | Reference::Tag(span) => span,
        };
    }
}

/// Explicit relocation settings threaded through every pipeline call.
#[derive(Debug, Clone)]
pub struct Relocation {
    /// Directory receiving image bytes, usually relative to `working_dir`.
    pub image_dir: PathBuf,
    /// Process working directory, captured once at startup.
    pub working_dir: PathBuf,
}

/// Where one reference's bytes go and what replaces it in the document.
/// Computed once per reference and consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    /// `<image_dir>/<basename(source_location)>`.
    pub destination_path: PathBuf,
    /// Serialized tag pointing at the relocated copy.
    pub replacement_reference_text: String,
}

/// Source of an image reference after validation: its label, where its bytes
/// live, and the tag that will be rewritten to point at the relocated copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Display text. Always present for the bracket form, may be absent for tags.
    pub label: Option<String>,
    /// Remote URL or filesystem path exactly as written in the document.
    pub source_location: String,
    /// Tag to emit. Freshly built for the bracket form, parsed for the tag form.
    pub tag: Tag,
}

/// Position of a match in the original, unmodified document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The matched substring.
    pub raw_text: String,
    /// Byte offset of the first matched byte.
    pub start: usize,
}

impl Span {
    /// Byte offset one past the last matched byte.
    pub fn end(&self) -> usize {
        return self.start.saturating_add(self.raw_text.len());
    }
}
