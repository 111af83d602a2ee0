//! Document reconstruction: untouched text between references, replacements in place.

use std::ops::Range;

/// Accumulates the rewritten document while references are processed in scan order.
///
/// Everything outside replaced ranges is copied from the original verbatim.
pub struct DocumentRebuilder<'a> {
    /// End of the last replaced range; start of the next untouched slice.
    cursor: usize,
    /// The unmodified document text.
    original: &'a str,
    /// Output assembled so far.
    output: String,
}

impl<'a> DocumentRebuilder<'a> {
    /// Consume the rebuilder, appending the tail after the last replacement.
    pub fn finish(mut self) -> String {
        if let Some(tail) = self.original.get(self.cursor..) {
            self.output.push_str(tail);
        }
        return self.output;
    }

    /// Start rebuilding `original`.
    pub fn new(original: &'a str) -> Self {
        return Self {
            cursor: 0,
            original,
            output: String::with_capacity(original.len()),
        };
    }

    /// Copy the text between the previous replacement and `range`, then emit `replacement`.
    ///
    /// Ranges must arrive in ascending, non-overlapping order on char boundaries,
    /// as the scanner produces them. A range starting before the cursor only
    /// contributes its replacement.
    pub fn replace(&mut self, range: Range<usize>, replacement: &str) {
        if let Some(between) = self.original.get(self.cursor..range.start) {
            self.output.push_str(between);
        }
        self.output.push_str(replacement);
        self.cursor = self.cursor.max(range.end);
    }
}
