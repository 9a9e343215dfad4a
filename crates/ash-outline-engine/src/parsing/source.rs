use crate::{
    lexis::mask_literals,
    text::{LineIndex, SourcePosition},
};

const BOM: char = '\u{feff}';

/// A source buffer prepared for line-oriented scanning.
///
/// Holds the original text next to its masked twin (literals and comments
/// blanked, offsets unchanged) plus a line index shared by both.
#[derive(Debug)]
pub struct SourceText<'a> {
    text: &'a str,
    masked: String,
    index: LineIndex,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut masked = mask_literals(text);
        // A leading byte order mark is blanked like whitespace.
        if masked.starts_with(BOM) {
            masked.replace_range(..BOM.len_utf8(), &" ".repeat(BOM.len_utf8()));
        }
        Self {
            text,
            masked,
            index: LineIndex::new(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn masked(&self) -> &str {
        &self.masked
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Original text of 1-based `line`, without terminator.
    pub fn line(&self, line: usize) -> &'a str {
        self.index.line_text(self.text, line)
    }

    /// Masked text of 1-based `line`, without terminator.
    pub fn masked_line(&self, line: usize) -> &str {
        self.index.line_text(&self.masked, line)
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.index.line_start(line)
    }

    pub fn line_end(&self, line: usize) -> usize {
        self.index.line_end(line)
    }

    pub fn position(&self, offset: usize) -> SourcePosition {
        self.index.position(self.text, offset)
    }

    pub fn end_of_line(&self, line: usize) -> SourcePosition {
        self.index.end_of_line(self.text, line)
    }

    /// Byte width of the leading whitespace of `line`, measured on the masked text.
    pub fn indentation(&self, line: usize) -> usize {
        let masked = self.masked_line(line);
        masked.len() - masked.trim_start().len()
    }

    /// Position of the first non-blank character of `line`.
    pub fn first_non_blank(&self, line: usize) -> SourcePosition {
        self.position(self.line_start(line) + self.indentation(line))
    }
}
