use std::fmt;

/// A 1-based line/column location in a source buffer.
///
/// Columns count `char`s, not bytes. Everything the engine emits uses this
/// form; converting to an editor's 0-based coordinates is the consumer's job
/// (see [`SourcePosition::to_zero_based`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        debug_assert!(line >= 1 && column >= 1, "positions are 1-based");
        Self { line, column }
    }

    /// Converts to the `(line, character)` pair used by 0-based editor APIs.
    pub fn to_zero_based(self) -> (usize, usize) {
        (self.line.saturating_sub(1), self.column.saturating_sub(1))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to [`SourcePosition`]s and line numbers to byte offsets.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
    trailing_newline: bool,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            starts,
            len: source.len(),
            trailing_newline: source.ends_with('\n'),
        }
    }

    /// Number of lines, not counting the empty remainder after a final newline.
    pub fn line_count(&self) -> usize {
        if self.len == 0 {
            0
        } else if self.trailing_newline {
            self.starts.len() - 1
        } else {
            self.starts.len()
        }
    }

    /// Byte offset where 1-based `line` starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.len)
    }

    /// Byte offset just past `line`, including its terminator.
    pub fn line_end(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.len)
    }

    /// Text of 1-based `line` without its terminator.
    pub fn line_text<'s>(&self, source: &'s str, line: usize) -> &'s str {
        source[self.line_start(line)..self.line_end(line)].trim_end_matches(['\r', '\n'])
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, source: &str, offset: usize) -> SourcePosition {
        let offset = offset.min(self.len);
        let line_idx = self.starts.partition_point(|&s| s <= offset) - 1;
        let column = source[self.starts[line_idx]..offset].chars().count() + 1;
        SourcePosition::new(line_idx + 1, column)
    }

    /// Position one past the last character of `line`.
    pub fn end_of_line(&self, source: &str, line: usize) -> SourcePosition {
        let column = self.line_text(source, line).chars().count() + 1;
        SourcePosition::new(line.max(1), column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_one_based() {
        let src = "ab\ncd";
        let idx = LineIndex::new(src);
        assert_eq!(idx.position(src, 0), SourcePosition::new(1, 1));
        assert_eq!(idx.position(src, 3), SourcePosition::new(2, 1));
        assert_eq!(idx.position(src, 5), SourcePosition::new(2, 3));
    }

    #[test]
    fn columns_count_chars_not_bytes() {
        let src = "é = 1";
        let idx = LineIndex::new(src);
        assert_eq!(idx.position(src, "é ".len()).column, 3);
    }

    #[test]
    fn line_count_ignores_final_newline() {
        assert_eq!(LineIndex::new("").line_count(), 0);
        assert_eq!(LineIndex::new("a").line_count(), 1);
        assert_eq!(LineIndex::new("a\n").line_count(), 1);
        assert_eq!(LineIndex::new("a\n\n").line_count(), 2);
    }

    #[test]
    fn line_text_strips_terminators() {
        let src = "one\r\ntwo\n";
        let idx = LineIndex::new(src);
        assert_eq!(idx.line_text(src, 1), "one");
        assert_eq!(idx.line_text(src, 2), "two");
        assert_eq!(idx.end_of_line(src, 2), SourcePosition::new(2, 4));
    }

    #[test]
    fn zero_based_conversion() {
        assert_eq!(SourcePosition::new(1, 1).to_zero_based(), (0, 0));
        assert_eq!(SourcePosition::new(12, 5).to_zero_based(), (11, 4));
    }
}
