/// A single line of a source buffer.
#[derive(Debug, Clone, Copy)]
pub struct LineRef<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Line text without the trailing `\n` / `\r\n`.
    pub text: &'a str,
}

/// Returns an iterator over the numbered lines of `source`.
///
/// A trailing newline does not produce an extra empty line, matching how
/// editors number lines. The empty buffer has no lines.
pub fn numbered_lines(source: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    source
        .split_inclusive('\n')
        .enumerate()
        .map(|(idx, raw)| LineRef {
            number: idx + 1,
            text: raw.trim_end_matches(['\r', '\n']),
        })
}
