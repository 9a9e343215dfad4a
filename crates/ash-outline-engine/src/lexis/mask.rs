use super::cursor::Cursor;

/// Blanks every string, sigil, char literal and comment in `source`.
///
/// Each masked character becomes as many spaces as it had bytes and newlines
/// are kept, so byte offsets and line numbers of the result match the input.
/// Keyword searches on the masked text can then work line by line without
/// re-tracking literal state.
pub fn mask_literals(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for step in Cursor::new(source, 0) {
        let unit = &source[step.start..step.next];
        if step.is_code() {
            out.push_str(unit);
            continue;
        }
        for ch in unit.chars() {
            if ch == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat_n(' ', ch.len_utf8()));
            }
        }
    }
    out
}
