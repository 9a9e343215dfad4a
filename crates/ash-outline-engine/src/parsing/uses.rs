use std::sync::LazyLock;

use regex::Regex;

use super::source::SourceText;
use crate::text::numbered_lines;

static USE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*use\s+[A-Z][\w.]*").expect("valid use regex"));

/// One logical `use Module, opts...` statement, possibly spanning lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseStatement {
    /// Source lines of the statement joined with `\n`.
    pub raw_text: String,
    /// 1-based line of the `use` keyword.
    pub start_line: usize,
}

/// Net bracket depth change of a masked line.
fn bracket_delta(masked_line: &str) -> i32 {
    masked_line
        .bytes()
        .map(|b| match b {
            b'[' | b'(' | b'{' => 1,
            b']' | b')' | b'}' => -1,
            _ => 0,
        })
        .sum()
}

fn continues(masked_line: &str) -> bool {
    masked_line.trim_end().ends_with(',')
}

/// Collects every `use` declaration, reassembling those that continue over
/// several lines.
///
/// A statement keeps absorbing lines while it ends with `,` or has unclosed
/// brackets. Brackets inside strings and comments are ignored. A statement
/// still open at end of file is returned as-is.
pub fn scan_use_statements(source: &SourceText<'_>) -> Vec<UseStatement> {
    let mut out = Vec::new();
    let mut open: Option<(UseStatement, i32)> = None;

    for line in numbered_lines(source.masked()) {
        let masked = line.text;
        let raw = source.line(line.number);

        if let Some((stmt, depth)) = open.as_mut() {
            stmt.raw_text.push('\n');
            stmt.raw_text.push_str(raw);
            *depth = (*depth + bracket_delta(masked)).max(0);
            if *depth == 0 && !continues(masked) {
                out.extend(open.take().map(|(stmt, _)| stmt));
            }
            continue;
        }

        if !USE_RE.is_match(masked) {
            continue;
        }
        let stmt = UseStatement {
            raw_text: raw.to_string(),
            start_line: line.number,
        };
        let depth = bracket_delta(masked).max(0);
        if depth == 0 && !continues(masked) {
            out.push(stmt);
        } else {
            open = Some((stmt, depth));
        }
    }

    if let Some((stmt, _)) = open {
        log::warn!(
            "use declaration at line {} is not terminated before end of file",
            stmt.start_line
        );
        out.push(stmt);
    }
    out
}
