use std::sync::LazyLock;

use regex::Regex;

use super::{
    blocks::{find_block_end, find_block_end_within},
    modules::find_defmodule,
    source::SourceText,
    types::{ParsedChild, ParsedSection},
};
use crate::lexis::{line_delta, starts_with_keyword};

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z_][\w?!]*)\s+do$").expect("valid section regex"));

static CHILD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([a-z_][\w?!]*)\s*\(?\s*(:[A-Za-z_][\w?!]*|"[^"]*"|[A-Z][\w.]*)"#)
        .expect("valid child regex")
});

/// Ordinary language constructs that look like DSL calls but never are.
const NOT_DSL: &[&str] = &[
    "def", "defp", "defmacro", "defmacrop", "defmodule", "defstruct", "defimpl", "defprotocol",
    "defdelegate", "defguard", "use", "import", "require", "alias", "if", "unless", "case", "cond",
    "with", "for", "try", "receive", "quote", "unquote",
];

fn is_dsl_keyword(word: &str) -> bool {
    !NOT_DSL.contains(&word)
}

/// Structural fallback for modules no schema describes.
///
/// Every `<identifier> do` block at the first nesting level of the first
/// `defmodule` becomes a section; each first-level body line of the form
/// `<identifier> <atom|string|Module>` becomes a child. Nothing is a
/// definition or a reference.
pub fn parse_heuristic(source: &SourceText<'_>) -> Vec<ParsedSection> {
    let Some((module_line, _)) = find_defmodule(source) else {
        return Vec::new();
    };
    let body_last = match find_block_end(source.text(), source.line_start(module_line)) {
        Some(end) => source.position(end).line.saturating_sub(1),
        None => source.line_count(),
    };

    let mut sections = Vec::new();
    let mut depth = 0i32;
    let mut line = module_line + 1;
    while line <= body_last {
        let masked = source.masked_line(line).trim();
        let section_name = SECTION_RE
            .captures(masked)
            .map(|caps| caps[1].to_string())
            .filter(|name| is_dsl_keyword(name));

        match section_name {
            Some(name) if depth == 0 => {
                let section = heuristic_section(source, name, line, body_last);
                line = section.ending_location.line + 1;
                sections.push(section);
            }
            _ => {
                depth = (depth + line_delta(masked)).max(0);
                line += 1;
            }
        }
    }
    sections
}

fn heuristic_section(
    source: &SourceText<'_>,
    name: String,
    start_line: usize,
    body_last: usize,
) -> ParsedSection {
    let starting_location = source.first_non_blank(start_line);
    let end = find_block_end_within(
        source.text(),
        source.line_start(start_line),
        source.line_end(body_last),
    );
    let Some(end_offset) = end else {
        log::debug!("block `{name}` at line {start_line} has no matching end");
        return ParsedSection {
            name,
            children: Vec::new(),
            starting_location,
            ending_location: source.end_of_line(body_last),
        };
    };

    let ending_location = source.position(end_offset);
    ParsedSection {
        name,
        children: first_level_children(source, start_line + 1, ending_location.line),
        starting_location,
        ending_location,
    }
}

fn first_level_children(source: &SourceText<'_>, from: usize, until: usize) -> Vec<ParsedChild> {
    let mut children = Vec::new();
    let mut depth = 0i32;
    for line in from..until {
        let masked = source.masked_line(line).trim();
        if depth == 0 {
            children.extend(heuristic_child(source, line, masked));
        }
        depth = (depth + line_delta(masked)).max(0);
    }
    children
}

fn heuristic_child(source: &SourceText<'_>, line: usize, masked: &str) -> Option<ParsedChild> {
    let caps = CHILD_RE.captures(source.line(line).trim_start())?;
    let keyword = &caps[1];
    if !is_dsl_keyword(keyword) || !starts_with_keyword(masked, keyword) {
        return None;
    }
    Some(ParsedChild {
        keyword: keyword.to_string(),
        name: Some(caps[2].to_string()),
        detail: None,
        starting_location: source.first_non_blank(line),
        is_definition: false,
        reference: None,
    })
}
