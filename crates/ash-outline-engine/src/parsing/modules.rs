use std::sync::LazyLock;

use regex::Regex;

use super::{source::SourceText, uses::UseStatement};
use crate::schema::{ModuleSchema, SchemaRegistry};

static DEFMODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*defmodule\s+([A-Z][\w.]*)\s+do\s*$").expect("valid defmodule regex")
});

/// Schemas whose declaration pattern occurs in any of `statements`.
///
/// Deduplicated by declaration pattern, in first-seen order.
pub fn match_modules<'r>(
    statements: &[UseStatement],
    registry: &'r SchemaRegistry,
) -> Vec<&'r ModuleSchema> {
    let mut matched: Vec<&ModuleSchema> = Vec::new();
    for stmt in statements {
        for schema in registry.schemas() {
            let seen = matched
                .iter()
                .any(|m| m.declaration_pattern == schema.declaration_pattern);
            if !seen && stmt.raw_text.contains(&schema.declaration_pattern) {
                matched.push(schema);
            }
        }
    }
    matched
}

/// Line and name of the first `defmodule Name do`.
pub fn find_defmodule(source: &SourceText<'_>) -> Option<(usize, String)> {
    (1..=source.line_count()).find_map(|line| {
        DEFMODULE_RE
            .captures(source.masked_line(line))
            .map(|caps| (line, caps[1].to_string()))
    })
}
