use regex::Regex;

use super::types::{ChildReference, ParsedChild};
use crate::{
    lexis::{Cursor, starts_with_keyword},
    schema::ChildPattern,
    text::SourcePosition,
};

/// A body line as original text plus its masked twin.
#[derive(Debug, Clone, Copy)]
pub struct BodyLine<'a> {
    pub text: &'a str,
    pub masked: &'a str,
}

/// Group 1 of `pattern` in `haystack`, trimmed; `None` when absent or blank.
fn capture(pattern: Option<&Regex>, haystack: &str) -> Option<String> {
    let caps = pattern?.captures(haystack)?;
    let value = caps.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `code` up to its trailing line comment, if any.
fn without_comment(code: &str) -> &str {
    Cursor::new(code, 0)
        .find(|step| step.in_comment)
        .map_or(code, |step| &code[..step.start])
}

fn match_line(
    line: &BodyLine<'_>,
    patterns: &[&ChildPattern],
    line_number: usize,
) -> Option<ParsedChild> {
    let trimmed = line.masked.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let pattern = patterns
        .iter()
        .find(|p| starts_with_keyword(trimmed, &p.keyword))?;

    let indent = line.masked.len() - trimmed.len();
    let remainder = without_comment(&line.text[indent + pattern.keyword.len()..]);
    let name = capture(pattern.name_pattern.as_ref(), remainder);
    let detail = capture(pattern.detail_pattern.as_ref(), remainder);
    let reference = pattern.cross_reference.as_ref().and_then(|xref| {
        let name = capture(xref.name_pattern.as_ref(), remainder).or_else(|| name.clone())?;
        Some(ChildReference {
            target_section: xref.target_section_name.clone(),
            name,
        })
    });
    let column = line.text[..indent].chars().count() + 1;

    Some(ParsedChild {
        keyword: pattern.keyword.clone(),
        name,
        detail,
        starting_location: SourcePosition::new(line_number, column),
        is_definition: pattern.is_definition,
        reference,
    })
}

/// Matches each body line against `patterns`; the first matching pattern wins.
///
/// `lines[i]` sits on source line `base_line + i`. Lines that are blank once
/// literals and comments are masked never match.
pub fn match_children(
    lines: &[BodyLine<'_>],
    patterns: &[&ChildPattern],
    base_line: usize,
) -> Vec<ParsedChild> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(offset, line)| match_line(line, patterns, base_line + offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexis::mask_literals;
    use crate::schema::SchemaRegistry;
    use pretty_assertions::assert_eq;

    fn patterns_from(toml: &str) -> SchemaRegistry {
        SchemaRegistry::from_toml_str(toml).unwrap()
    }

    const TRIGGERS: &str = r#"
[[schema]]
name = "Test"
declaration_pattern = "My.Test"

[[schema.section]]
name = "things"

[[schema.section.child]]
keyword = "trigger"
name_pattern = '^\s*(:\w+)'
definition = true

[[schema.section.child]]
keyword = "triggers"

[[schema.section.child]]
keyword = "trigger"
name_pattern = '(never)'

[[schema.section.child]]
keyword = "rule"
name_pattern = '^\s*(.+?)\s+do\s*$'

[[schema.section.child]]
keyword = "link"
name_pattern = '^\s*(:\w+)'
references = "things"
reference_pattern = 'to:\s*(:\w+)'
"#;

    fn run(body: &str, base_line: usize) -> Vec<ParsedChild> {
        let registry = patterns_from(TRIGGERS);
        let patterns: Vec<&ChildPattern> = registry.schemas()[0].sections[0]
            .child_patterns
            .iter()
            .collect();
        let masked = mask_literals(body);
        let lines: Vec<BodyLine> = body
            .lines()
            .zip(masked.lines())
            .map(|(text, masked)| BodyLine { text, masked })
            .collect();
        match_children(&lines, &patterns, base_line)
    }

    #[test]
    fn keyword_prefix_does_not_match() {
        let children = run("  triggers do\n", 3);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].keyword, "triggers");
        assert_eq!(children[0].name, None);
    }

    #[test]
    fn first_pattern_wins_and_captures_name() {
        let children = run("    trigger :on_save, :x\n", 10);
        assert_eq!(
            children,
            vec![ParsedChild {
                keyword: "trigger".into(),
                name: Some(":on_save".into()),
                detail: None,
                starting_location: SourcePosition::new(10, 5),
                is_definition: true,
                reference: None,
            }]
        );
    }

    #[test]
    fn line_numbers_follow_base_line() {
        let children = run("trigger :a\n\n  trigger :b\n", 7);
        let lines: Vec<_> = children.iter().map(|c| c.starting_location.line).collect();
        assert_eq!(lines, vec![7, 9]);
        assert_eq!(children[1].starting_location.column, 3);
    }

    #[test]
    fn commented_and_quoted_lines_do_not_match() {
        let children = run("  # trigger :a\n  \"trigger :b\"\n", 1);
        assert!(children.is_empty());
    }

    #[test]
    fn keyword_followed_by_colon_is_an_option_not_a_child() {
        assert!(run("  trigger: :a\n", 1).is_empty());
    }

    #[test]
    fn reference_uses_reference_pattern_then_name() {
        let children = run("  link :a, to: :b\n  link :c\n  link\n", 1);
        assert_eq!(
            children[0].reference,
            Some(ChildReference {
                target_section: "things".into(),
                name: ":b".into(),
            })
        );
        assert_eq!(children[1].reference.as_ref().unwrap().name, ":c");
        assert_eq!(children[2].reference, None);
    }

    #[test]
    fn trailing_comment_is_not_captured() {
        let children = run("  rule action_type(:read) do # reads \"all\"\n  trigger :a # :b\n", 1);
        assert_eq!(children[0].name.as_deref(), Some("action_type(:read)"));
        assert_eq!(children[1].name.as_deref(), Some(":a"));
    }

    #[test]
    fn hash_inside_string_is_kept() {
        let children = run("  rule \"#1\" do\n", 1);
        assert_eq!(children[0].name.as_deref(), Some("\"#1\""));
    }

    #[test]
    fn missing_capture_leaves_name_empty() {
        let children = run("  trigger \"quoted\"\n", 1);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, None);
    }
}
