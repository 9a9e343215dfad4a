use super::{
    blocks::find_block_end_within,
    children::{BodyLine, match_children},
    source::SourceText,
    types::ParsedSection,
};
use crate::{
    lexis::keyword::BLOCK_OPEN,
    schema::{ChildPattern, ModuleSchema},
};

/// A section name to look for, with the child patterns of every active
/// schema that declares it.
#[derive(Debug, Clone)]
pub struct SectionSpec<'r> {
    pub name: &'r str,
    pub patterns: Vec<&'r ChildPattern>,
    pub diagram: Option<&'r str>,
}

/// Flattens the sections of `schemas`, merging same-named sections.
///
/// Patterns keep schema order, then declaration order, so the first-match
/// rule of the child matcher stays predictable.
pub fn collect_section_specs<'r>(schemas: &[&'r ModuleSchema]) -> Vec<SectionSpec<'r>> {
    let mut specs: Vec<SectionSpec<'r>> = Vec::new();
    for section in schemas.iter().copied().flat_map(|s| s.sections.iter()) {
        match specs.iter_mut().find(|spec| spec.name == section.name) {
            Some(spec) => {
                spec.patterns.extend(section.child_patterns.iter());
                spec.diagram = spec.diagram.or(section.diagram.as_deref());
            }
            None => specs.push(SectionSpec {
                name: &section.name,
                patterns: section.child_patterns.iter().collect(),
                diagram: section.diagram.as_deref(),
            }),
        }
    }
    specs
}

/// True when trimmed `line` is exactly `<name> do`.
///
/// `name do: value` is the keyword-argument form and never opens a section.
pub fn is_section_start(line: &str, name: &str) -> bool {
    line.strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(char::is_whitespace))
        .is_some_and(|rest| rest.trim() == BLOCK_OPEN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SectionStart {
    line: usize,
    spec: usize,
}

fn find_section_starts(source: &SourceText<'_>, specs: &[SectionSpec<'_>]) -> Vec<SectionStart> {
    (1..=source.line_count())
        .filter_map(|line| {
            let trimmed = source.masked_line(line).trim();
            specs
                .iter()
                .position(|spec| is_section_start(trimmed, spec.name))
                .map(|spec| SectionStart { line, spec })
        })
        .collect()
}

/// Finds every section of `specs` in `source`.
///
/// Each section provisionally runs up to the line before the next section
/// start (or end of file). Its real end is the matching `end` inside that
/// range; when there is none, the section keeps the provisional end and
/// gets no children.
pub fn parse_sections(source: &SourceText<'_>, specs: &[SectionSpec<'_>]) -> Vec<ParsedSection> {
    let starts = find_section_starts(source, specs);
    let last_line = source.line_count();

    starts
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let provisional_end = starts.get(i + 1).map_or(last_line, |next| next.line - 1);
            build_section(source, &specs[start.spec], start.line, provisional_end)
        })
        .collect()
}

fn build_section(
    source: &SourceText<'_>,
    spec: &SectionSpec<'_>,
    start_line: usize,
    provisional_end: usize,
) -> ParsedSection {
    let starting_location = source.first_non_blank(start_line);
    let end = find_block_end_within(
        source.text(),
        source.line_start(start_line),
        source.line_end(provisional_end),
    );

    let Some(end_offset) = end else {
        log::warn!(
            "section `{}` at line {start_line} has no matching end before line {}",
            spec.name,
            provisional_end + 1
        );
        return ParsedSection {
            name: spec.name.to_string(),
            children: Vec::new(),
            starting_location,
            ending_location: source.end_of_line(provisional_end),
        };
    };

    let ending_location = source.position(end_offset);
    let body: Vec<BodyLine<'_>> = (start_line + 1..ending_location.line)
        .map(|line| BodyLine {
            text: source.line(line),
            masked: source.masked_line(line),
        })
        .collect();

    ParsedSection {
        name: spec.name.to_string(),
        children: match_children(&body, &spec.patterns, start_line + 1),
        starting_location,
        ending_location,
    }
}
