//! # Section Extraction
//!
//! Turns one source buffer into a [`ParseResult`]: which schemas apply, which
//! sections appear and where, the children of each, plus the definitions and
//! cross references between them.
//!
//! The pipeline runs in stages, each a plain function over the previous
//! stage's output:
//!
//! 1. **`uses`**: reassemble `use` declarations
//! 2. **`modules`**: activate schemas whose declaration pattern appears
//! 3. **`sections`**: locate `name do` blocks and their matching `end`
//! 4. **`children`**: match body lines against child patterns
//! 5. **`resolve`**: collect definitions and link references to them
//!
//! When no schema yields a section, **`heuristic`** can take over (see
//! [`ParserOptions::heuristic_fallback`]).
//!
//! Parsing never fails: malformed input degrades to fewer or shorter
//! sections and a `log::warn!`.

pub mod blocks;
pub mod children;
pub mod heuristic;
pub mod modules;
pub mod outline;
pub mod resolve;
pub mod sections;
pub mod source;
pub mod strategy;
pub mod types;
pub mod uses;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::{
    cache::{DocumentKey, ParseCache},
    schema::SchemaRegistry,
};

pub use outline::render_outline;
pub use source::SourceText;
pub use strategy::{ParseStrategy, select_strategy};
pub use types::{
    ChildReference, CrossReferenceLink, DefinitionEntry, DiagramTarget, ParsedChild, ParsedSection,
};
pub use uses::UseStatement;

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Name from the first `defmodule`, if any.
    pub module_name: Option<String>,
    pub use_statements: Vec<UseStatement>,
    /// Display names of the active schemas, in activation order.
    pub modules: Vec<String>,
    /// In document order; never overlapping.
    pub sections: Vec<ParsedSection>,
    pub definition_entries: Vec<DefinitionEntry>,
    pub cross_reference_links: Vec<CrossReferenceLink>,
    pub diagram_targets: Vec<DiagramTarget>,
}

impl ParseResult {
    /// The section whose line range contains `line`.
    pub fn section_at_line(&self, line: usize) -> Option<&ParsedSection> {
        self.sections.iter().find(|s| s.contains_line(line))
    }

    pub fn child_count(&self) -> usize {
        self.sections.iter().map(|s| s.children.len()).sum()
    }
}

/// A [`ParseResult`] together with the strategy that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub strategy: ParseStrategy,
    pub result: ParseResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Fall back to the structural heuristic when no schema finds a section.
    pub heuristic_fallback: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            heuristic_fallback: true,
        }
    }
}

/// Parses documents against a borrowed [`SchemaRegistry`].
///
/// Holds no per-document state, so one parser serves any number of
/// documents (and threads, since the registry is immutable here).
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r SchemaRegistry,
    options: ParserOptions,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_options(registry, ParserOptions::default())
    }

    pub fn with_options(registry: &'r SchemaRegistry, options: ParserOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Schema-driven parse only.
    pub fn parse(&self, text: &str) -> ParseResult {
        let source = SourceText::new(text);
        let use_statements = uses::scan_use_statements(&source);
        let schemas = modules::match_modules(&use_statements, self.registry);
        let specs = sections::collect_section_specs(&schemas);
        let sections = sections::parse_sections(&source, &specs);
        let definition_entries = resolve::resolve_definitions(&sections);
        let cross_reference_links =
            resolve::resolve_cross_references(&sections, &definition_entries);

        let diagram_targets = sections
            .iter()
            .filter_map(|section| {
                let spec = specs.iter().find(|spec| spec.name == section.name)?;
                Some(DiagramTarget {
                    section_name: section.name.clone(),
                    tool: spec.diagram?.to_string(),
                    location: section.starting_location,
                })
            })
            .collect();

        log::debug!(
            "parsed {} lines: {} schemas, {} sections, {} definitions, {} references",
            source.line_count(),
            schemas.len(),
            sections.len(),
            definition_entries.len(),
            cross_reference_links.len()
        );

        ParseResult {
            module_name: modules::find_defmodule(&source).map(|(_, name)| name),
            use_statements,
            modules: schemas.iter().map(|s| s.display_name.clone()).collect(),
            sections,
            definition_entries,
            cross_reference_links,
            diagram_targets,
        }
    }

    /// Schema-driven parse, replaced by the heuristic when
    /// [`select_strategy`] says so.
    pub fn parse_with_fallback(&self, text: &str) -> ParseOutcome {
        let configured = self.parse(text);
        let strategy = select_strategy(&configured, self.options.heuristic_fallback);
        let result = match strategy {
            ParseStrategy::Configured => configured,
            ParseStrategy::Heuristic => {
                let sections = heuristic::parse_heuristic(&SourceText::new(text));
                log::debug!("heuristic fallback found {} sections", sections.len());
                ParseResult {
                    sections,
                    definition_entries: Vec::new(),
                    cross_reference_links: Vec::new(),
                    diagram_targets: Vec::new(),
                    ..configured
                }
            }
        };
        ParseOutcome { strategy, result }
    }

    /// [`Parser::parse_with_fallback`], memoized per document version.
    pub fn parse_cached<C: ParseCache + ?Sized>(
        &self,
        cache: &mut C,
        key: DocumentKey,
        text: &str,
    ) -> Arc<ParseOutcome> {
        if let Some(hit) = cache.get(&key) {
            log::trace!("cache hit for {} v{}", key.uri, key.version);
            return hit;
        }
        let outcome = Arc::new(self.parse_with_fallback(text));
        cache.insert(key, Arc::clone(&outcome));
        outcome
    }
}

/// Schema-driven parse of `text` with default options.
pub fn parse(text: &str, registry: &SchemaRegistry) -> ParseResult {
    Parser::new(registry).parse(text)
}
