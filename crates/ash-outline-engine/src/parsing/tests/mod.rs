//! Integration tests for the parsing module.
//!
//! Fixtures (.ex) and snapshots (.snap) are co-located in `fixtures/`.
//! Snapshots hold the plain-text outline from `render_outline`.


use pretty_assertions::assert_eq;

use crate::parsing::{ParseStrategy, Parser, ParserOptions, parse, render_outline};
use crate::schema::SchemaRegistry;
use crate::text::SourcePosition;

fn builtin() -> SchemaRegistry {
    SchemaRegistry::builtin().unwrap()
}

// Fixture-based snapshot tests

#[test]
fn fixture_blog_post() {
    assert_fixture("blog_post");
}

#[test]
fn fixture_order_state_machine() {
    assert_fixture("order_state_machine");
}

#[test]
fn fixture_unknown_dsl() {
    assert_fixture("unknown_dsl");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let src = std::fs::read_to_string(format!("{fixtures_dir}/{name}.ex")).unwrap();

    let registry = builtin();
    let outcome = Parser::new(&registry).parse_with_fallback(&src);
    invariants::check(&outcome.result);

    let outline = render_outline(&outcome).join("\n");
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, outline);
    });
}

// Pipeline properties

#[test]
fn parse_is_idempotent() {
    let registry = builtin();
    let src = include_str!("fixtures/blog_post.ex");
    assert_eq!(parse(src, &registry), parse(src, &registry));
}

#[test]
fn empty_input_yields_empty_result() {
    let registry = builtin();
    let result = parse("", &registry);
    assert!(result.sections.is_empty());
    assert!(result.use_statements.is_empty());
    assert_eq!(result.module_name, None);
}

#[test]
fn file_without_recognized_schema_has_no_sections() {
    let registry = builtin();
    let src = "defmodule A do\n  use GenServer\n  attributes do\n  end\nend\n";
    let result = parse(src, &registry);
    assert!(result.sections.is_empty());
    assert_eq!(result.use_statements.len(), 1);
}

#[test]
fn empty_section_is_emitted_once() {
    let registry = builtin();
    let src = "use Ash.Resource\nattributes do\nend";
    let result = parse(src, &registry);
    assert_eq!(result.sections.len(), 1);
    let section = &result.sections[0];
    assert_eq!(section.name, "attributes");
    assert!(section.children.is_empty());
    assert_eq!(section.starting_location, SourcePosition::new(2, 1));
    assert_eq!(section.ending_location, SourcePosition::new(3, 4));
}

#[test]
fn define_links_to_action_definition() {
    let registry = builtin();
    let src = "\
defmodule A do
  use Ash.Resource

  actions do
    action :foo, :string
  end

  code_interface do
    define :foo
  end
end
";
    let result = parse(src, &registry);
    invariants::check(&result);
    assert_eq!(result.cross_reference_links.len(), 1);
    let link = &result.cross_reference_links[0];
    assert_eq!(link.name, ":foo");
    assert_eq!(link.source_location, SourcePosition::new(9, 5));
    assert_eq!(link.target_location, SourcePosition::new(5, 5));
    assert_eq!(link.target_section_name, "actions");
}

#[test]
fn unterminated_section_is_still_reported() {
    let registry = builtin();
    let src = "use Ash.Resource\nattributes do\n  attribute :a, :string\n";
    let result = parse(src, &registry);
    invariants::check(&result);
    assert_eq!(result.sections.len(), 1);
    assert!(result.sections[0].children.is_empty());
    assert_eq!(result.sections[0].ending_location.line, 3);
}

#[test]
fn diagram_targets_follow_section_metadata() {
    let registry = builtin();
    let src = "use Ash.Domain\nresources do\n  resource MyApp.Post\nend\n";
    let result = parse(src, &registry);
    assert_eq!(result.diagram_targets.len(), 1);
    assert_eq!(result.diagram_targets[0].tool, "ash.generate_resource_diagrams");
    assert_eq!(result.definition_entries[0].name, "MyApp.Post");
}

#[test]
fn fallback_can_be_disabled() {
    let registry = builtin();
    let src = include_str!("fixtures/unknown_dsl.ex");
    let parser = Parser::with_options(
        &registry,
        ParserOptions {
            heuristic_fallback: false,
        },
    );
    let outcome = parser.parse_with_fallback(src);
    assert_eq!(outcome.strategy, ParseStrategy::Configured);
    assert!(outcome.result.sections.is_empty());
    assert_eq!(outcome.result.module_name.as_deref(), Some("MyApp.Scheduler"));
}

#[test]
fn positions_convert_to_zero_based() {
    let registry = builtin();
    let result = parse(include_str!("fixtures/blog_post.ex"), &registry);
    let first = result.definition_entries[0].starting_location;
    assert_eq!(first, SourcePosition::new(12, 5));
    assert_eq!(first.to_zero_based(), (11, 4));
}

#[test]
fn section_lookup_by_line() {
    let registry = builtin();
    let result = parse(include_str!("fixtures/blog_post.ex"), &registry);
    assert_eq!(result.child_count(), 11);
    assert_eq!(result.section_at_line(14).map(|s| s.name.as_str()), Some("attributes"));
    assert_eq!(result.section_at_line(31).map(|s| s.name.as_str()), Some("code_interface"));
    assert!(result.section_at_line(10).is_none());
}
