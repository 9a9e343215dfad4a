use super::types::{CrossReferenceLink, DefinitionEntry, ParsedSection};

/// Every named child flagged as a definition, in document order.
///
/// Duplicate names are all kept; consumers decide how to present ambiguity.
pub fn resolve_definitions(sections: &[ParsedSection]) -> Vec<DefinitionEntry> {
    sections
        .iter()
        .flat_map(|section| {
            section
                .children
                .iter()
                .filter(|child| child.is_definition)
                .filter_map(|child| {
                    Some(DefinitionEntry {
                        name: child.name.clone()?,
                        starting_location: child.starting_location,
                        section_name: section.name.clone(),
                    })
                })
        })
        .collect()
}

/// Links each referencing child to the first same-named definition in its
/// target section.
///
/// Names compare exactly: `:foo` and `foo` are different names.
pub fn resolve_cross_references(
    sections: &[ParsedSection],
    definitions: &[DefinitionEntry],
) -> Vec<CrossReferenceLink> {
    sections
        .iter()
        .flat_map(|section| section.children.iter())
        .filter_map(|child| {
            let reference = child.reference.as_ref()?;
            if reference.name.is_empty() {
                return None;
            }
            let target = definitions.iter().find(|def| {
                def.section_name == reference.target_section && def.name == reference.name
            })?;
            Some(CrossReferenceLink {
                name: reference.name.clone(),
                source_location: child.starting_location,
                target_location: target.starting_location,
                target_section_name: target.section_name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::types::{ChildReference, ParsedChild};
    use crate::text::SourcePosition;
    use pretty_assertions::assert_eq;

    fn child(keyword: &str, name: &str, line: usize) -> ParsedChild {
        ParsedChild {
            keyword: keyword.into(),
            name: Some(name.into()),
            detail: None,
            starting_location: SourcePosition::new(line, 5),
            is_definition: false,
            reference: None,
        }
    }

    fn definition(keyword: &str, name: &str, line: usize) -> ParsedChild {
        ParsedChild {
            is_definition: true,
            ..child(keyword, name, line)
        }
    }

    fn reference(keyword: &str, name: &str, target: &str, line: usize) -> ParsedChild {
        ParsedChild {
            reference: Some(ChildReference {
                target_section: target.into(),
                name: name.into(),
            }),
            ..child(keyword, name, line)
        }
    }

    fn section(name: &str, line: usize, children: Vec<ParsedChild>) -> ParsedSection {
        ParsedSection {
            name: name.into(),
            children,
            starting_location: SourcePosition::new(line, 3),
            ending_location: SourcePosition::new(line + 10, 6),
        }
    }

    #[test]
    fn definitions_keep_duplicates_and_order() {
        let sections = vec![section(
            "actions",
            1,
            vec![
                definition("create", ":make", 2),
                child("defaults", ":x", 3),
                definition("read", ":make", 4),
            ],
        )];
        let defs = resolve_definitions(&sections);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].starting_location.line, 2);
        assert_eq!(defs[1].starting_location.line, 4);
        assert!(defs.iter().all(|d| d.section_name == "actions"));
    }

    #[test]
    fn unnamed_definitions_are_skipped() {
        let mut unnamed = definition("create", ":x", 2);
        unnamed.name = None;
        let defs = resolve_definitions(&[section("actions", 1, vec![unnamed])]);
        assert!(defs.is_empty());
    }

    #[test]
    fn define_links_to_action() {
        let sections = vec![
            section("actions", 1, vec![definition("action", ":foo", 2)]),
            section(
                "code_interface",
                20,
                vec![reference("define", ":foo", "actions", 21)],
            ),
        ];
        let defs = resolve_definitions(&sections);
        let links = resolve_cross_references(&sections, &defs);
        assert_eq!(
            links,
            vec![CrossReferenceLink {
                name: ":foo".into(),
                source_location: SourcePosition::new(21, 5),
                target_location: SourcePosition::new(2, 5),
                target_section_name: "actions".into(),
            }]
        );
    }

    #[test]
    fn name_match_is_exact() {
        let sections = vec![
            section("actions", 1, vec![definition("action", ":foo", 2)]),
            section(
                "code_interface",
                20,
                vec![reference("define", "foo", "actions", 21)],
            ),
        ];
        let defs = resolve_definitions(&sections);
        assert!(resolve_cross_references(&sections, &defs).is_empty());
    }

    #[test]
    fn definition_in_other_section_does_not_match() {
        let sections = vec![
            section("calculations", 1, vec![definition("calculate", ":foo", 2)]),
            section(
                "code_interface",
                20,
                vec![reference("define", ":foo", "actions", 21)],
            ),
        ];
        let defs = resolve_definitions(&sections);
        assert!(resolve_cross_references(&sections, &defs).is_empty());
    }

    #[test]
    fn first_of_duplicate_definitions_wins() {
        let sections = vec![
            section(
                "actions",
                1,
                vec![definition("create", ":foo", 2), definition("update", ":foo", 3)],
            ),
            section(
                "code_interface",
                20,
                vec![reference("define", ":foo", "actions", 21)],
            ),
        ];
        let defs = resolve_definitions(&sections);
        let links = resolve_cross_references(&sections, &defs);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_location.line, 2);
    }
}
