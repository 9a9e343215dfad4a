use super::{ParseOutcome, ParsedChild};

fn child_line(child: &ParsedChild) -> String {
    let mut line = format!("  {}", child.keyword);
    if let Some(name) = &child.name {
        line.push(' ');
        line.push_str(name);
    }
    if let Some(detail) = &child.detail {
        line.push_str(&format!(" ({detail})"));
    }
    line.push_str(&format!(" {}", child.starting_location));
    if child.is_definition {
        line.push_str(" [definition]");
    }
    if let Some(reference) = &child.reference {
        line.push_str(&format!(" -> {} {}", reference.target_section, reference.name));
    }
    line
}

/// Plain-text outline of a parse, one entry per line.
///
/// Stable enough to snapshot and to print from the command line.
pub fn render_outline(outcome: &ParseOutcome) -> Vec<String> {
    let result = &outcome.result;
    let mut out = vec![
        format!("module {}", result.module_name.as_deref().unwrap_or("?")),
        format!("strategy {}", outcome.strategy),
        if result.modules.is_empty() {
            "schemas -".to_string()
        } else {
            format!("schemas {}", result.modules.join(", "))
        },
    ];

    for section in &result.sections {
        out.push(format!(
            "section {} {}..{}",
            section.name, section.starting_location, section.ending_location
        ));
        out.extend(section.children.iter().map(child_line));
    }

    if !result.definition_entries.is_empty() {
        out.push("definitions".to_string());
        out.extend(result.definition_entries.iter().map(|def| {
            format!("  {} {} {}", def.section_name, def.name, def.starting_location)
        }));
    }
    if !result.cross_reference_links.is_empty() {
        out.push("references".to_string());
        out.extend(result.cross_reference_links.iter().map(|link| {
            format!(
                "  {} {} -> {} {}",
                link.name, link.source_location, link.target_section_name, link.target_location
            )
        }));
    }
    if !result.diagram_targets.is_empty() {
        out.push("diagrams".to_string());
        out.extend(result.diagram_targets.iter().map(|target| {
            format!("  {} {} {}", target.section_name, target.tool, target.location)
        }));
    }
    out
}
