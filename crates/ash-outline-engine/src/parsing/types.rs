use crate::text::SourcePosition;

/// A reference from a child to a named definition in another section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildReference {
    pub target_section: String,
    pub name: String,
}

/// A recognized keyword occurrence inside a section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChild {
    pub keyword: String,
    pub name: Option<String>,
    /// Secondary value, e.g. an attribute's type.
    pub detail: Option<String>,
    pub starting_location: SourcePosition,
    /// Copied from the matching pattern.
    pub is_definition: bool,
    /// Copied from the matching pattern, with the referenced name resolved.
    pub reference: Option<ChildReference>,
}

/// A top-level `name do ... end` block matched against a schema section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSection {
    pub name: String,
    pub children: Vec<ParsedChild>,
    pub starting_location: SourcePosition,
    pub ending_location: SourcePosition,
}

impl ParsedSection {
    /// True when `line` falls inside this section's line range.
    pub fn contains_line(&self, line: usize) -> bool {
        self.starting_location.line <= line && line <= self.ending_location.line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionEntry {
    pub name: String,
    pub starting_location: SourcePosition,
    pub section_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReferenceLink {
    /// The referenced name, as written at the source.
    pub name: String,
    pub source_location: SourcePosition,
    pub target_location: SourcePosition,
    pub target_section_name: String,
}

/// A section that an external diagram tool can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramTarget {
    pub section_name: String,
    pub tool: String,
    pub location: SourcePosition,
}
