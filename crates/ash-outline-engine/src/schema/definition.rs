//! Serialized form of schema files.
//!
//! These types mirror the TOML layout one to one and carry raw pattern
//! strings; [`SchemaRegistry`](super::SchemaRegistry) validates and compiles
//! them.

use serde::Deserialize;

/// A whole schema file: a list of `[[schema]]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFile {
    #[serde(default, rename = "schema")]
    pub schemas: Vec<ModuleDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDef {
    /// Human readable name shown to users.
    pub name: String,
    /// Substring looked for in `use` declarations.
    pub declaration_pattern: String,
    #[serde(default, rename = "section")]
    pub sections: Vec<SectionDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionDef {
    pub name: String,
    /// External diagram tool that can render this section.
    #[serde(default)]
    pub diagram: Option<String>,
    #[serde(default, rename = "child")]
    pub children: Vec<ChildDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildDef {
    pub keyword: String,
    /// Regex applied to the text after the keyword; group 1 is the name.
    #[serde(default)]
    pub name_pattern: Option<String>,
    /// Regex applied to the text after the keyword; group 1 is the detail.
    #[serde(default)]
    pub detail_pattern: Option<String>,
    #[serde(default)]
    pub definition: bool,
    /// Section whose definitions this child refers to.
    #[serde(default)]
    pub references: Option<String>,
    /// Regex capturing the referenced name when it differs from the child name.
    #[serde(default)]
    pub reference_pattern: Option<String>,
}
