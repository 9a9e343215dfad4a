//! # Schema Registry
//!
//! Declarative descriptions of which sections and child keywords a file gets
//! parsed for, keyed by the module named in its `use` declarations.
//!
//! Schemas are written in TOML (see `builtin.toml` for the built-in Ash
//! table) and compiled once into a [`SchemaRegistry`]. Compilation validates
//! every regex up front: a broken pattern rejects the whole registry instead
//! of misbehaving on some later document.

pub mod definition;
pub mod registry;

use std::path::PathBuf;

pub use definition::{ChildDef, ModuleDef, SchemaFile, SectionDef};
pub use registry::{ChildPattern, CrossReference, ModuleSchema, SchemaRegistry, SectionSchema};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid {field} for `{keyword}` in {schema} > {section}: {source}")]
    InvalidPattern {
        schema: String,
        section: String,
        keyword: String,
        field: &'static str,
        source: regex::Error,
    },
    #[error("Duplicate declaration pattern: {0}")]
    DuplicateDeclarationPattern(String),
    #[error("Schema {schema} has an empty declaration pattern")]
    EmptyDeclarationPattern { schema: String },
    #[error("Schema {schema} > {section} has a child pattern with an empty keyword")]
    EmptyKeyword { schema: String, section: String },
    #[error("Failed to parse schema definitions: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to read schema file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
