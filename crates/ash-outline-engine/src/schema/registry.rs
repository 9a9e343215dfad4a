use std::path::Path;

use regex::Regex;

use super::{
    SchemaError,
    definition::{ChildDef, ModuleDef, SchemaFile, SectionDef},
};

/// The Ash schemas shipped with the engine.
const BUILTIN_SCHEMAS: &str = include_str!("builtin.toml");

/// Link from a child keyword to definitions in another section.
#[derive(Debug, Clone)]
pub struct CrossReference {
    pub target_section_name: String,
    /// Captures the referenced name; the child's own name is used otherwise.
    pub name_pattern: Option<Regex>,
}

/// A child keyword recognized inside a section body.
#[derive(Debug, Clone)]
pub struct ChildPattern {
    pub keyword: String,
    pub name_pattern: Option<Regex>,
    pub detail_pattern: Option<Regex>,
    pub is_definition: bool,
    pub cross_reference: Option<CrossReference>,
}

#[derive(Debug, Clone)]
pub struct SectionSchema {
    pub name: String,
    /// Identifier of the external tool that renders this section as a diagram.
    pub diagram: Option<String>,
    pub child_patterns: Vec<ChildPattern>,
}

#[derive(Debug, Clone)]
pub struct ModuleSchema {
    pub display_name: String,
    /// Identity of the schema within a registry.
    pub declaration_pattern: String,
    pub sections: Vec<SectionSchema>,
}

/// Where a pattern lives, for error reporting.
struct PatternSite<'a> {
    schema: &'a str,
    section: &'a str,
    keyword: &'a str,
}

impl PatternSite<'_> {
    fn compile(&self, field: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, SchemaError> {
        pattern
            .map(|p| {
                Regex::new(p).map_err(|source| SchemaError::InvalidPattern {
                    schema: self.schema.to_string(),
                    section: self.section.to_string(),
                    keyword: self.keyword.to_string(),
                    field,
                    source,
                })
            })
            .transpose()
    }
}

impl ChildPattern {
    fn compile(schema: &str, section: &str, def: ChildDef) -> Result<Self, SchemaError> {
        if def.keyword.trim().is_empty() {
            return Err(SchemaError::EmptyKeyword {
                schema: schema.to_string(),
                section: section.to_string(),
            });
        }
        let site = PatternSite {
            schema,
            section,
            keyword: &def.keyword,
        };
        let name_pattern = site.compile("name_pattern", def.name_pattern.as_deref())?;
        let detail_pattern = site.compile("detail_pattern", def.detail_pattern.as_deref())?;
        let reference_pattern =
            site.compile("reference_pattern", def.reference_pattern.as_deref())?;

        Ok(Self {
            keyword: def.keyword.trim().to_string(),
            name_pattern,
            detail_pattern,
            is_definition: def.definition,
            cross_reference: def.references.map(|target_section_name| CrossReference {
                target_section_name,
                name_pattern: reference_pattern,
            }),
        })
    }
}

impl SectionSchema {
    fn compile(schema: &str, def: SectionDef) -> Result<Self, SchemaError> {
        let child_patterns = def
            .children
            .into_iter()
            .map(|child| ChildPattern::compile(schema, &def.name, child))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: def.name,
            diagram: def.diagram,
            child_patterns,
        })
    }
}

impl ModuleSchema {
    pub fn compile(def: ModuleDef) -> Result<Self, SchemaError> {
        if def.declaration_pattern.trim().is_empty() {
            return Err(SchemaError::EmptyDeclarationPattern { schema: def.name });
        }
        let sections = def
            .sections
            .into_iter()
            .map(|section| SectionSchema::compile(&def.name, section))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            display_name: def.name,
            declaration_pattern: def.declaration_pattern,
            sections,
        })
    }

    pub fn section(&self, name: &str) -> Option<&SectionSchema> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Immutable set of compiled module schemas.
///
/// Built once at startup and then only read, so one registry can be shared
/// by any number of concurrent parses.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<ModuleSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The schemas embedded in the engine.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_toml_str(BUILTIN_SCHEMAS)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(content)?;
        Self::from_definitions(file.schemas)
    }

    pub fn from_definitions(defs: impl IntoIterator<Item = ModuleDef>) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for def in defs {
            registry.insert(ModuleSchema::compile(def)?)?;
        }
        log::debug!("compiled {} module schemas", registry.len());
        Ok(registry)
    }

    /// Reads and compiles a schema file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Adds a schema; its declaration pattern must not already be registered.
    pub fn insert(&mut self, schema: ModuleSchema) -> Result<(), SchemaError> {
        if self.get(&schema.declaration_pattern).is_some() {
            return Err(SchemaError::DuplicateDeclarationPattern(
                schema.declaration_pattern,
            ));
        }
        self.schemas.push(schema);
        Ok(())
    }

    /// Appends all schemas of `other`, keeping declaration patterns unique.
    pub fn merge(&mut self, other: SchemaRegistry) -> Result<(), SchemaError> {
        other.schemas.into_iter().try_for_each(|s| self.insert(s))
    }

    pub fn schemas(&self) -> &[ModuleSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn get(&self, declaration_pattern: &str) -> Option<&ModuleSchema> {
        self.schemas
            .iter()
            .find(|s| s.declaration_pattern == declaration_pattern)
    }

    /// The diagram tool of the first section called `section_name`.
    pub fn diagram_tool(&self, section_name: &str) -> Option<&str> {
        self.schemas
            .iter()
            .filter_map(|s| s.section(section_name))
            .find_map(|s| s.diagram.as_deref())
    }
}
