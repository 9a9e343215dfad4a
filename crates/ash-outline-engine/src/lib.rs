pub mod cache;
pub mod io;
pub mod lexis;
pub mod parsing;
pub mod schema;
pub mod text;


// Re-export key types for easier usage
pub use cache::{DocumentKey, ParseCache, VersionedCache};
pub use io::*;
pub use parsing::{
    ChildReference, CrossReferenceLink, DefinitionEntry, DiagramTarget, ParseOutcome, ParseResult,
    ParseStrategy, ParsedChild, ParsedSection, Parser, ParserOptions, UseStatement, parse,
    render_outline,
};
pub use schema::{SchemaError, SchemaRegistry};
pub use text::SourcePosition;
