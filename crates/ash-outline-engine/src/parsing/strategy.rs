use std::fmt;

use super::ParseResult;

/// How a document's sections were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseStrategy {
    /// Driven by the schemas activated through `use` declarations.
    #[default]
    Configured,
    /// Structural guess at `name do` blocks, used when no schema applies.
    Heuristic,
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configured => "configured",
            Self::Heuristic => "heuristic",
        })
    }
}

/// Keeps the configured result unless it found nothing and fallback is on.
pub fn select_strategy(configured: &ParseResult, fallback_enabled: bool) -> ParseStrategy {
    if fallback_enabled && configured.sections.is_empty() {
        ParseStrategy::Heuristic
    } else {
        ParseStrategy::Configured
    }
}
