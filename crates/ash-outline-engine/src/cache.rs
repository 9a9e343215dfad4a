use std::collections::HashMap;
use std::sync::Arc;

use crate::parsing::ParseOutcome;

/// Identifies one revision of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub uri: String,
    /// Monotonic per `uri`; any change to the text bumps it.
    pub version: i64,
}

impl DocumentKey {
    pub fn new(uri: impl Into<String>, version: i64) -> Self {
        Self {
            uri: uri.into(),
            version,
        }
    }
}

/// Storage for parse results keyed by document revision.
pub trait ParseCache {
    fn get(&self, key: &DocumentKey) -> Option<Arc<ParseOutcome>>;
    fn insert(&mut self, key: DocumentKey, outcome: Arc<ParseOutcome>);
}

/// Keeps only the newest parsed version of each document.
#[derive(Debug, Default)]
pub struct VersionedCache {
    entries: HashMap<String, (i64, Arc<ParseOutcome>)>,
}

impl VersionedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self, uri: &str) {
        self.entries.remove(uri);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParseCache for VersionedCache {
    fn get(&self, key: &DocumentKey) -> Option<Arc<ParseOutcome>> {
        self.entries
            .get(&key.uri)
            .filter(|(version, _)| *version == key.version)
            .map(|(_, outcome)| Arc::clone(outcome))
    }

    fn insert(&mut self, key: DocumentKey, outcome: Arc<ParseOutcome>) {
        match self.entries.get(&key.uri) {
            Some((current, _)) if *current > key.version => {
                log::debug!(
                    "ignoring stale parse of {} v{} (have v{current})",
                    key.uri,
                    key.version
                );
            }
            _ => {
                self.entries.insert(key.uri, (key.version, outcome));
            }
        }
    }
}
