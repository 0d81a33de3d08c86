//! Name Index Builder
//!
//! Maps each declaration's short name to its fully-qualified name. When two
//! declarations share a short name the first one in scan order wins; scan order
//! is the sorted file enumeration, so resolution is reproducible.

use crate::markers::short_type_name;
use crate::scanner::ScannedFile;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Immutable short name -> FQN lookup
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: HashMap<String, String>,
    qualified: HashSet<String>,
}

impl NameIndex {
    /// Build the index from every declaration (nested ones included) of every file
    pub fn build(files: &[ScannedFile]) -> Self {
        let mut names: HashMap<String, String> = HashMap::new();
        let mut qualified: HashSet<String> = HashSet::new();
        let mut shadowed = 0usize;

        for declaration in files.iter().flat_map(|file| file.all_declarations()) {
            qualified.insert(declaration.fully_qualified_name.clone());
            match names.entry(declaration.short_name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(declaration.fully_qualified_name.clone());
                }
                Entry::Occupied(existing) => {
                    if existing.get() != &declaration.fully_qualified_name {
                        shadowed += 1;
                    }
                }
            }
        }

        debug!(
            "Built name index with {} short names ({} shadowed duplicates)",
            names.len(),
            shadowed
        );
        NameIndex { names, qualified }
    }

    /// Resolve a type reference as written in code
    ///
    /// A qualified reference (`Game.Objects.Position`) that names a known FQN
    /// binds to exactly that declaration; any other qualified or
    /// `global::`-prefixed reference resolves through its last segment.
    /// Constructed generics (`Wrap<Position>`) and unknown names resolve to `None`.
    pub fn resolve(&self, type_text: &str) -> Option<&str> {
        let text = type_text.trim();
        if text.contains('<') {
            return None;
        }

        let unaliased = text.strip_prefix("global::").unwrap_or(text);
        if unaliased.contains('.') {
            if let Some(fqn) = self.qualified.get(unaliased) {
                return Some(fqn.as_str());
            }
        }

        let short = short_type_name(unaliased);
        if short.is_empty() {
            return None;
        }
        self.names.get(short).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All (short name, FQN) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
