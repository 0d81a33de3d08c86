//! Search helpers over exported documents
//!
//! Matches the filtering a graph viewer applies to the JSON: case-insensitive
//! substring search over names and both reference lists, plus exact-name
//! detection for opening a detail view.

use crate::export::{ExportedComponent, ExportedSystem};
use std::collections::BTreeMap;

/// An exported entry that can be searched
pub trait Searchable {
    fn name(&self) -> &str;
    /// Forward references to other systems
    fn uses_system(&self) -> &[String];
    /// Backlinks from systems
    fn used_in_system(&self) -> &[String];
}

impl Searchable for ExportedComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn uses_system(&self) -> &[String] {
        &[]
    }

    fn used_in_system(&self) -> &[String] {
        &self.used_in_system
    }
}

impl Searchable for ExportedSystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn uses_system(&self) -> &[String] {
        &self.uses_system
    }

    fn used_in_system(&self) -> &[String] {
        &self.used_in_system
    }
}

/// Keys whose entry matches `term`
///
/// An entry matches if its key, or any entry of `uses_system` /
/// `used_in_system`, contains `term` ignoring case. An empty term keeps
/// every key.
pub fn filter_keys<'a, T: Searchable>(map: &'a BTreeMap<String, T>, term: &str) -> Vec<&'a str> {
    let needle = term.to_lowercase();
    map.iter()
        .filter(|(key, entry)| {
            needle.is_empty()
                || contains_ignore_case(key, &needle)
                || entry
                    .uses_system()
                    .iter()
                    .chain(entry.used_in_system())
                    .any(|reference| contains_ignore_case(reference, &needle))
        })
        .map(|(key, _)| key.as_str())
        .collect()
}

/// The entry whose name equals `term` ignoring case
pub fn exact_match<'a, T: Searchable>(map: &'a BTreeMap<String, T>, term: &str) -> Option<&'a T> {
    if term.is_empty() {
        return None;
    }
    let needle = term.to_lowercase();
    map.values().find(|entry| entry.name().to_lowercase() == needle)
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Keys of a raw JSON document matching `term`, reference lists included
///
/// Used where the document comes back as text rather than typed entries.
pub fn filter_document(document: &serde_json::Value, term: &str) -> Vec<String> {
    let Some(entries) = document.as_object() else {
        return Vec::new();
    };
    let needle = term.to_lowercase();
    let references = |entry: &serde_json::Value, field: &str| -> Vec<String> {
        entry
            .get(field)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut keys: Vec<String> = entries
        .iter()
        .filter(|(key, entry)| {
            needle.is_empty()
                || contains_ignore_case(key, &needle)
                || references(*entry, "uses_system")
                    .iter()
                    .chain(references(*entry, "used_in_system").iter())
                    .any(|reference| contains_ignore_case(reference, &needle))
        })
        .map(|(key, _)| key.clone())
        .collect();
    keys.sort();
    keys
}
