//! Component and System Extractors
//!
//! Both extractors are pure functions over scanned files and run on the rayon
//! pool. The only shared mutable state in the pipeline, the backlink maps, is
//! built afterwards by a single-threaded reduction in [`backlinks`].

pub mod backlinks;
pub mod components;
pub mod systems;

pub use backlinks::BacklinkMaps;
pub use components::extract_components;
pub use systems::{discover_systems, SystemDiscovery, SystemFilter};

use crate::markers::Marker;
use crate::scanner::ScannedFile;
use std::collections::{HashMap, HashSet};

/// FQNs of every declaration carrying `marker` on at least one of its parts
///
/// Partial parts that omit the base list still belong to the entity, so
/// extractors test membership by name rather than per declaration.
pub(crate) fn marked_names(files: &[ScannedFile], marker: Marker) -> HashSet<&str> {
    files
        .iter()
        .flat_map(|file| file.all_declarations())
        .filter(|decl| decl.implements(marker))
        .map(|decl| decl.fully_qualified_name.as_str())
        .collect()
}

/// Merge entities that share a name (partial types), keeping first-seen order
pub(crate) fn merge_by_name<T, N, M>(
    items: impl IntoIterator<Item = T>,
    name: N,
    mut merge: M,
) -> Vec<T>
where
    N: Fn(&T) -> &str,
    M: FnMut(&mut T, T),
{
    let mut merged: Vec<T> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in items {
        match positions.get(name(&item)) {
            Some(&pos) => {
                tracing::debug!("Merging partial declaration of {}", name(&item));
                merge(&mut merged[pos], item);
            }
            None => {
                positions.insert(name(&item).to_string(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}
