// Component Extraction
//
// A component is any declaration whose base list carries the component data
// marker. One property is recorded per field statement, so `float x, y;`
// becomes a single property named "x, y". Every part of a partial component
// contributes fields, whether or not that part repeats the marker.

use super::merge_by_name;
use crate::markers::Marker;
use crate::model::{ComponentProperty, Declaration, FoundComponent};
use crate::scanner::ScannedFile;
use super::marked_names;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::info;

/// Extract every component in the corpus, one entry per FQN
pub fn extract_components(files: &[ScannedFile]) -> Vec<FoundComponent> {
    let marked = marked_names(files, Marker::ComponentData);
    let per_file: Vec<Vec<FoundComponent>> = files
        .par_iter()
        .map(|file| components_in_file(file, &marked))
        .collect();

    let components = merge_by_name(
        per_file.into_iter().flatten(),
        |c| c.name.as_str(),
        |into, partial| into.properties.extend(partial.properties),
    );

    info!("Found {} Components", components.len());
    components
}

fn components_in_file(file: &ScannedFile, marked: &HashSet<&str>) -> Vec<FoundComponent> {
    file.all_declarations()
        .filter(|decl| marked.contains(decl.fully_qualified_name.as_str()))
        .map(to_component)
        .collect()
}

/// Fields of nested types count too, in document order
fn to_component(declaration: &Declaration) -> FoundComponent {
    FoundComponent {
        name: declaration.fully_qualified_name.clone(),
        properties: declaration
            .all_fields()
            .into_iter()
            .map(ComponentProperty::from)
            .collect(),
    }
}
