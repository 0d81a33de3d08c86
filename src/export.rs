//! Graph Exporter
//!
//! Joins extracted entities with their backlinks and serializes the two
//! FQN-keyed documents. Keys are sorted, so an unchanged corpus always
//! serializes to the same bytes.

use crate::error::{AtlasError, Result};
use crate::extract::BacklinkMaps;
use crate::model::{ComponentProperty, FoundComponent, FoundSystem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One entry of `Components.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportedComponent {
    pub name: String,
    pub properties: Vec<ComponentProperty>,
    pub used_in_system: Vec<String>,
}

/// One entry of `Systems.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportedSystem {
    pub name: String,
    #[serde(rename = "componentTypes")]
    pub component_types: Vec<String>,
    pub uses_system: Vec<String>,
    pub used_in_system: Vec<String>,
}

pub type ComponentDocument = BTreeMap<String, ExportedComponent>;
pub type SystemDocument = BTreeMap<String, ExportedSystem>;

/// Both documents, ready to serialize
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedGraph {
    pub components: ComponentDocument,
    pub systems: SystemDocument,
}

impl ExportedGraph {
    pub fn build(
        components: &[FoundComponent],
        systems: &[FoundSystem],
        backlinks: &BacklinkMaps,
    ) -> Self {
        let components = components
            .iter()
            .map(|c| {
                let entry = ExportedComponent {
                    name: c.name.clone(),
                    properties: c.properties.clone(),
                    used_in_system: backlinks.component_users(&c.name).to_vec(),
                };
                (c.name.clone(), entry)
            })
            .collect();

        let systems = systems
            .iter()
            .map(|s| {
                let entry = ExportedSystem {
                    name: s.name.clone(),
                    component_types: s.component_types.clone(),
                    uses_system: s.uses_system.clone(),
                    used_in_system: backlinks.system_users(&s.name).to_vec(),
                };
                (s.name.clone(), entry)
            })
            .collect();

        ExportedGraph {
            components,
            systems,
        }
    }

    /// (Components.json, Systems.json) as pretty-printed strings
    pub fn to_json_strings(&self) -> Result<(String, String)> {
        Ok((
            serde_json::to_string_pretty(&self.components)?,
            serde_json::to_string_pretty(&self.systems)?,
        ))
    }

    /// Write both documents
    ///
    /// Each file is replaced atomically; if the second write fails the first
    /// document is already in place.
    pub fn write(&self, components_path: &Path, systems_path: &Path) -> Result<()> {
        write_json(components_path, &self.components)?;
        write_json(systems_path, &self.systems)?;
        info!(
            "Exported {} components to {} and {} systems to {}",
            self.components.len(),
            components_path.display(),
            self.systems.len(),
            systems_path.display()
        );
        Ok(())
    }
}

/// Serialize `value` as pretty JSON to `path` via a sibling temporary file
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AtlasError::io(parent, e))?;
    }

    let temp_path = temporary_sibling(path);
    let written = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&temp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(AtlasError::io(path, e));
    }
    Ok(())
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
