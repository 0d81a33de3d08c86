//! Analyzer configuration
//!
//! Loaded from TOML with camelCase keys:
//!
//! ```toml
//! sourceRoot = "decompiled/Game"
//! skipDebugSystems = true
//! componentsOutputPath = "data/Components.json"
//! systemsOutputPath = "data/Systems.json"
//! ```

use crate::error::{AtlasError, Result};
use crate::language::DEFAULT_EXTENSION;
use crate::utils::ignore::DEFAULT_IGNORE_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Directory scanned recursively for source files
    pub source_root: PathBuf,
    /// Skip systems whose FQN contains "Debug"
    #[serde(default = "default_skip_debug_systems")]
    pub skip_debug_systems: bool,
    #[serde(default = "default_components_output_path")]
    pub components_output_path: PathBuf,
    #[serde(default = "default_systems_output_path")]
    pub systems_output_path: PathBuf,
    /// Extension of source files, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// Worker threads; the global rayon pool when unset
    #[serde(default)]
    pub threads: Option<usize>,
    /// Ignore file looked up in the source root
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
}

fn default_skip_debug_systems() -> bool {
    true
}

fn default_components_output_path() -> PathBuf {
    PathBuf::from("data/Components.json")
}

fn default_systems_output_path() -> PathBuf {
    PathBuf::from("data/Systems.json")
}

fn default_file_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

impl AnalyzerConfig {
    /// Defaults for everything except the source root
    pub fn for_root(source_root: impl Into<PathBuf>) -> Self {
        AnalyzerConfig {
            source_root: source_root.into(),
            skip_debug_systems: default_skip_debug_systems(),
            components_output_path: default_components_output_path(),
            systems_output_path: default_systems_output_path(),
            file_extension: default_file_extension(),
            threads: None,
            ignore_file: default_ignore_file(),
        }
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a config file
    ///
    /// Relative paths inside the file are taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AtlasError::io(path, e))?;
        let mut config = Self::from_toml_str(&text).map_err(|source| AtlasError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.source_root,
            &mut self.components_output_path,
            &mut self.systems_output_path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Leading dot tolerated (`.cs` and `cs` are the same)
    pub fn extension(&self) -> &str {
        self.file_extension.trim_start_matches('.')
    }
}
