//! Error types for ECS Atlas
//!
//! Two classes: [`AtlasError`] aborts a run, [`ScanError`] is confined to one
//! source file and never stops the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the fatal error class
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Fatal errors: the run stops and nothing partial is exported
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Source root does not exist: {path}")]
    SourceRootMissing { path: PathBuf },

    #[error("Source root is not a directory: {path}")]
    SourceRootNotDirectory { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to load C# grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl AtlasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AtlasError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-file failures: logged, the file is excluded, the scan continues
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}")]
    Parse { path: PathBuf },
}
