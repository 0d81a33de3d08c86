//! Declaration Scanner
//!
//! Walks the source root in a fixed order and parses each file into owned
//! [`Declaration`] records. Files are parsed in parallel on the rayon pool;
//! output order always equals enumeration order.
//!
//! A file that cannot be read or parsed is reported as a [`ScanDiagnostic`] and
//! contributes nothing. Only a missing or unreadable source root is fatal.

mod declarations;
mod helpers;

pub use declarations::extract_declarations;

use crate::error::{AtlasError, Result, ScanError};
use crate::language;
use crate::model::Declaration;
use crate::utils::ignore::{is_ignored, IgnorePattern};
use crate::utils::paths::display_relative;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Declarations parsed from one source file
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the source root, `/`-separated
    pub relative_path: String,
    /// blake3 hex digest of the file bytes
    pub content_hash: String,
    /// Top-level declarations in document order
    pub declarations: Vec<Declaration>,
}

impl ScannedFile {
    /// Every declaration in the file, nested ones included, in pre-order
    pub fn all_declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().flat_map(|decl| decl.walk())
    }
}

/// A file that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    pub path: PathBuf,
    pub message: String,
}

/// Result of scanning a corpus
#[derive(Debug, Default)]
pub struct ScanOutput {
    pub files: Vec<ScannedFile>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Enumerate source files under `root`, sorted by name at every directory level
///
/// `ignore_patterns` are matched against the root-relative path.
pub fn discover_files(
    root: &Path,
    extension: &str,
    ignore_patterns: &[IgnorePattern],
) -> Result<Vec<PathBuf>> {
    check_source_root(root)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop at source root"));
                return Err(AtlasError::io(root, source));
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !language::is_source_file(entry.path(), extension) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if is_ignored(relative, ignore_patterns) {
            debug!("Ignoring {}", relative.display());
            continue;
        }

        files.push(entry.into_path());
    }

    debug!("Discovered {} source files under {}", files.len(), root.display());
    Ok(files)
}

fn check_source_root(root: &Path) -> Result<()> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AtlasError::SourceRootMissing {
                path: root.to_path_buf(),
            })
        }
        Err(e) => return Err(AtlasError::io(root, e)),
    };
    if !metadata.is_dir() {
        return Err(AtlasError::SourceRootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Parse one file's text
pub fn parse_source(
    parser: &mut tree_sitter::Parser,
    path: &Path,
    text: &str,
) -> std::result::Result<Vec<Declaration>, ScanError> {
    let tree = parser.parse(text, None).ok_or_else(|| ScanError::Parse {
        path: path.to_path_buf(),
    })?;

    if tree.root_node().has_error() {
        // Keep whatever parsed; decompiled output routinely trips the grammar somewhere
        debug!("Syntax errors in {}, keeping recovered declarations", path.display());
    }

    Ok(extract_declarations(&tree, text))
}

/// Scan every file in `files` in parallel
///
/// Fails only if the C# grammar cannot be loaded at all.
pub fn scan(root: &Path, files: &[PathBuf]) -> Result<ScanOutput> {
    // Surface an ABI mismatch once instead of once per file
    language::new_parser()?;

    let results: Vec<std::result::Result<ScannedFile, ScanError>> = files
        .par_iter()
        .map_init(
            || language::new_parser().ok(),
            |parser, path| scan_file(parser.as_mut(), root, path),
        )
        .collect();

    let mut output = ScanOutput::default();
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(file) => output.files.push(file),
            Err(e) => {
                warn!("Skipping {}: {}", display_relative(path, root), e);
                output.diagnostics.push(ScanDiagnostic {
                    path: path.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Scanned {} files ({} skipped)",
        output.files.len(),
        output.diagnostics.len()
    );
    Ok(output)
}

fn scan_file(
    parser: Option<&mut tree_sitter::Parser>,
    root: &Path,
    path: &Path,
) -> std::result::Result<ScannedFile, ScanError> {
    let parser = parser.ok_or_else(|| ScanError::Parse {
        path: path.to_path_buf(),
    })?;

    let bytes = fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content_hash = blake3::hash(&bytes).to_hex().to_string();

    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(text.as_ref());
    let declarations = parse_source(parser, path, text)?;

    Ok(ScannedFile {
        path: path.to_path_buf(),
        relative_path: display_relative(path, root),
        content_hash,
        declarations,
    })
}
