//! Utilities for handling .atlasignore file patterns
//!
//! Decompiled trees often carry generated or test folders that should not feed
//! the graph. Patterns are loaded once from the source root and matched against
//! paths relative to it.
//!
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default name of the ignore file looked up in the source root
pub const DEFAULT_IGNORE_FILE: &str = ".atlasignore";

/// A single ignore rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnorePattern {
    /// `generated/`: a whole path component and everything under it
    Directory(String),
    /// `*.g.cs`: a file name suffix
    Suffix(String),
    /// Anything else: a substring of the path
    Substring(String),
}

impl IgnorePattern {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }
        if let Some(dir) = raw.strip_suffix('/') {
            let dir = dir.trim_matches('/');
            return (!dir.is_empty()).then(|| IgnorePattern::Directory(dir.to_string()));
        }
        if let Some(suffix) = raw.strip_prefix('*') {
            return Some(IgnorePattern::Suffix(suffix.to_string()));
        }
        Some(IgnorePattern::Substring(raw.to_string()))
    }

    /// Match against a relative Unix-style path
    pub fn matches(&self, unix_path: &str) -> bool {
        match self {
            // Component match keeps "packages/" from hitting "my-packages"
            IgnorePattern::Directory(dir) => unix_path.split('/').any(|part| part == dir),
            IgnorePattern::Suffix(suffix) => unix_path.ends_with(suffix.as_str()),
            IgnorePattern::Substring(needle) => unix_path.contains(needle.as_str()),
        }
    }
}

/// Load ignore patterns from `file_name` in the source root
///
/// A missing file yields no patterns. Empty lines and `#` comments are skipped.
///
/// ```text
/// # .atlasignore
/// Tests/
/// *.g.cs
/// Obsolete
/// ```
pub fn load_ignore_file(root: &Path, file_name: &str) -> Result<Vec<IgnorePattern>> {
    let ignore_file = root.join(file_name);

    if !ignore_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&ignore_file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", ignore_file.display(), e))?;

    let patterns: Vec<IgnorePattern> = content.lines().filter_map(IgnorePattern::parse).collect();

    if !patterns.is_empty() {
        debug!(
            "Loaded {} ignore patterns from {}",
            patterns.len(),
            ignore_file.display()
        );
    }

    Ok(patterns)
}

/// Check a relative path against every pattern
pub fn is_ignored(path: &Path, patterns: &[IgnorePattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let unix_path = path.to_str().unwrap_or("").replace('\\', "/");
    patterns.iter().any(|pattern| pattern.matches(&unix_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_ignore_file() {
        let temp_dir = TempDir::new().unwrap();
        let patterns = load_ignore_file(temp_dir.path(), DEFAULT_IGNORE_FILE).unwrap();
        assert!(patterns.is_empty(), "Missing file should mean no patterns");
    }

    #[test]
    fn test_load_ignore_file_with_patterns() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(DEFAULT_IGNORE_FILE),
            "# Comment line\nTests/\n*.g.cs\n\nObsolete\n",
        )
        .unwrap();

        let patterns = load_ignore_file(temp_dir.path(), DEFAULT_IGNORE_FILE).unwrap();
        assert_eq!(
            patterns,
            vec![
                IgnorePattern::Directory("Tests".to_string()),
                IgnorePattern::Suffix(".g.cs".to_string()),
                IgnorePattern::Substring("Obsolete".to_string()),
            ]
        );
    }

    #[test]
    fn test_directory_pattern_respects_component_boundaries() {
        let patterns = vec![IgnorePattern::Directory("Tests".to_string())];

        assert!(is_ignored(&PathBuf::from("Tests/MoveTests.cs"), &patterns));
        assert!(is_ignored(&PathBuf::from("Game/Tests/MoveTests.cs"), &patterns));
        assert!(!is_ignored(&PathBuf::from("Game/UnitTests/MoveTests.cs"), &patterns));
        assert!(!is_ignored(&PathBuf::from("Game/Tests-old/MoveTests.cs"), &patterns));
    }

    #[test]
    fn test_suffix_and_substring_patterns() {
        let patterns = vec![
            IgnorePattern::Suffix(".g.cs".to_string()),
            IgnorePattern::Substring("Obsolete".to_string()),
        ];

        assert!(is_ignored(&PathBuf::from("Game/Prefabs/Prefab.g.cs"), &patterns));
        assert!(is_ignored(&PathBuf::from("Game/ObsoleteSystems/Old.cs"), &patterns));
        assert!(!is_ignored(&PathBuf::from("Game/Prefabs/Prefab.cs"), &patterns));
    }
}
