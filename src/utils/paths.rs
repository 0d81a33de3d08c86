// Path Conversion Utilities
//
// Diagnostics, digests and logs refer to corpus files by their path relative to
// the source root, with `/` separators on every platform.

use anyhow::{Context, Result};
use std::path::{Path, MAIN_SEPARATOR};

/// Convert a path under `root` to a relative Unix-style path (`Game/Objects/Position.cs`)
///
/// Fails when `path` is not inside `root` or is not valid UTF-8.
pub fn to_relative_unix_style(path: &Path, root: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).with_context(|| {
        format!(
            "File path '{}' is not within source root '{}'",
            path.display(),
            root.display()
        )
    })?;

    let path_str = relative.to_str().context("Path contains invalid UTF-8")?;

    if MAIN_SEPARATOR == '\\' {
        Ok(path_str.replace('\\', "/"))
    } else {
        Ok(path_str.to_string())
    }
}

/// Relative Unix-style path, or the full lossy path when it cannot be made relative
pub fn display_relative(path: &Path, root: &Path) -> String {
    to_relative_unix_style(path, root).unwrap_or_else(|_| path.to_string_lossy().replace('\\', "/"))
}
