//! Language Support - tree-sitter configuration for the analyzed corpus
//!
//! The corpus is C#. All grammar wiring lives here so the scanner never touches
//! `tree_sitter_c_sharp` directly.

use crate::error::Result;
use std::path::Path;
use tree_sitter::{Language, Parser};

/// Default extension of corpus source files
pub const DEFAULT_EXTENSION: &str = "cs";

/// Node kinds that declare a type the name index tracks
pub const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "record_declaration",
    "record_struct_declaration",
];

/// Get the tree-sitter language for C#
pub fn csharp_language() -> Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

/// Create a parser configured for C#
///
/// Fails only when the grammar was built against an incompatible tree-sitter ABI.
pub fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser.set_language(&csharp_language())?;
    Ok(parser)
}

/// Check whether a path carries the configured source extension (case-insensitive)
pub fn is_source_file(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

/// Whether a node kind is one of the tracked type declarations
pub fn is_type_declaration(kind: &str) -> bool {
    TYPE_DECLARATION_KINDS.contains(&kind)
}
