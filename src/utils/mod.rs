// Shared utilities for corpus traversal

/// Path conversion utilities (absolute -> relative Unix-style)
pub mod paths;

/// Ignore pattern utilities (.atlasignore support)
pub mod ignore;
