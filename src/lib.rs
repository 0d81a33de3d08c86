// ECS Atlas Core - dependency graph extraction for decompiled ECS game code
//
// Scans C# sources with tree-sitter, classifies component and system
// declarations by their base-type markers, and exports the component/system
// graph as two JSON documents. Usable as a Rust library or, with the `python`
// feature, as a PyO3 extension module.

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod index;
pub mod language;
pub mod logging;
pub mod markers;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod scanner;
pub mod utils;

#[cfg(feature = "python")]
pub mod bindings;

pub use config::AnalyzerConfig;
pub use error::{AtlasError, Result};
pub use export::{ExportedComponent, ExportedGraph, ExportedSystem};
pub use pipeline::{Analysis, AnalysisReport, Analyzer};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// ECS Atlas Python module
///
/// Builds the component/system graph of a decompiled ECS code base.
#[cfg(feature = "python")]
#[pymodule]
fn ecs_atlas_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    logging::init("info");

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_function(wrap_pyfunction!(bindings::analyze, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::analyze_config, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::build_graph, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::search, m)?)?;

    m.add_class::<bindings::PyAnalysisReport>()?;

    Ok(())
}
