// API Functions - PyO3-exposed functions for Python
//
// Every entry point releases the GIL while the analyzer runs.

use super::PyAnalysisReport;
use crate::config::AnalyzerConfig;
use crate::pipeline::Analyzer;
use crate::query::filter_document;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::{Path, PathBuf};

/// Analyze a source tree and write Components.json and Systems.json
///
/// Args:
///     source_root (str): Directory scanned recursively for .cs files
///     skip_debug_systems (bool): Skip systems whose name contains "Debug"
///     components_output_path (str | None): Defaults to data/Components.json
///     systems_output_path (str | None): Defaults to data/Systems.json
///
/// Returns:
///     AnalysisReport: Counts for the run
///
/// Raises:
///     FileNotFoundError: If source_root does not exist
///     OSError: If source_root or an output path is unusable
#[pyfunction]
#[pyo3(signature = (source_root, skip_debug_systems=true, components_output_path=None, systems_output_path=None))]
pub fn analyze(
    py: Python<'_>,
    source_root: PathBuf,
    skip_debug_systems: bool,
    components_output_path: Option<PathBuf>,
    systems_output_path: Option<PathBuf>,
) -> PyResult<PyAnalysisReport> {
    let mut config = AnalyzerConfig::for_root(source_root);
    config.skip_debug_systems = skip_debug_systems;
    if let Some(path) = components_output_path {
        config.components_output_path = path;
    }
    if let Some(path) = systems_output_path {
        config.systems_output_path = path;
    }

    let report = py.detach(move || Analyzer::new(config).run())?;
    Ok(PyAnalysisReport::from_report(report))
}

/// Analyze using a TOML config file (camelCase keys)
///
/// Raises:
///     ValueError: If the config file is malformed
#[pyfunction]
#[pyo3(signature = (path))]
pub fn analyze_config(py: Python<'_>, path: PathBuf) -> PyResult<PyAnalysisReport> {
    let report = py.detach(move || {
        let config = AnalyzerConfig::load(Path::new(&path))?;
        Analyzer::new(config).run()
    })?;
    Ok(PyAnalysisReport::from_report(report))
}

/// Build both documents in memory without writing them
///
/// Returns:
///     tuple[str, str]: (Components.json, Systems.json) contents
#[pyfunction]
#[pyo3(signature = (source_root, skip_debug_systems=true))]
pub fn build_graph(
    py: Python<'_>,
    source_root: PathBuf,
    skip_debug_systems: bool,
) -> PyResult<(String, String)> {
    let mut config = AnalyzerConfig::for_root(source_root);
    config.skip_debug_systems = skip_debug_systems;

    let documents = py.detach(move || {
        let analysis = Analyzer::new(config).analyze()?;
        analysis.graph.to_json_strings()
    })?;
    Ok(documents)
}

/// Keys of an exported document matching a search term
///
/// Case-insensitive; an entry matches by name or by any of its uses_system /
/// used_in_system references. An empty term returns every key.
///
/// Args:
///     document (str): Contents of Components.json or Systems.json
///     term (str): Search term
///
/// Returns:
///     list[str]: Matching keys, sorted
#[pyfunction]
#[pyo3(signature = (document, term))]
pub fn search(document: &str, term: &str) -> PyResult<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| PyValueError::new_err(format!("Invalid document: {}", e)))?;
    Ok(filter_document(&value, term))
}
