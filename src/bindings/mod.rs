// PyO3 Bindings Module
//
// Python surface of the analyzer: run a full analysis, build the graph in
// memory, and search an exported document.

mod api;
mod report;

pub use api::{analyze, analyze_config, build_graph, search};
pub use report::PyAnalysisReport;

use crate::error::AtlasError;
use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyRuntimeError, PyValueError};
use pyo3::PyErr;

impl From<AtlasError> for PyErr {
    fn from(err: AtlasError) -> PyErr {
        let message = err.to_string();
        match err {
            AtlasError::SourceRootMissing { .. } => PyFileNotFoundError::new_err(message),
            AtlasError::SourceRootNotDirectory { .. } | AtlasError::Io { .. } => {
                PyIOError::new_err(message)
            }
            AtlasError::Json(_) | AtlasError::Config { .. } => PyValueError::new_err(message),
            AtlasError::Grammar(_) | AtlasError::ThreadPool(_) => {
                PyRuntimeError::new_err(message)
            }
        }
    }
}
