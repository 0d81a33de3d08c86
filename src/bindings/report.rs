// PyAnalysisReport - PyO3 wrapper for AnalysisReport

use crate::pipeline::AnalysisReport;
use pyo3::prelude::*;

/// Counts and corpus digest of one analysis run
#[pyclass(name = "AnalysisReport")]
pub struct PyAnalysisReport {
    inner: AnalysisReport,
}

impl PyAnalysisReport {
    pub fn from_report(report: AnalysisReport) -> Self {
        PyAnalysisReport { inner: report }
    }
}

#[pymethods]
impl PyAnalysisReport {
    #[getter]
    fn files_scanned(&self) -> usize {
        self.inner.files_scanned
    }

    #[getter]
    fn files_failed(&self) -> usize {
        self.inner.files_failed
    }

    #[getter]
    fn components(&self) -> usize {
        self.inner.components
    }

    #[getter]
    fn systems(&self) -> usize {
        self.inner.systems
    }

    #[getter]
    fn skipped_debug_systems(&self) -> usize {
        self.inner.skipped_debug_systems
    }

    #[getter]
    fn unresolved_references(&self) -> usize {
        self.inner.unresolved_references
    }

    #[getter]
    fn corpus_digest(&self) -> String {
        self.inner.corpus_digest.clone()
    }

    /// The report as a JSON object string
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        format!(
            "AnalysisReport(files_scanned={}, files_failed={}, components={}, systems={})",
            self.inner.files_scanned,
            self.inner.files_failed,
            self.inner.components,
            self.inner.systems
        )
    }
}
