use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::analyzer;
use crate::timing;

// ──────────────────────────────────────────────────────────────────────────────
// ROUTE ANALYSIS: points JSON (+ optional config/metadata JSON) → analysis JSON
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
#[pyo3(signature = (points_json, config_json=None, metadata_json=None))]
fn analyze_route_json(
    points_json: &str,
    config_json: Option<&str>,
    metadata_json: Option<&str>,
) -> PyResult<String> {
    analyzer::analyze_route_json(points_json, config_json, metadata_json)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

// ──────────────────────────────────────────────────────────────────────────────
// TIMING: lead-distance breakdown for one speed/advisory/speech request
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn lead_distance_json(request_json: &str) -> PyResult<String> {
    timing::lead_distance_json(request_json).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn metrics_text() -> String {
    crate::metrics::gather_text()
}

#[pymodule]
fn curvecall_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_route_json, m)?)?;
    m.add_function(wrap_pyfunction!(lead_distance_json, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
