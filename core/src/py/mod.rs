// Python-bindinger (feature = "python"). Tynt lag over kjernen:
// all validering og analyse skjer i Rust, Python får JSON tilbake.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::analyzer::analyze_window_json;
use crate::channel::extract;
use crate::models::{ChannelMode, Rgb};

fn to_py_err(e: crate::error::CoreError) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

/// Én pulsverdi fra snittfarger. `mode` er f.eks. "default" eller "redOnly".
#[pyfunction]
#[pyo3(signature = (r, g, b, mode = "default"))]
fn extract_sample(r: f64, g: f64, b: f64, mode: &str) -> PyResult<f64> {
    let mode: ChannelMode = mode.parse().map_err(to_py_err)?;
    extract(Rgb::new(r, g, b), mode).map_err(to_py_err)
}

/// Analyser et vindu: `samples_json` = [{timestamp, value}], `config_json` = ProcessingConfig.
#[pyfunction]
#[pyo3(name = "analyze_window_json", signature = (samples_json, config_json = None))]
fn analyze_window_json_py(samples_json: &str, config_json: Option<&str>) -> PyResult<String> {
    analyze_window_json(samples_json, config_json).map_err(to_py_err)
}

/// (nøkkel, etikett) for alle kanalmoduser
#[pyfunction]
fn channel_modes() -> Vec<(&'static str, &'static str)> {
    ChannelMode::ALL.iter().map(|m| (m.key(), m.label())).collect()
}

#[pymodule]
fn heartlens_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(extract_sample, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_window_json_py, m)?)?;
    m.add_function(wrap_pyfunction!(channel_modes, m)?)?;
    Ok(())
}
