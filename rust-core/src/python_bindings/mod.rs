//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::SenError;

mod spectrum_bindings;
mod synthesis_bindings;

impl From<SenError> for PyErr {
    fn from(err: SenError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn doppler_sen(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PySpectrogramAnalyzer>()?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::stft, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::csi_to_spectrogram, m)?)?;
    m.add_function(wrap_pyfunction!(synthesis_bindings::blur_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(synthesis_bindings::synthesize_batch, m)?)?;
    Ok(())
}
