//! Python bindings for spectrogram analysis

use num_complex::Complex64;
use numpy::{IntoPyArray, PyArray1, PyArray3, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::config::SpectralConfig;
use crate::spectrum::{SpectrogramAnalyzer, Stft, StftConfig, WindowType};

/// CSI to cropped, normalized spectrogram
#[pyclass(name = "SpectrogramAnalyzer")]
pub struct PySpectrogramAnalyzer {
    analyzer: SpectrogramAnalyzer,
}

#[pymethods]
impl PySpectrogramAnalyzer {
    /// Create an analyzer
    ///
    /// Args:
    ///     window: Window name ("gaussian", "rect", "hann", ...)
    ///     window_len: Window width W in samples
    ///     sample_rate: Sample rate in Hz
    ///     crop_len: Number of kept bins (odd)
    #[new]
    #[pyo3(signature = (window="gaussian", window_len=125, sample_rate=1000, crop_len=121))]
    fn new(window: &str, window_len: usize, sample_rate: u32, crop_len: usize) -> PyResult<Self> {
        let config = SpectralConfig {
            window_type: window.parse::<WindowType>()?,
            window_len,
            sample_rate,
            dft_width: sample_rate as usize,
            padded_len: sample_rate as usize,
            crop_len,
            feature_len: crop_len,
            ..SpectralConfig::default()
        };
        Ok(Self {
            analyzer: SpectrogramAnalyzer::new(&config)?,
        })
    }

    /// Analyze a CSI matrix laid out [time, channel]
    ///
    /// Returns:
    ///     Complex spectrogram [channel, crop_len, frame]
    fn analyze_csi<'py>(
        &mut self,
        py: Python<'py>,
        csi: PyReadonlyArray2<Complex64>,
    ) -> PyResult<&'py PyArray3<Complex64>> {
        Ok(self.analyzer.analyze_csi(csi.as_array())?.data.into_pyarray(py))
    }

    /// Frequency of every kept bin in Hz, DC in the center
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        self.analyzer.frequency_bins_hz().into_pyarray(py)
    }

    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }
}

/// Two-sided STFT of a [channel, time] signal
///
/// Returns:
///     (frequencies, times, spectrum [channel, dft_width, frame])
#[pyfunction]
#[pyo3(signature = (signal, sample_rate, window="gaussian", window_len=125, stride=1, dft_width=None))]
pub fn stft<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray2<Complex64>,
    sample_rate: u32,
    window: &str,
    window_len: usize,
    stride: usize,
    dft_width: Option<usize>,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>, &'py PyArray3<Complex64>)> {
    let config = StftConfig::new(
        sample_rate,
        stride,
        window_len,
        dft_width.unwrap_or(sample_rate as usize),
        window.parse::<WindowType>()?,
    )?;
    let out = Stft::new(config).process(signal.as_array());
    Ok((
        out.frequencies.into_pyarray(py),
        out.times.into_pyarray(py),
        out.spectrum.into_pyarray(py),
    ))
}

/// Cropped, normalized spectrogram of a [time, channel] CSI matrix
///
/// Returns:
///     (frequencies_hz, spectrogram [channel, crop_len, frame])
#[pyfunction]
#[pyo3(signature = (csi, window="gaussian", window_len=125, sample_rate=1000, crop_len=121))]
pub fn csi_to_spectrogram<'py>(
    py: Python<'py>,
    csi: PyReadonlyArray2<Complex64>,
    window: &str,
    window_len: usize,
    sample_rate: u32,
    crop_len: usize,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray3<Complex64>)> {
    let mut analyzer = PySpectrogramAnalyzer::new(window, window_len, sample_rate, crop_len)?;
    let spec = analyzer.analyzer.analyze_csi(csi.as_array())?;
    Ok((spec.frequencies.into_pyarray(py), spec.data.into_pyarray(py)))
}
