//! Python bindings for blur matrices and training samples

use num_complex::Complex64;
use numpy::{IntoPyArray, PyArray2};
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SynthesisConfig;
use crate::spectrum::WindowType;
use crate::synthesis::{BlurMatrix, BlurSpec, SampleGenerator};

fn build_blur(
    window: &str,
    window_len: usize,
    padded_len: usize,
    crop_len: usize,
    sample_rate: u32,
) -> PyResult<BlurMatrix> {
    let spec = BlurSpec {
        window_type: window.parse::<WindowType>()?,
        window_len,
        padded_len,
        crop_len,
        sample_rate,
    };
    Ok(BlurMatrix::generate(spec)?)
}

/// Leakage matrix [crop_len, crop_len]; row i is the spectrum of a carrier at
/// i - (crop_len - 1) / 2 Hz
#[pyfunction]
#[pyo3(signature = (window="gaussian", window_len=125, padded_len=1000, crop_len=121, sample_rate=1000))]
pub fn blur_matrix<'py>(
    py: Python<'py>,
    window: &str,
    window_len: usize,
    padded_len: usize,
    crop_len: usize,
    sample_rate: u32,
) -> PyResult<&'py PyArray2<Complex64>> {
    let blur = build_blur(window, window_len, padded_len, crop_len, sample_rate)?;
    Ok(blur.view().to_owned().into_pyarray(py))
}

/// Synthesize a training batch
///
/// Returns:
///     (clean, blurred, noisy), each [batch, crop_len]
#[pyfunction]
#[pyo3(signature = (batch_size, seed=None, window="gaussian", window_len=125, crop_len=121, max_freq_components=3, awgn_amp=0.01))]
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn synthesize_batch<'py>(
    py: Python<'py>,
    batch_size: usize,
    seed: Option<u64>,
    window: &str,
    window_len: usize,
    crop_len: usize,
    max_freq_components: usize,
    awgn_amp: f64,
) -> PyResult<(
    &'py PyArray2<Complex64>,
    &'py PyArray2<Complex64>,
    &'py PyArray2<Complex64>,
)> {
    let blur = build_blur(window, window_len, 1000, crop_len, 1000)?;
    let config = SynthesisConfig {
        max_freq_components,
        awgn_amp,
    };
    let sampler = SampleGenerator::new(blur, &config)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let batch = sampler.generate(&mut rng, batch_size)?;
    Ok((
        batch.clean.into_pyarray(py),
        batch.blurred.into_pyarray(py),
        batch.noisy.into_pyarray(py),
    ))
}
