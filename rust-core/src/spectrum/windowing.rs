//! Windowing of complex frames before the FFT
//!
//! Applies windows to time-domain segments to shape spectral leakage

use num_complex::Complex64;

/// Apply window in-place
pub fn apply_window_inplace(segment: &mut [Complex64], window: &[f64]) {
    for (s, &w) in segment.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Amplitude scale of a windowed spectrum
///
/// A unit-amplitude tone that falls exactly on a bin produces |X[k]| = Σw.
/// Multiplying by 1/Σw brings that peak back to the tone amplitude.
///
/// # Returns
/// Scale factor (multiply FFT output by this)
pub fn spectrum_scale(window: &[f64]) -> f64 {
    let sum: f64 = window.iter().sum();
    1.0 / sum
}
