//! Crop, unwrap and normalize two-sided spectra
//!
//! A crop of odd length C keeps DC, the (C-1)/2 lowest positive and the
//! (C-1)/2 lowest negative frequencies, then rotates them into ascending
//! frequency order so that DC sits at index (C-1)/2.

use ndarray::{Array3, ArrayView3};
use num_complex::Complex64;
use tracing::warn;

use crate::error::{SenError, SenResult};

/// Validated crop length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    len: usize,
}

impl Crop {
    /// Create a crop of `len` bins out of a spectrum of `full_width` bins
    ///
    /// # Errors
    /// `InvalidParameter` if `len` is even, zero, or wider than `full_width`
    pub fn new(len: usize, full_width: usize) -> SenResult<Self> {
        if len == 0 || len % 2 == 0 {
            return Err(SenError::invalid(
                "crop_len",
                format!("must be a positive odd number, got {len}"),
            ));
        }
        if len > full_width {
            return Err(SenError::invalid(
                "crop_len",
                format!("{len} exceeds spectrum width {full_width}"),
            ));
        }
        Ok(Self { len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Index of the DC bin after unwrapping
    pub fn center(&self) -> usize {
        self.len / 2
    }

    /// Bins taken from the head of the spectrum (DC and positive frequencies)
    pub fn n_positive(&self) -> usize {
        (self.len + 1) / 2
    }

    /// Bins taken from the tail of the spectrum (negative frequencies)
    pub fn n_negative(&self) -> usize {
        (self.len - 1) / 2
    }

    fn check_width(&self, width: usize, actual: Vec<usize>) -> SenResult<()> {
        if width < self.len {
            return Err(SenError::Shape {
                expected: format!("at least {} frequency bins", self.len),
                actual,
            });
        }
        Ok(())
    }

    /// Crop and unwrap a single two-sided spectrum
    ///
    /// # Errors
    /// `Shape` if the spectrum has fewer bins than the crop keeps
    pub fn apply(&self, spectrum: &[Complex64]) -> SenResult<Vec<Complex64>> {
        let width = spectrum.len();
        self.check_width(width, vec![width])?;
        let neg = &spectrum[width - self.n_negative()..];
        let pos = &spectrum[..self.n_positive()];
        // [pos | neg] rotated right by n_negative == [neg | pos]
        Ok(neg.iter().chain(pos.iter()).copied().collect())
    }

    /// Crop and unwrap along axis 1 of a [channel, frequency, frame] array
    ///
    /// # Errors
    /// `Shape` if axis 1 is shorter than the crop
    pub fn apply_spectrogram(
        &self,
        spectrum: ArrayView3<Complex64>,
    ) -> SenResult<Array3<Complex64>> {
        let (n_channels, width, n_frames) = spectrum.dim();
        self.check_width(width, spectrum.shape().to_vec())?;
        let n_neg = self.n_negative();
        Ok(Array3::from_shape_fn((n_channels, self.len, n_frames), |(c, k, t)| {
            let src = if k < n_neg { width - n_neg + k } else { k - n_neg };
            spectrum[[c, src, t]]
        }))
    }

    /// Frequencies (in units of the bin spacing) of the unwrapped bins
    pub fn bin_offsets(&self) -> Vec<i64> {
        let half = self.n_negative() as i64;
        (-half..=half).collect()
    }
}

/// Normalize each channel of a [channel, frequency, frame] array to unit peak
///
/// Every channel is divided by its own maximum magnitude. A channel whose
/// peak is zero or non-finite yields non-finite values; those are left in
/// place and reported with a warning.
///
/// # Returns
/// Number of non-finite values in the normalized output
pub fn normalize_per_channel(spectrum: &mut Array3<Complex64>) -> usize {
    for (ch, mut channel) in spectrum.outer_iter_mut().enumerate() {
        let peak = channel.iter().map(|c| c.norm()).fold(0.0f64, f64::max);
        if peak == 0.0 || !peak.is_finite() {
            warn!(channel = ch, peak, "degenerate channel peak during normalization");
        }
        channel.mapv_inplace(|c| c / peak);
    }

    let non_finite = spectrum
        .iter()
        .filter(|c| !c.re.is_finite() || !c.im.is_finite())
        .count();
    if non_finite > 0 {
        warn!(non_finite, "non-finite values detected in normalized spectrogram");
    }
    non_finite
}

/// Normalize a single row to unit peak magnitude
///
/// # Returns
/// (peak, floor) magnitudes of the row before normalization
pub fn normalize_row(row: &mut [Complex64]) -> (f64, f64) {
    let peak = row.iter().map(|c| c.norm()).fold(0.0f64, f64::max);
    let floor = row.iter().map(|c| c.norm()).fold(f64::INFINITY, f64::min);
    for c in row.iter_mut() {
        *c /= peak;
    }
    (peak, floor)
}
