//! Spectral blur (leakage) matrix
//!
//! Row i is the cropped, unwrapped, unit-peak spectrum of an ideal complex
//! carrier at integer frequency i - (C-1)/2 Hz after windowing to W samples
//! and zero-padding to P samples. A clean spectral line vector `x` (row
//! vector) is blurred as `x · B`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;
use std::f64::consts::PI;
use tracing::info;

use crate::config::SpectralConfig;
use crate::error::{SenError, SenResult};
use crate::spectrum::crop::{normalize_row, Crop};
use crate::spectrum::windowing::apply_window_inplace;
use crate::spectrum::{FftEngine, WindowType};

/// Parameters that determine a blur matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurSpec {
    pub window_type: WindowType,
    pub window_len: usize,
    pub padded_len: usize,
    pub crop_len: usize,
    pub sample_rate: u32,
}

impl From<&SpectralConfig> for BlurSpec {
    fn from(config: &SpectralConfig) -> Self {
        Self {
            window_type: config.window_type,
            window_len: config.window_len,
            padded_len: config.padded_len,
            crop_len: config.crop_len,
            sample_rate: config.sample_rate,
        }
    }
}

/// Immutable C×C complex leakage operator
#[derive(Debug, Clone)]
pub struct BlurMatrix {
    spec: BlurSpec,
    matrix: Array2<Complex64>,
    /// Smallest magnitude of each row relative to its peak
    row_floor: Array1<f64>,
}

impl BlurMatrix {
    /// Synthesize the blur matrix for `spec`
    ///
    /// # Errors
    /// `InvalidParameter` if the window is empty, the padded length is
    /// shorter than the window, or the crop length is even or wider than
    /// the padded length
    pub fn generate(spec: BlurSpec) -> SenResult<Self> {
        if spec.window_len == 0 {
            return Err(SenError::invalid("window_len", "must be > 0"));
        }
        if spec.padded_len < spec.window_len {
            return Err(SenError::invalid(
                "padded_len",
                format!(
                    "must be >= window_len {}, got {}",
                    spec.window_len, spec.padded_len
                ),
            ));
        }
        if spec.sample_rate == 0 {
            return Err(SenError::invalid("sample_rate", "must be > 0"));
        }
        let crop = Crop::new(spec.crop_len, spec.padded_len)?;

        let fs = f64::from(spec.sample_rate);
        let window = spec.window_type.coefficients(spec.window_len);
        let mut fft = FftEngine::new(spec.padded_len);
        let f_high = crop.n_negative() as i64;

        let mut matrix = Array2::<Complex64>::zeros((spec.crop_len, spec.crop_len));
        let mut row_floor = Array1::<f64>::zeros(spec.crop_len);
        let mut carrier = vec![Complex64::new(0.0, 0.0); spec.padded_len];

        for (i, freq) in (-f_high..=f_high).enumerate() {
            carrier.iter_mut().for_each(|c| *c = Complex64::new(0.0, 0.0));
            for (n, c) in carrier[..spec.window_len].iter_mut().enumerate() {
                *c = Complex64::from_polar(1.0, 2.0 * PI * freq as f64 * n as f64 / fs);
            }
            apply_window_inplace(&mut carrier[..spec.window_len], &window);

            fft.process_inplace(&mut carrier);

            let mut row = crop.apply(&carrier)?;
            let (peak, floor) = normalize_row(&mut row);
            row_floor[i] = floor / peak;

            matrix.row_mut(i).assign(&ArrayView1::from(&row[..]));
        }

        info!(
            window = %spec.window_type,
            window_len = spec.window_len,
            padded_len = spec.padded_len,
            crop_len = spec.crop_len,
            "blur matrix generated"
        );

        Ok(Self {
            spec,
            matrix,
            row_floor,
        })
    }

    /// Synthesize the blur matrix for a spectral configuration
    pub fn from_config(config: &SpectralConfig) -> SenResult<Self> {
        Self::generate(BlurSpec::from(config))
    }

    pub fn spec(&self) -> &BlurSpec {
        &self.spec
    }

    /// Matrix size C
    pub fn len(&self) -> usize {
        self.spec.crop_len
    }

    pub fn is_empty(&self) -> bool {
        self.spec.crop_len == 0
    }

    /// Row index of the DC carrier
    pub fn dc_row(&self) -> usize {
        self.spec.crop_len / 2
    }

    pub fn view(&self) -> ArrayView2<'_, Complex64> {
        self.matrix.view()
    }

    /// Relative floor (min/max magnitude) of each row
    pub fn row_floor(&self) -> &Array1<f64> {
        &self.row_floor
    }

    /// Blur a batch of row vectors: `x · B`
    ///
    /// # Errors
    /// `Shape` if `x` does not have C columns
    pub fn apply(&self, x: ArrayView2<Complex64>) -> SenResult<Array2<Complex64>> {
        if x.ncols() != self.len() {
            return Err(SenError::Shape {
                expected: format!("[*, {}]", self.len()),
                actual: x.shape().to_vec(),
            });
        }
        Ok(x.dot(&self.matrix))
    }
}
