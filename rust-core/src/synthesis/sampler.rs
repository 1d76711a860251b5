//! Synthetic training pairs
//!
//! Each clean vector holds a handful of spectral lines with random amplitude
//! and phase; the blurred vector is `x · B`, and the noisy vector adds
//! complex noise whose magnitude is bounded by `awgn_amp`.

use ndarray::Array2;
use num_complex::Complex64;
use rand::seq::index::sample;
use rand::Rng;
use std::f64::consts::PI;

use super::blur::BlurMatrix;
use crate::config::SynthesisConfig;
use crate::error::{SenError, SenResult};

/// One batch of (clean, blurred, noisy) vectors, each [batch, feature_len]
#[derive(Debug, Clone)]
pub struct SampleBatch {
    pub clean: Array2<Complex64>,
    pub blurred: Array2<Complex64>,
    pub noisy: Array2<Complex64>,
}

impl SampleBatch {
    pub fn batch_size(&self) -> usize {
        self.clean.nrows()
    }
}

/// Generator of synthetic training batches
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    blur: BlurMatrix,
    max_components: usize,
    awgn_amp: f64,
}

impl SampleGenerator {
    /// Create a generator around a blur matrix
    ///
    /// # Errors
    /// `InvalidParameter` if `max_freq_components` is zero or exceeds the
    /// feature length by more than one, or `awgn_amp` is negative
    pub fn new(blur: BlurMatrix, config: &SynthesisConfig) -> SenResult<Self> {
        if config.max_freq_components == 0 || config.max_freq_components - 1 > blur.len() {
            return Err(SenError::invalid(
                "max_freq_components",
                format!(
                    "must be in [1, {}], got {}",
                    blur.len() + 1,
                    config.max_freq_components
                ),
            ));
        }
        if !config.awgn_amp.is_finite() || config.awgn_amp < 0.0 {
            return Err(SenError::invalid("awgn_amp", "must be finite and >= 0"));
        }

        Ok(Self {
            blur,
            max_components: config.max_freq_components,
            awgn_amp: config.awgn_amp,
        })
    }

    pub fn feature_len(&self) -> usize {
        self.blur.len()
    }

    pub fn blur(&self) -> &BlurMatrix {
        &self.blur
    }

    /// Draw `n_batch` fresh, independent samples from `rng`
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, n_batch: usize) -> SenResult<SampleBatch> {
        let feature_len = self.feature_len();
        let mut clean = Array2::<Complex64>::zeros((n_batch, feature_len));

        for mut row in clean.rows_mut() {
            let n_carriers = rng.gen_range(0..self.max_components);
            for idx in sample(rng, feature_len, n_carriers) {
                let amp = rng.gen::<f64>();
                let phase = 2.0 * PI * rng.gen::<f64>() - PI;
                row[idx] = Complex64::from_polar(amp, phase);
            }
        }

        let blurred = self.blur.apply(clean.view())?;

        let mut noisy = blurred.clone();
        for value in noisy.iter_mut() {
            let amp = 2.0 * self.awgn_amp * (rng.gen::<f64>() - 0.5);
            let phase = 2.0 * PI * rng.gen::<f64>() - PI;
            *value += Complex64::from_polar(amp, phase);
        }

        Ok(SampleBatch {
            clean,
            blurred,
            noisy,
        })
    }
}
