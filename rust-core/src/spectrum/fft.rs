//! Two-sided FFT engine for complex-valued signals
//!
//! CSI samples are complex, so the full spectrum (positive and negative
//! frequencies) is kept in standard DFT order: bins 0..N/2 hold DC and the
//! positive frequencies, the remaining bins hold the negative ones.

use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine for complex-valued signals
pub struct FftEngine {
    /// FFT size (DFT width)
    fft_size: usize,

    /// Forward FFT processor
    fft: Arc<dyn Fft<f64>>,

    /// Scratch space reused across calls
    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of output bins)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            scratch,
        }
    }

    /// Compute the two-sided spectrum of `signal`
    ///
    /// # Arguments
    /// * `signal` - Input samples (zero-padded if shorter than fft_size,
    ///   truncated if longer)
    ///
    /// # Returns
    /// Complex spectrum X[k] for k = 0..fft_size
    pub fn compute(&mut self, signal: &[Complex64]) -> Vec<Complex64> {
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.fft_size];
        let copy_len = signal.len().min(self.fft_size);
        buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.process_inplace(&mut buffer);
        buffer
    }

    /// Transform a buffer of exactly `fft_size` samples in place
    pub fn process_inplace(&mut self, buffer: &mut [Complex64]) {
        debug_assert_eq!(buffer.len(), self.fft_size);
        self.fft.process_with_scratch(buffer, &mut self.scratch);
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (two-sided, equal to fft_size)
    pub fn num_bins(&self) -> usize {
        self.fft_size
    }

    /// Frequency in Hz of bin `bin` in DFT order
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        let n = self.fft_size as f64;
        let signed = if bin < (self.fft_size + 1) / 2 {
            bin as f64
        } else {
            bin as f64 - n
        };
        signed * sample_rate / n
    }

    /// Frequency axis in Hz, DFT order: [0, 1, ..., -2, -1] * fs/N
    pub fn frequency_axis(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.fft_size)
            .map(|bin| self.bin_to_hz(bin, sample_rate))
            .collect()
    }
}
