//! Short-time Fourier transform of multi-channel complex series
//!
//! Frames follow the zero-boundary, padded convention: ⌊W/2⌋ zeros are added
//! on both ends, the tail is zero-padded until (len - W) is a multiple of the
//! stride, and every stride-aligned frame is transformed. Partial frames at
//! the edges are therefore always present.

use ndarray::{Array1, Array3, ArrayView2};
use num_complex::Complex64;

use super::fft::FftEngine;
use super::windowing::{apply_window_inplace, spectrum_scale};
use super::windows::WindowType;
use crate::error::{SenError, SenResult};

/// STFT parameters, validated on construction
#[derive(Debug, Clone, PartialEq)]
pub struct StftConfig {
    sample_rate: u32,
    stride: usize,
    window_width: usize,
    dft_width: usize,
    window_type: WindowType,
}

impl StftConfig {
    /// Create a validated STFT configuration
    ///
    /// # Errors
    /// `InvalidParameter` unless `window_width > 0`,
    /// `0 < stride <= window_width`, `dft_width >= window_width` and
    /// `sample_rate > 0`.
    pub fn new(
        sample_rate: u32,
        stride: usize,
        window_width: usize,
        dft_width: usize,
        window_type: WindowType,
    ) -> SenResult<Self> {
        if window_width == 0 {
            return Err(SenError::invalid("window_width", "must be > 0"));
        }
        if stride == 0 || stride > window_width {
            return Err(SenError::invalid(
                "stride",
                format!("must be in (0, {window_width}], got {stride}"),
            ));
        }
        if dft_width < window_width {
            return Err(SenError::invalid(
                "dft_width",
                format!("must be >= window width {window_width}, got {dft_width}"),
            ));
        }
        if sample_rate == 0 {
            return Err(SenError::invalid("sample_rate", "must be > 0"));
        }

        Ok(Self {
            sample_rate,
            stride,
            window_width,
            dft_width,
            window_type,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn window_width(&self) -> usize {
        self.window_width
    }

    pub fn dft_width(&self) -> usize {
        self.dft_width
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    /// Length of a series of `len` samples after boundary and tail padding
    pub fn padded_len(&self, len: usize) -> usize {
        let extended = len + 2 * (self.window_width / 2);
        let overhang = extended as i64 - self.window_width as i64;
        let tail = (-overhang).rem_euclid(self.stride as i64) as usize % self.window_width;
        extended + tail
    }

    /// Number of frames produced for a series of `len` samples
    pub fn num_frames(&self, len: usize) -> usize {
        let padded = self.padded_len(len);
        if padded < self.window_width {
            0
        } else {
            (padded - self.window_width) / self.stride + 1
        }
    }
}

/// Result of a multi-channel STFT
#[derive(Debug, Clone)]
pub struct StftOutput {
    /// Frequency of each bin in Hz, two-sided DFT order
    pub frequencies: Array1<f64>,
    /// Center time of each frame in seconds
    pub times: Array1<f64>,
    /// Complex spectra indexed [channel, frequency, frame]
    pub spectrum: Array3<Complex64>,
}

/// Windowed STFT engine
pub struct Stft {
    config: StftConfig,
    window: Vec<f64>,
    scale: f64,
    fft_engine: FftEngine,
}

impl Stft {
    /// Create new STFT engine
    pub fn new(config: StftConfig) -> Self {
        let window = config.window_type.coefficients(config.window_width);
        let scale = spectrum_scale(&window);
        let fft_engine = FftEngine::new(config.dft_width);

        Self {
            config,
            window,
            scale,
            fft_engine,
        }
    }

    pub fn config(&self) -> &StftConfig {
        &self.config
    }

    /// Frequency axis in Hz (length = DFT width)
    pub fn frequencies(&self) -> Array1<f64> {
        Array1::from(
            self.fft_engine
                .frequency_axis(f64::from(self.config.sample_rate)),
        )
    }

    /// Transform a [channel, time] series
    ///
    /// # Returns
    /// Spectra indexed [channel, frequency, frame]; the frequency axis always
    /// has DFT-width bins regardless of the input length
    pub fn process(&mut self, signal: ArrayView2<Complex64>) -> StftOutput {
        let (n_channels, len) = signal.dim();
        let n_frames = self.config.num_frames(len);
        let padded_len = self.config.padded_len(len);
        let half = self.config.window_width / 2;
        let width = self.config.window_width;
        let stride = self.config.stride;
        let dft_width = self.config.dft_width;

        let mut spectrum = Array3::<Complex64>::zeros((n_channels, dft_width, n_frames));
        let mut padded = vec![Complex64::new(0.0, 0.0); padded_len];
        let mut frame = vec![Complex64::new(0.0, 0.0); dft_width];

        for (ch, row) in signal.outer_iter().enumerate() {
            padded.iter_mut().for_each(|s| *s = Complex64::new(0.0, 0.0));
            for (dst, &src) in padded[half..half + len].iter_mut().zip(row.iter()) {
                *dst = src;
            }

            for t in 0..n_frames {
                let start = t * stride;
                frame[..width].copy_from_slice(&padded[start..start + width]);
                frame[width..].iter_mut().for_each(|s| *s = Complex64::new(0.0, 0.0));
                apply_window_inplace(&mut frame[..width], &self.window);

                self.fft_engine.process_inplace(&mut frame);

                for (k, &value) in frame.iter().enumerate() {
                    spectrum[[ch, k, t]] = value * self.scale;
                }
            }
        }

        let fs = f64::from(self.config.sample_rate);
        let times = Array1::from_shape_fn(n_frames, |t| (t * stride) as f64 / fs);

        StftOutput {
            frequencies: self.frequencies(),
            times,
            spectrum,
        }
    }
}
