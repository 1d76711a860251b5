//! High-level spectrogram analyzer
//!
//! Combines the STFT engine with crop/unwrap/normalize to turn a CSI series
//! into the Doppler spectrogram consumed by the enhancement network

use ndarray::{Array1, Array3, ArrayView2};
use num_complex::Complex64;
use tracing::debug;

use super::crop::{normalize_per_channel, Crop};
use super::stft::{Stft, StftConfig};
use crate::config::SpectralConfig;
use crate::error::SenResult;

/// Cropped, unwrapped and normalized spectrogram
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Doppler frequency of each bin in Hz, ascending
    pub frequencies: Array1<f64>,
    /// Frame times in seconds
    pub times: Array1<f64>,
    /// Complex values indexed [channel, frequency, frame]
    pub data: Array3<Complex64>,
    /// Non-finite values produced by normalization
    pub non_finite: usize,
}

impl Spectrogram {
    pub fn num_channels(&self) -> usize {
        self.data.dim().0
    }

    pub fn num_bins(&self) -> usize {
        self.data.dim().1
    }

    pub fn num_frames(&self) -> usize {
        self.data.dim().2
    }
}

/// CSI spectrogram analyzer
pub struct SpectrogramAnalyzer {
    stft: Stft,
    crop: Crop,
}

impl SpectrogramAnalyzer {
    /// Create new analyzer from a validated spectral configuration
    pub fn new(config: &SpectralConfig) -> SenResult<Self> {
        let stft_config = StftConfig::new(
            config.sample_rate,
            config.stride,
            config.window_len,
            config.dft_width,
            config.window_type,
        )?;
        let crop = Crop::new(config.crop_len, config.dft_width)?;

        Ok(Self {
            stft: Stft::new(stft_config),
            crop,
        })
    }

    /// Analyze a CSI matrix laid out [time, channel]
    pub fn analyze_csi(&mut self, csi: ArrayView2<Complex64>) -> SenResult<Spectrogram> {
        self.analyze(csi.t())
    }

    /// Analyze a series laid out [channel, time]
    ///
    /// # Returns
    /// Spectrogram with `crop_len` bins whose per-channel peak magnitude is 1
    pub fn analyze(&mut self, signal: ArrayView2<Complex64>) -> SenResult<Spectrogram> {
        let output = self.stft.process(signal);
        let mut data = self.crop.apply_spectrogram(output.spectrum.view())?;
        let non_finite = normalize_per_channel(&mut data);

        debug!(
            channels = data.dim().0,
            bins = data.dim().1,
            frames = data.dim().2,
            "spectrogram computed"
        );

        Ok(Spectrogram {
            frequencies: self.frequency_bins_hz(),
            times: output.times,
            data,
            non_finite,
        })
    }

    /// Get cropped frequency bins in Hz (ascending, DC at the center)
    pub fn frequency_bins_hz(&self) -> Array1<f64> {
        let cfg = self.stft.config();
        let spacing = f64::from(cfg.sample_rate()) / cfg.dft_width() as f64;
        self.crop
            .bin_offsets()
            .into_iter()
            .map(|k| k as f64 * spacing)
            .collect()
    }

    /// Get STFT configuration
    pub fn stft_config(&self) -> &StftConfig {
        self.stft.config()
    }

    /// Get number of cropped frequency bins
    pub fn num_bins(&self) -> usize {
        self.crop.len()
    }
}
