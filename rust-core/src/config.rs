//! Run configuration
//!
//! [`SenConfig`] gathers every constant the spectral pipeline, the sample
//! synthesizer and the training loop consume. It is immutable once built:
//! load it with [`SenConfig::from_json`] or start from [`SenConfig::default`],
//! then call [`SenConfig::validate`] before handing sections to components.
//!
//! ```
//! use doppler_sen::config::SenConfig;
//!
//! let cfg = SenConfig::default();
//! cfg.validate().unwrap();
//! assert_eq!(cfg.spectral.feature_len, 121);
//! assert_eq!(cfg.model_prefix(), "SEN_gaussian_W125");
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SenError, SenResult};
use crate::spectrum::WindowType;

/// Window, FFT and crop parameters shared by the STFT and the blur matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Analysis window
    pub window_type: WindowType,
    /// Window width in samples
    pub window_len: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// STFT hop in samples
    pub stride: usize,
    /// STFT DFT width
    pub dft_width: usize,
    /// Zero-padded length used when synthesizing blur-matrix rows
    pub padded_len: usize,
    /// Number of bins kept around DC
    pub crop_len: usize,
    /// Length of the network's feature vectors
    pub feature_len: usize,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            window_type: WindowType::Gaussian,
            window_len: 125,
            sample_rate: 1000,
            stride: 1,
            dft_width: 1000,
            padded_len: 1000,
            crop_len: 121,
            feature_len: 121,
        }
    }
}

/// Synthetic sample parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Exclusive upper bound on active carriers per clean vector
    pub max_freq_components: usize,
    /// Half-width of the additive noise amplitude band
    pub awgn_amp: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_freq_components: 3,
            awgn_amp: 0.01,
        }
    }
}

/// Training loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub batch_size: usize,
    pub valid_batch_size: usize,
    pub iterations_per_epoch: usize,
    /// First epoch (inclusive)
    pub begin_epoch: usize,
    /// Last epoch (inclusive)
    pub end_epoch: usize,
    /// Save a checkpoint whenever `epoch % checkpoint_interval == 0`
    pub checkpoint_interval: usize,
    pub learning_rate: f64,
    /// Log the batch loss every `log_interval` iterations
    pub log_interval: usize,
    pub checkpoint_dir: PathBuf,
    /// Checkpoint file prefix; derived from the window when absent
    pub model_prefix: Option<String>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            valid_batch_size: 64,
            iterations_per_epoch: 500,
            begin_epoch: 1,
            end_epoch: 10000,
            checkpoint_interval: 500,
            learning_rate: 0.001,
            log_interval: 10,
            checkpoint_dir: PathBuf::from("SEN_Results"),
            model_prefix: None,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenConfig {
    pub spectral: SpectralConfig,
    pub synthesis: SynthesisConfig,
    pub training: TrainingConfig,
}

impl SenConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json(path: &Path) -> SenResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SenError::io(path, e))?;
        let cfg: SenConfig = serde_json::from_str(&contents).map_err(|source| SenError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn to_json(&self, path: &Path) -> SenResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SenError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| SenError::io(path, e))
    }

    /// Checkpoint prefix, e.g. `SEN_gaussian_W125`
    pub fn model_prefix(&self) -> String {
        match &self.training.model_prefix {
            Some(prefix) => prefix.clone(),
            None => format!(
                "SEN_{}_W{}",
                self.spectral.window_type, self.spectral.window_len
            ),
        }
    }

    /// Check every cross-field constraint
    pub fn validate(&self) -> SenResult<()> {
        let sp = &self.spectral;
        if sp.window_len == 0 {
            return Err(SenError::invalid("window_len", "must be > 0"));
        }
        if sp.sample_rate == 0 {
            return Err(SenError::invalid("sample_rate", "must be > 0"));
        }
        if sp.stride == 0 || sp.stride > sp.window_len {
            return Err(SenError::invalid(
                "stride",
                format!("must be in (0, {}], got {}", sp.window_len, sp.stride),
            ));
        }
        if sp.dft_width < sp.window_len {
            return Err(SenError::invalid("dft_width", "must be >= window_len"));
        }
        if sp.padded_len < sp.window_len {
            return Err(SenError::invalid("padded_len", "must be >= window_len"));
        }
        if sp.crop_len == 0 || sp.crop_len % 2 == 0 {
            return Err(SenError::invalid("crop_len", "must be a positive odd number"));
        }
        if sp.crop_len > sp.padded_len || sp.crop_len > sp.dft_width {
            return Err(SenError::invalid(
                "crop_len",
                "must not exceed padded_len or dft_width",
            ));
        }
        if sp.feature_len != sp.crop_len {
            return Err(SenError::invalid("feature_len", "must equal crop_len"));
        }

        let syn = &self.synthesis;
        if syn.max_freq_components == 0 {
            return Err(SenError::invalid("max_freq_components", "must be >= 1"));
        }
        if syn.max_freq_components - 1 > sp.feature_len {
            return Err(SenError::invalid(
                "max_freq_components",
                "more carriers than feature bins",
            ));
        }
        if !syn.awgn_amp.is_finite() || syn.awgn_amp < 0.0 {
            return Err(SenError::invalid("awgn_amp", "must be finite and >= 0"));
        }

        self.training.validate()
    }
}

impl TrainingConfig {
    /// Check the loop parameters the trainer divides by or iterates over
    pub fn validate(&self) -> SenResult<()> {
        if self.batch_size == 0 || self.valid_batch_size == 0 {
            return Err(SenError::invalid("batch_size", "must be > 0"));
        }
        if self.checkpoint_interval == 0 {
            return Err(SenError::invalid("checkpoint_interval", "must be > 0"));
        }
        if self.log_interval == 0 {
            return Err(SenError::invalid("log_interval", "must be > 0"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SenError::invalid("learning_rate", "must be finite and > 0"));
        }
        // An empty range (begin == end + 1) is allowed
        if self.begin_epoch.saturating_sub(1) > self.end_epoch {
            return Err(SenError::invalid(
                "begin_epoch",
                format!("{} is past end_epoch {}", self.begin_epoch, self.end_epoch),
            ));
        }
        Ok(())
    }
}
