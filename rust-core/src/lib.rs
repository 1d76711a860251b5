//! Doppler SEN - Spectrogram Enhancement Network Core
//!
//! Deblurs CSI Doppler spectrograms: windowed STFT, crop/unwrap/normalize,
//! spectral leakage synthesis and a complex-valued correction network.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod config;
pub mod spectrum;
pub mod synthesis;
pub mod model;
pub mod enhance;
pub mod io;
pub mod cli;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{SenError, SenResult};
pub use config::SenConfig;
pub use spectrum::{SpectrogramAnalyzer, WindowType};
pub use synthesis::{BlurMatrix, SampleGenerator};
pub use model::SpectrumEnhancer;
pub use enhance::Enhancer;
