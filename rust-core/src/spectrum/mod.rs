//! Spectral analysis: windows, FFT, STFT and crop/unwrap/normalize

pub mod windows;
pub mod windowing;
pub mod fft;
pub mod stft;
pub mod crop;
pub mod analysis;

pub use windows::{WindowType, generate_window};
pub use fft::FftEngine;
pub use stft::{Stft, StftConfig, StftOutput};
pub use crop::{Crop, normalize_per_channel};
pub use analysis::{Spectrogram, SpectrogramAnalyzer};
