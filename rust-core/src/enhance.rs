//! Spectrogram enhancement (inference path)
//!
//! CSI [time, channel] -> normalized spectrogram `x_tilde` [channel, C, frame]
//! -> network on [channel, frame, 2, C] -> enhanced spectrogram `y`
//! [channel, C, frame].

use candle_core::Module;
use ndarray::{Array3, ArrayView2, ArrayView3, Ix3};
use num_complex::Complex64;
use tracing::info;

use crate::config::SpectralConfig;
use crate::error::{SenError, SenResult};
use crate::model::encoding::{bichannel_to_complex, complex_to_bichannel};
use crate::model::SpectrumEnhancer;
use crate::spectrum::{Spectrogram, SpectrogramAnalyzer};

/// Raw and enhanced spectrograms of one capture
#[derive(Debug, Clone)]
pub struct Enhancement {
    /// Normalized spectrogram before correction
    pub x_tilde: Spectrogram,
    /// Network output, same layout as `x_tilde.data`
    pub y: Array3<Complex64>,
}

/// Runs the analyzer and the trained network
pub struct Enhancer {
    analyzer: SpectrogramAnalyzer,
    model: SpectrumEnhancer,
}

impl Enhancer {
    pub fn new(config: &SpectralConfig, model: SpectrumEnhancer) -> SenResult<Self> {
        if model.feature_len() != config.crop_len {
            return Err(SenError::invalid(
                "feature_len",
                format!(
                    "model expects {} bins but the crop keeps {}",
                    model.feature_len(),
                    config.crop_len
                ),
            ));
        }
        Ok(Self {
            analyzer: SpectrogramAnalyzer::new(config)?,
            model,
        })
    }

    /// Enhance a CSI capture laid out [time, channel]
    pub fn enhance_csi(&mut self, csi: ArrayView2<Complex64>) -> SenResult<Enhancement> {
        self.enhance_series(csi.t())
    }

    /// Enhance a series laid out [channel, time]
    pub fn enhance_series(&mut self, signal: ArrayView2<Complex64>) -> SenResult<Enhancement> {
        let x_tilde = self.analyzer.analyze(signal)?;
        let y = self.enhance_spectrogram(x_tilde.data.view())?;
        info!(
            channels = x_tilde.num_channels(),
            frames = x_tilde.num_frames(),
            "spectrogram enhanced"
        );
        Ok(Enhancement { x_tilde, y })
    }

    /// Run the network over every frame of a [channel, C, frame] spectrogram
    pub fn enhance_spectrogram(&self, spec: ArrayView3<Complex64>) -> SenResult<Array3<Complex64>> {
        // [channel, C, frame] -> [channel, frame, C]
        let frames_last = spec.permuted_axes([0, 2, 1]);
        let input = complex_to_bichannel(frames_last, self.model.device())?;
        let output = self.model.forward(&input)?;

        let y = bichannel_to_complex(&output)?
            .into_dimensionality::<Ix3>()
            .map_err(|_| SenError::Shape {
                expected: "[channel, frame, C]".into(),
                actual: output.dims().to_vec(),
            })?;

        Ok(y.permuted_axes([0, 2, 1]).as_standard_layout().to_owned())
    }

    pub fn analyzer(&self) -> &SpectrogramAnalyzer {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use ndarray::Array2;
    use std::f64::consts::PI;

    fn small_config() -> SpectralConfig {
        SpectralConfig {
            window_len: 25,
            dft_width: 100,
            padded_len: 100,
            crop_len: 21,
            feature_len: 21,
            ..SpectralConfig::default()
        }
    }

    #[test]
    fn test_enhance_layout() {
        let config = small_config();
        let model = SpectrumEnhancer::new(21, &Device::Cpu).unwrap();
        let mut enhancer = Enhancer::new(&config, model).unwrap();

        let csi = Array2::from_shape_fn((50, 3), |(n, ch)| {
            Complex64::from_polar(1.0, 2.0 * PI * (ch as f64 * 10.0) * n as f64 / 1000.0)
        });
        let out = enhancer.enhance_csi(csi.view()).unwrap();

        assert_eq!(out.x_tilde.data.dim(), (3, 21, 50));
        assert_eq!(out.y.dim(), (3, 21, 50));
        assert!(out.y.iter().all(|c| c.re.abs() <= 1.0 && c.im.abs() <= 1.0));
    }

    #[test]
    fn test_frames_are_processed_independently() {
        let config = small_config();
        let model = SpectrumEnhancer::new(21, &Device::Cpu).unwrap();
        let enhancer = Enhancer::new(&config, model).unwrap();

        let spec = Array3::from_shape_fn((2, 21, 4), |(c, k, t)| {
            Complex64::new((c + k) as f64 / 40.0, t as f64 / 10.0)
        });
        let full = enhancer.enhance_spectrogram(spec.view()).unwrap();
        let single = enhancer
            .enhance_spectrogram(spec.slice(ndarray::s![1..2, .., 2..3]))
            .unwrap();

        for k in 0..21 {
            assert!((full[[1, k, 2]] - single[[0, k, 0]]).norm() < 1e-5);
        }
    }

    #[test]
    fn test_rejects_mismatched_model() {
        let model = SpectrumEnhancer::new(11, &Device::Cpu).unwrap();
        assert!(Enhancer::new(&small_config(), model).is_err());
    }
}
