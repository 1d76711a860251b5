//! Synthetic Doppler scene for exercising the enhancer without CSI captures
//!
//! Two carriers whose instantaneous frequencies swing sinusoidally between
//! ±30 Hz at slowly accelerating rates, similar to a limb moving back and
//! forth in front of a link.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{SenError, SenResult};

/// A frequency-modulated component of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingCarrier {
    /// Amplitude of the carrier
    pub amplitude: f64,
    /// Peak Doppler excursion in Hz
    pub peak_hz: f64,
    /// Swing rate at the start of the scene in Hz
    pub rate_start_hz: f64,
    /// Swing rate at the end of the scene in Hz
    pub rate_end_hz: f64,
}

impl SwingCarrier {
    /// Instantaneous frequency of every sample
    fn instantaneous_hz(&self, n_samples: usize, sample_rate: f64) -> Vec<f64> {
        let dt = 1.0 / sample_rate;
        let step = if n_samples > 1 {
            (self.rate_end_hz - self.rate_start_hz) / (n_samples - 1) as f64
        } else {
            0.0
        };

        let mut cycles = 0.0;
        (0..n_samples)
            .map(|n| {
                cycles += self.rate_start_hz + step * n as f64;
                self.peak_hz * (2.0 * PI * cycles * dt).sin()
            })
            .collect()
    }

    /// Complex samples of the carrier (phase is the running sum of frequency)
    pub fn samples(&self, n_samples: usize, sample_rate: f64) -> Vec<Complex64> {
        let dt = 1.0 / sample_rate;
        let mut phase = 0.0;
        self.instantaneous_hz(n_samples, sample_rate)
            .into_iter()
            .map(|f| {
                phase += 2.0 * PI * f * dt;
                Complex64::from_polar(self.amplitude, phase)
            })
            .collect()
    }
}

/// The default two-carrier scene
pub fn default_carriers() -> [SwingCarrier; 2] {
    [
        SwingCarrier {
            amplitude: 2.0,
            peak_hz: 30.0,
            rate_start_hz: 0.25,
            rate_end_hz: 1.0,
        },
        SwingCarrier {
            amplitude: 2.0,
            peak_hz: 30.0,
            rate_start_hz: 0.25,
            rate_end_hz: 0.75,
        },
    ]
}

/// Synthesize a single-channel scene of `duration_s` seconds
///
/// # Returns
/// Samples laid out [channel = 1, time]
pub fn synthesize_scene(
    carriers: &[SwingCarrier],
    sample_rate: u32,
    duration_s: f64,
) -> SenResult<Array2<Complex64>> {
    if sample_rate == 0 {
        return Err(SenError::invalid("sample_rate", "must be > 0"));
    }
    if !(duration_s.is_finite() && duration_s > 0.0) {
        return Err(SenError::invalid("duration_s", "must be finite and > 0"));
    }

    let fs = f64::from(sample_rate);
    let n_samples = (duration_s * fs).round() as usize;
    let mut scene = Array2::<Complex64>::zeros((1, n_samples));

    for carrier in carriers {
        for (dst, s) in scene.row_mut(0).iter_mut().zip(carrier.samples(n_samples, fs)) {
            *dst += s;
        }
    }

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_shape_and_bound() {
        let scene = synthesize_scene(&default_carriers(), 1000, 4.0).unwrap();
        assert_eq!(scene.dim(), (1, 4000));
        assert!(scene.iter().all(|c| c.norm() <= 4.0 + 1e-9));
        // Both carriers start in phase
        assert!((scene[[0, 0]].norm() - 4.0).abs() < 0.1);
    }

    #[test]
    fn test_instantaneous_frequency_bounded() {
        let carrier = default_carriers()[0];
        let freqs = carrier.instantaneous_hz(4000, 1000.0);
        assert!(freqs.iter().all(|f| f.abs() <= 30.0 + 1e-9));
        assert!(freqs.iter().any(|f| *f > 25.0));
    }

    #[test]
    fn test_invalid_scene() {
        assert!(synthesize_scene(&default_carriers(), 0, 1.0).is_err());
        assert!(synthesize_scene(&default_carriers(), 1000, 0.0).is_err());
    }
}
