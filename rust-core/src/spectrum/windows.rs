//! Window functions for short-time spectral analysis
//!
//! Two families are produced:
//! - Gaussian and rectangular windows are built directly at the requested
//!   width (symmetric).
//! - Catalog windows (Hann, Hamming, Blackman, Bartlett, boxcar) are
//!   periodic (DFT-even): the symmetric window of length M+1 with the last
//!   sample dropped.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::SenError;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Gaussian window with σ = (M-1)/sqrt(8·ln 200)
    /// The window falls to 1/200 of its peak at both ends
    Gaussian,

    /// Uniform window of ones
    #[serde(alias = "rectangular")]
    Rect,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/M)
    #[serde(alias = "hanning")]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/M)
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/M) + 0.08*cos(4πn/M)
    Blackman,

    /// Triangular window reaching zero at both ends
    Bartlett,

    /// Catalog name for the rectangular window
    Boxcar,
}

impl WindowType {
    /// Catalog name of the window
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Gaussian => "gaussian",
            WindowType::Rect => "rect",
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Bartlett => "bartlett",
            WindowType::Boxcar => "boxcar",
        }
    }

    /// Standard deviation (in samples) of the Gaussian window of width `length`
    pub fn gaussian_std(length: usize) -> f64 {
        (length as f64 - 1.0) / (8.0 * 200f64.ln()).sqrt()
    }

    /// Coefficients used for spectral analysis at width `length`
    pub fn coefficients(&self, length: usize) -> Vec<f64> {
        match self {
            WindowType::Gaussian | WindowType::Rect => generate_window(*self, length),
            _ => generate_periodic_window(*self, length),
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = SenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "gauss" => Ok(WindowType::Gaussian),
            "rect" | "rectangular" => Ok(WindowType::Rect),
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            "bartlett" => Ok(WindowType::Bartlett),
            "boxcar" | "ones" => Ok(WindowType::Boxcar),
            other => Err(SenError::invalid(
                "window_type",
                format!("unknown window `{other}`"),
            )),
        }
    }
}

/// Generate symmetric window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }

    let denom = length as f64 - 1.0;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Gaussian => {
            // w[n] = exp(-(n - (M-1)/2)^2 / (2σ^2))
            let sigma = WindowType::gaussian_std(length);
            let center = denom / 2.0;
            for n in 0..length {
                let x = n as f64 - center;
                window.push((-(x * x) / (2.0 * sigma * sigma)).exp());
            }
        }

        WindowType::Hann => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / denom;
                window.push(0.5 - 0.5 * angle.cos());
            }
        }

        WindowType::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / denom;
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        WindowType::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / denom;
                let angle2 = 4.0 * PI * n as f64 / denom;
                window.push(0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos());
            }
        }

        WindowType::Bartlett => {
            for n in 0..length {
                let ramp = 2.0 * n as f64 / denom;
                window.push(if n as f64 <= denom / 2.0 { ramp } else { 2.0 - ramp });
            }
        }

        WindowType::Rect | WindowType::Boxcar => {
            window.resize(length, 1.0);
        }
    }

    window
}

/// Generate periodic (DFT-even) window coefficients
pub fn generate_periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length <= 1 {
        return generate_window(window_type, length);
    }
    let mut window = generate_window(window_type, length + 1);
    window.truncate(length);
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_window() {
        let length = 125;
        let w = generate_window(WindowType::Gaussian, length);

        assert_eq!(w.len(), length);

        // Peak at the center, symmetric
        assert!((w[62] - 1.0).abs() < 1e-12);
        for n in 0..length {
            assert!((w[n] - w[length - 1 - n]).abs() < 1e-12);
        }

        // Endpoints fall to 1/200 of the peak
        assert!((w[0] - 1.0 / 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_std() {
        let sigma = WindowType::gaussian_std(125);
        assert!((sigma - 124.0 / (8.0 * 200f64.ln()).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_catalog_windows() {
        let length = 161;

        let hann = generate_window(WindowType::Hann, length);
        let hamming = generate_window(WindowType::Hamming, length);
        let blackman = generate_window(WindowType::Blackman, length);
        let bartlett = generate_window(WindowType::Bartlett, length);

        let center = length / 2;
        for w in [&hann, &hamming, &blackman, &bartlett] {
            assert_eq!(w.len(), length);
            assert!((w[0] - w[length - 1]).abs() < 1e-10);
            assert!((w[center] - 1.0).abs() < 1e-10);
        }

        // Hamming should have non-zero endpoints (0.08)
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
        assert!(bartlett[0].abs() < 1e-12);
    }

    #[test]
    fn test_periodic_window() {
        let w = generate_periodic_window(WindowType::Hann, 8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-12);
        // Periodic Hann peaks at M/2
        assert!((w[4] - 1.0).abs() < 1e-12);
        // and is symmetric around it
        assert!((w[1] - w[7]).abs() < 1e-12);
    }

    #[test]
    fn test_rect_window() {
        let window = WindowType::Rect.coefficients(100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
        assert_eq!(WindowType::Boxcar.coefficients(100), window);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Gaussian, 1), vec![1.0]);
    }

    #[test]
    fn test_parse_window_names() {
        assert_eq!("gaussian".parse::<WindowType>().unwrap(), WindowType::Gaussian);
        assert_eq!("Hanning".parse::<WindowType>().unwrap(), WindowType::Hann);
        assert_eq!("rect".parse::<WindowType>().unwrap(), WindowType::Rect);
        assert!("kaiser".parse::<WindowType>().is_err());
        // Nonzero-endpoint triangle is not Bartlett
        assert!("triangle".parse::<WindowType>().is_err());
        assert!(serde_json::from_str::<WindowType>("\"triangle\"").is_err());
        assert_eq!(WindowType::Blackman.to_string(), "blackman");
    }
}
