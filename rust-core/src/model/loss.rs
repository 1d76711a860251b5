//! Amplitude reconstruction loss
//!
//! Training supervises magnitudes only: both tensors are reduced along the
//! real/imaginary axis to |z| and compared with mean-squared error.

use candle_core::{Result, Tensor, D};

/// Keeps the square root differentiable where both components are zero
const MAGNITUDE_EPS: f64 = 1e-12;

/// Magnitude along the bichannel axis: [.., 2, H] -> [.., H]
pub fn magnitude(x: &Tensor) -> Result<Tensor> {
    x.sqr()?.sum(D::Minus2)?.affine(1.0, MAGNITUDE_EPS)?.sqrt()
}

/// Mean-squared error between the magnitudes of `prediction` and `target`
pub fn amplitude_mse(prediction: &Tensor, target: &Tensor) -> Result<Tensor> {
    candle_nn::loss::mse(&magnitude(prediction)?, &magnitude(target)?)
}
