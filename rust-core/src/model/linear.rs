//! Complex-valued affine layer over bichannel tensors
//!
//! With input a + ib encoded as [.., 2, H_in] and weights Wr + iWi:
//!
//! ```text
//! h1 = x · Wr              = [a·Wr,  b·Wr]
//! h2 = x · Wi              = [a·Wi,  b·Wi]
//! swap(h2)                 = [-b·Wi, a·Wi]
//! h1 + swap(h2) + bias     = [a·Wr - b·Wi, b·Wr + a·Wi] + bias
//! ```

use candle_core::{Module, Result, Tensor, D};
use candle_nn::{Init, VarBuilder};

/// Complex linear layer with independent real and imaginary weights
#[derive(Debug, Clone)]
pub struct ComplexLinear {
    weights_real: Tensor,
    weights_imag: Tensor,
    /// [2, H_out]: real bias row, imaginary bias row
    bias: Tensor,
    size_in: usize,
    size_out: usize,
}

impl ComplexLinear {
    /// Create a layer with Xavier-uniform weights and zero bias
    pub fn new(size_in: usize, size_out: usize, vb: VarBuilder) -> Result<Self> {
        let bound = (6.0 / (size_in + size_out) as f64).sqrt();
        let xavier = Init::Uniform {
            lo: -bound,
            up: bound,
        };

        let weights_real = vb.get_with_hints((size_in, size_out), "weights_real", xavier)?;
        let weights_imag = vb.get_with_hints((size_in, size_out), "weights_imag", xavier)?;
        let bias = vb.get_with_hints((2, size_out), "bias", Init::Const(0.0))?;

        Ok(Self {
            weights_real,
            weights_imag,
            bias,
            size_in,
            size_out,
        })
    }

    pub fn size_in(&self) -> usize {
        self.size_in
    }

    pub fn size_out(&self) -> usize {
        self.size_out
    }
}

/// Map [real, imag] along axis -2 to [-imag, real]
pub fn swap_real_imag(x: &Tensor) -> Result<Tensor> {
    let real = x.narrow(D::Minus2, 0, 1)?;
    let imag = x.narrow(D::Minus2, 1, 1)?;
    Tensor::cat(&[&imag.neg()?, &real], D::Minus2)
}

impl Module for ComplexLinear {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let h1 = xs.broadcast_matmul(&self.weights_real)?;
        let h2 = xs.broadcast_matmul(&self.weights_imag)?;
        let h2 = swap_real_imag(&h2)?;
        (h1 + h2)?.broadcast_add(&self.bias)
    }
}
