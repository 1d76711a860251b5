//! Bichannel encoding between complex arrays and real tensors
//!
//! A complex array of shape [.., H] becomes a float32 tensor of shape
//! [.., 2, H] where index 0 of axis -2 holds the real parts and index 1 the
//! imaginary parts. [`ComplexLinear`](super::linear::ComplexLinear) relies on
//! this order.

use candle_core::{DType, Device, Tensor};
use ndarray::{ArrayD, ArrayView, Dimension, IxDyn};
use num_complex::Complex64;

use crate::error::{SenError, SenResult};

/// Encode a complex array [.., H] as a real tensor [.., 2, H]
pub fn complex_to_bichannel<D: Dimension>(
    x: ArrayView<Complex64, D>,
    device: &Device,
) -> SenResult<Tensor> {
    let shape = x.shape();
    let Some((&h, lead)) = shape.split_last() else {
        return Err(SenError::Shape {
            expected: "[.., H]".into(),
            actual: Vec::new(),
        });
    };

    let mut dims = lead.to_vec();
    dims.extend_from_slice(&[2, h]);
    if h == 0 {
        return Ok(Tensor::zeros(dims, DType::F32, device)?);
    }

    let flat: Vec<Complex64> = x.iter().copied().collect();
    let mut data = Vec::with_capacity(flat.len() * 2);
    for row in flat.chunks(h) {
        data.extend(row.iter().map(|c| c.re as f32));
        data.extend(row.iter().map(|c| c.im as f32));
    }

    Ok(Tensor::from_vec(data, dims, device)?)
}

/// Decode a real tensor [.., 2, H] back into a complex array [.., H]
pub fn bichannel_to_complex(x: &Tensor) -> SenResult<ArrayD<Complex64>> {
    let dims = x.dims().to_vec();
    let rank = dims.len();
    if rank < 2 || dims[rank - 2] != 2 {
        return Err(SenError::Shape {
            expected: "[.., 2, H]".into(),
            actual: dims,
        });
    }

    let h = dims[rank - 1];
    let mut out_shape = dims[..rank - 2].to_vec();
    out_shape.push(h);

    let values = x
        .to_device(&Device::Cpu)?
        .to_dtype(DType::F32)?
        .flatten_all()?
        .to_vec1::<f32>()?;

    let mut complex = Vec::with_capacity(values.len() / 2);
    if h > 0 {
        for pair in values.chunks(2 * h) {
            let (re, im) = pair.split_at(h);
            complex.extend(
                re.iter()
                    .zip(im.iter())
                    .map(|(&r, &i)| Complex64::new(f64::from(r), f64::from(i))),
            );
        }
    }

    ArrayD::from_shape_vec(IxDyn(&out_shape), complex).map_err(|_| SenError::Shape {
        expected: format!("{out_shape:?}"),
        actual: x.dims().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn test_encode_layout() {
        let x = Array2::from_shape_vec(
            (2, 3),
            vec![
                Complex64::new(1.0, -1.0),
                Complex64::new(2.0, -2.0),
                Complex64::new(3.0, -3.0),
                Complex64::new(4.0, 0.5),
                Complex64::new(5.0, 0.25),
                Complex64::new(6.0, 0.0),
            ],
        )
        .unwrap();

        let t = complex_to_bichannel(x.view(), &Device::Cpu).unwrap();
        assert_eq!(t.dims(), &[2, 2, 3]);

        let v = t.to_vec3::<f32>().unwrap();
        assert_eq!(v[0][0], vec![1.0, 2.0, 3.0]);
        assert_eq!(v[0][1], vec![-1.0, -2.0, -3.0]);
        assert_eq!(v[1][0], vec![4.0, 5.0, 6.0]);
        assert_eq!(v[1][1], vec![0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_roundtrip_within_f32() {
        let x = Array3::from_shape_fn((3, 4, 5), |(a, b, c)| {
            Complex64::new(0.1 * a as f64 - 0.37 * b as f64, (c as f64).sin())
        });

        let t = complex_to_bichannel(x.view(), &Device::Cpu).unwrap();
        assert_eq!(t.dims(), &[3, 4, 2, 5]);

        let back = bichannel_to_complex(&t).unwrap();
        assert_eq!(back.shape(), x.shape());
        for (a, b) in back.iter().zip(x.iter()) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn test_decode_rejects_bad_shape() {
        let t = Tensor::zeros((4, 3, 5), DType::F32, &Device::Cpu).unwrap();
        assert!(matches!(bichannel_to_complex(&t), Err(SenError::Shape { .. })));
    }
}
