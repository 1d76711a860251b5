//! Spectrum enhancement network
//!
//! Five complex-linear layers of width `feature_len`, each followed by tanh
//! on both encoded channels. Input and output are bichannel tensors
//! [.., 2, feature_len].

use candle_core::{DType, Device, Module, Result, Tensor};
use candle_nn::{VarBuilder, VarMap};
use std::path::Path;

use super::linear::ComplexLinear;

const LAYER_NAMES: [&str; 5] = ["fc_1", "fc_2", "fc_3", "fc_4", "fc_out"];

/// Stacked complex-linear regression network
pub struct SpectrumEnhancer {
    layers: Vec<ComplexLinear>,
    varmap: VarMap,
    feature_len: usize,
    device: Device,
}

impl SpectrumEnhancer {
    /// Build a freshly initialized network on `device`
    pub fn new(feature_len: usize, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

        let layers = LAYER_NAMES
            .iter()
            .map(|name| ComplexLinear::new(feature_len, feature_len, vb.pp(*name)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            layers,
            varmap,
            feature_len,
            device: device.clone(),
        })
    }

    /// Build a network and overwrite its weights from a checkpoint
    pub fn load<P: AsRef<Path>>(path: P, feature_len: usize, device: &Device) -> Result<Self> {
        let mut model = Self::new(feature_len, device)?;
        model.varmap.load(path)?;
        Ok(model)
    }

    /// Persist all weights to a safetensors checkpoint
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.varmap.save(path)
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }
}

impl Module for SpectrumEnhancer {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut h = xs.clone();
        for layer in &self.layers {
            h = layer.forward(&h)?.tanh()?;
        }
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_shape_and_range() -> Result<()> {
        let device = Device::Cpu;
        let model = SpectrumEnhancer::new(121, &device)?;
        assert_eq!(model.num_layers(), 5);
        // 5 layers x (weights_real, weights_imag, bias)
        assert_eq!(model.varmap().all_vars().len(), 15);

        let x = Tensor::randn(0f32, 1.0, (4, 2, 121), &device)?;
        let y = model.forward(&x)?;
        assert_eq!(y.dims(), &[4, 2, 121]);

        let values = y.flatten_all()?.to_vec1::<f32>()?;
        assert!(values.iter().all(|v| v.abs() <= 1.0));
        Ok(())
    }

    #[test]
    fn test_checkpoint_roundtrip() -> Result<()> {
        let device = Device::Cpu;
        let dir = tempfile::tempdir().map_err(candle_core::Error::wrap)?;
        let path = dir.path().join("SEN_test_E1.safetensors");

        let model = SpectrumEnhancer::new(9, &device)?;
        model.save(&path)?;

        let restored = SpectrumEnhancer::load(&path, 9, &device)?;
        let x = Tensor::randn(0f32, 1.0, (3, 2, 9), &device)?;
        let a = model.forward(&x)?.flatten_all()?.to_vec1::<f32>()?;
        let b = restored.forward(&x)?.flatten_all()?.to_vec1::<f32>()?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_load_missing_checkpoint_fails() {
        let result = SpectrumEnhancer::load("/nonexistent/SEN_E1.safetensors", 9, &Device::Cpu);
        assert!(result.is_err());
    }
}
