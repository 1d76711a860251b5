//! Training loop
//!
//! For every epoch in `begin_epoch..=end_epoch`:
//! 1. `iterations_per_epoch` optimizer steps, each on a freshly synthesized
//!    batch of (clean, noisy) pairs
//! 2. one validation batch, loss logged
//! 3. a checkpoint whenever `epoch % checkpoint_interval == 0`
//!
//! There is no early stopping, scheduling or clipping.

use candle_core::{Device, Module, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::encoding::complex_to_bichannel;
use super::loss::amplitude_mse;
use super::network::SpectrumEnhancer;
use crate::config::TrainingConfig;
use crate::error::{SenError, SenResult};
use crate::synthesis::SampleGenerator;

/// Destination for periodic model checkpoints
pub trait CheckpointSink {
    fn save(&mut self, model: &SpectrumEnhancer, epoch: usize) -> SenResult<()>;
}

/// Writes `<dir>/<prefix>_E<epoch>.safetensors`
#[derive(Debug, Clone)]
pub struct CheckpointDir {
    dir: PathBuf,
    prefix: String,
}

impl CheckpointDir {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Checkpoint path for `epoch`
    pub fn path_for(&self, epoch: usize) -> PathBuf {
        checkpoint_path(&self.dir, &self.prefix, epoch)
    }
}

/// `<dir>/<prefix>_E<epoch>.safetensors`
pub fn checkpoint_path(dir: &Path, prefix: &str, epoch: usize) -> PathBuf {
    dir.join(format!("{prefix}_E{epoch}.safetensors"))
}

impl CheckpointSink for CheckpointDir {
    fn save(&mut self, model: &SpectrumEnhancer, epoch: usize) -> SenResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SenError::io(&self.dir, e))?;
        let path = self.path_for(epoch);
        model.save(&path)?;
        info!(epoch, path = %path.display(), "checkpoint saved");
        Ok(())
    }
}

/// Summary of one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub iterations: usize,
    /// Sum of the training losses of every iteration
    pub train_loss_total: f32,
    /// Mean training loss; `None` when the epoch ran no iterations
    pub train_loss_mean: Option<f32>,
    pub valid_loss: f32,
    pub checkpointed: bool,
}

/// Drives the optimizer over synthetic batches
pub struct Trainer {
    config: TrainingConfig,
    sampler: SampleGenerator,
    optimizer: AdamW,
}

impl Trainer {
    /// Create a trainer optimizing every variable of `model`
    pub fn new(
        model: &SpectrumEnhancer,
        sampler: SampleGenerator,
        config: TrainingConfig,
    ) -> SenResult<Self> {
        config.validate()?;
        if sampler.feature_len() != model.feature_len() {
            return Err(SenError::invalid(
                "feature_len",
                format!(
                    "sampler produces {} bins but the model expects {}",
                    sampler.feature_len(),
                    model.feature_len()
                ),
            ));
        }

        let params = ParamsAdamW {
            lr: config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let optimizer = AdamW::new(model.varmap().all_vars(), params)?;

        Ok(Self {
            config,
            sampler,
            optimizer,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Synthesize a batch and encode it as (clean, noisy) bichannel tensors
    fn encoded_batch<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_batch: usize,
        device: &Device,
    ) -> SenResult<(Tensor, Tensor)> {
        let batch = self.sampler.generate(rng, n_batch)?;
        let clean = complex_to_bichannel(batch.clean.view(), device)?;
        let noisy = complex_to_bichannel(batch.noisy.view(), device)?;
        Ok((clean, noisy))
    }

    /// One optimizer step on a fresh batch; returns the batch loss
    pub fn train_step<R: Rng + ?Sized>(
        &mut self,
        model: &SpectrumEnhancer,
        rng: &mut R,
    ) -> SenResult<f32> {
        let (clean, noisy) = self.encoded_batch(rng, self.config.batch_size, model.device())?;
        let prediction = model.forward(&noisy)?;
        let loss = amplitude_mse(&prediction, &clean)?;
        self.optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// Loss on a fresh validation batch, without updating weights
    pub fn validate<R: Rng + ?Sized>(
        &self,
        model: &SpectrumEnhancer,
        rng: &mut R,
    ) -> SenResult<f32> {
        let (clean, noisy) =
            self.encoded_batch(rng, self.config.valid_batch_size, model.device())?;
        let prediction = model.forward(&noisy)?.detach();
        Ok(amplitude_mse(&prediction, &clean)?.to_scalar::<f32>()?)
    }

    /// Train one epoch and validate it
    pub fn run_epoch<R: Rng + ?Sized>(
        &mut self,
        model: &SpectrumEnhancer,
        rng: &mut R,
        epoch: usize,
    ) -> SenResult<EpochReport> {
        let iterations = self.config.iterations_per_epoch;
        let mut total = 0.0f32;

        for itr in 0..iterations {
            let loss = self.train_step(model, rng)?;
            total += loss;

            if itr % self.config.log_interval == 0 {
                debug!(
                    epoch,
                    end_epoch = self.config.end_epoch,
                    itr = itr + 1,
                    iterations,
                    loss = loss / self.config.batch_size as f32,
                    "training"
                );
            }
        }

        let valid_loss = self.validate(model, rng)?;
        let spec = self.sampler.blur().spec();
        info!(
            epoch,
            end_epoch = self.config.end_epoch,
            valid_loss,
            window = %spec.window_type,
            window_len = spec.window_len,
            "epoch finished"
        );

        Ok(EpochReport {
            epoch,
            iterations,
            train_loss_total: total,
            train_loss_mean: (iterations > 0).then(|| total / iterations as f32),
            valid_loss,
            checkpointed: false,
        })
    }

    /// Run every configured epoch, checkpointing at the configured interval
    pub fn fit<R: Rng + ?Sized, S: CheckpointSink + ?Sized>(
        &mut self,
        model: &SpectrumEnhancer,
        rng: &mut R,
        sink: &mut S,
    ) -> SenResult<Vec<EpochReport>> {
        let mut reports = Vec::new();
        for epoch in self.config.begin_epoch..=self.config.end_epoch {
            let mut report = self.run_epoch(model, rng, epoch)?;
            if epoch % self.config.checkpoint_interval == 0 {
                sink.save(model, epoch)?;
                report.checkpointed = true;
            }
            reports.push(report);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpectralConfig, SynthesisConfig};
    use crate::synthesis::BlurMatrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingSink {
        epochs: Vec<usize>,
    }

    impl CheckpointSink for RecordingSink {
        fn save(&mut self, _model: &SpectrumEnhancer, epoch: usize) -> SenResult<()> {
            self.epochs.push(epoch);
            Ok(())
        }
    }

    fn small_setup(training: TrainingConfig) -> (SpectrumEnhancer, Trainer) {
        let spectral = SpectralConfig {
            window_len: 25,
            padded_len: 100,
            dft_width: 100,
            crop_len: 21,
            feature_len: 21,
            ..SpectralConfig::default()
        };
        let blur = BlurMatrix::from_config(&spectral).unwrap();
        let sampler = SampleGenerator::new(blur, &SynthesisConfig::default()).unwrap();
        let model = SpectrumEnhancer::new(21, &Device::Cpu).unwrap();
        let trainer = Trainer::new(&model, sampler, training).unwrap();
        (model, trainer)
    }

    fn training(iterations: usize, end_epoch: usize, interval: usize) -> TrainingConfig {
        TrainingConfig {
            batch_size: 8,
            valid_batch_size: 8,
            iterations_per_epoch: iterations,
            begin_epoch: 1,
            end_epoch,
            checkpoint_interval: interval,
            learning_rate: 0.01,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_checkpoint_schedule() {
        let (model, mut trainer) = small_setup(training(1, 6, 3));
        let mut rng = StdRng::seed_from_u64(0);
        let mut sink = RecordingSink::default();

        let reports = trainer.fit(&model, &mut rng, &mut sink).unwrap();

        assert_eq!(reports.len(), 6);
        assert_eq!(sink.epochs, vec![3, 6]);
        assert!(reports[2].checkpointed && !reports[3].checkpointed);
        assert!(reports.iter().all(|r| r.valid_loss.is_finite()));
    }

    #[test]
    fn test_zero_iterations_per_epoch() {
        let (model, mut trainer) = small_setup(training(0, 2, 500));
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink = RecordingSink::default();

        let before = model.varmap().all_vars()[0].flatten_all().unwrap().to_vec1::<f32>().unwrap();
        let reports = trainer.fit(&model, &mut rng, &mut sink).unwrap();
        let after = model.varmap().all_vars()[0].flatten_all().unwrap().to_vec1::<f32>().unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.train_loss_mean.is_none()));
        assert!(reports.iter().all(|r| r.valid_loss.is_finite()));
        assert_eq!(before, after);
        assert!(sink.epochs.is_empty());
    }

    #[test]
    fn test_training_reduces_loss() {
        let (model, mut trainer) = small_setup(training(1, 1, 500));
        let mut eval_rng = StdRng::seed_from_u64(99);
        let initial = trainer.validate(&model, &mut eval_rng).unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            trainer.train_step(&model, &mut rng).unwrap();
        }

        let mut eval_rng = StdRng::seed_from_u64(99);
        let trained = trainer.validate(&model, &mut eval_rng).unwrap();
        assert!(trained < initial, "loss {trained} did not drop below {initial}");
    }

    #[test]
    fn test_checkpoint_dir_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let model = SpectrumEnhancer::new(5, &Device::Cpu).unwrap();
        let mut sink = CheckpointDir::new(dir.path().join("results"), "SEN_gaussian_W125");

        sink.save(&model, 500).unwrap();

        let expected = dir.path().join("results").join("SEN_gaussian_W125_E500.safetensors");
        assert_eq!(sink.path_for(500), expected);
        assert!(expected.exists());
    }

    #[test]
    fn test_rejects_zero_intervals() {
        let spectral = SpectralConfig {
            window_len: 25,
            padded_len: 100,
            dft_width: 100,
            crop_len: 21,
            feature_len: 21,
            ..SpectralConfig::default()
        };
        let model = SpectrumEnhancer::new(21, &Device::Cpu).unwrap();

        for (name, config) in [
            ("log_interval", TrainingConfig { log_interval: 0, ..training(1, 2, 1) }),
            ("checkpoint_interval", training(1, 2, 0)),
        ] {
            let blur = BlurMatrix::from_config(&spectral).unwrap();
            let sampler = SampleGenerator::new(blur, &SynthesisConfig::default()).unwrap();
            match Trainer::new(&model, sampler, config) {
                Err(SenError::InvalidParameter { name: got, .. }) => assert_eq!(got, name),
                Err(e) => panic!("unexpected error for {name}: {e}"),
                Ok(_) => panic!("{name} = 0 was accepted"),
            }
        }
    }

    #[test]
    fn test_feature_len_mismatch() {
        let spectral = SpectralConfig::default();
        let blur = BlurMatrix::from_config(&spectral).unwrap();
        let sampler = SampleGenerator::new(blur, &SynthesisConfig::default()).unwrap();
        let model = SpectrumEnhancer::new(11, &Device::Cpu).unwrap();
        assert!(Trainer::new(&model, sampler, TrainingConfig::default()).is_err());
    }
}
