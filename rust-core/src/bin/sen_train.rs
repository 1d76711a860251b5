//! `sen-train`: fit the spectrum enhancement network on synthetic batches
//!
//! ```text
//! sen-train 0 --config sen.json --seed 7
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use doppler_sen::cli::{init_tracing, load_config, TrainArgs};
use doppler_sen::model::device::select_device;
use doppler_sen::model::{CheckpointDir, SpectrumEnhancer, Trainer};
use doppler_sen::synthesis::{BlurMatrix, SampleGenerator};

fn main() -> Result<()> {
    let args = TrainArgs::parse();
    init_tracing(&args.log_level);

    let config = load_config(args.config.as_deref()).context("loading configuration")?;
    let device = select_device(args.device)?;

    let blur = BlurMatrix::from_config(&config.spectral)?;
    info!(
        window = %config.spectral.window_type,
        window_len = config.spectral.window_len,
        crop_len = blur.len(),
        "blur matrix ready"
    );
    let sampler = SampleGenerator::new(blur, &config.synthesis)?;

    let feature_len = config.spectral.feature_len;
    let model = match &args.resume {
        Some(path) => {
            info!(path = %path.display(), "resuming from checkpoint");
            SpectrumEnhancer::load(path, feature_len, &device)
                .with_context(|| format!("loading checkpoint {}", path.display()))?
        }
        None => SpectrumEnhancer::new(feature_len, &device)?,
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut sink = CheckpointDir::new(&config.training.checkpoint_dir, config.model_prefix());
    let mut trainer = Trainer::new(&model, sampler, config.training.clone())?;
    let reports = trainer.fit(&model, &mut rng, &mut sink)?;

    if let Some(last) = reports.last() {
        info!(
            epochs = reports.len(),
            valid_loss = last.valid_loss,
            dir = %sink.dir().display(),
            "training finished"
        );
    }
    Ok(())
}
