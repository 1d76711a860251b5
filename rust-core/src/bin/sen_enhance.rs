//! `sen-enhance`: run a trained network over a CSI capture
//!
//! Writes `SEN_test_x_tilde_complex_W<W>.npz` and `SEN_test_y_complex_W<W>.npz`
//! to the output directory.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use doppler_sen::cli::{init_tracing, load_config, EnhanceArgs, DEFAULT_ENHANCE_EPOCH};
use doppler_sen::enhance::Enhancer;
use doppler_sen::io::{read_csi, write_outputs};
use doppler_sen::model::device::select_device;
use doppler_sen::model::trainer::checkpoint_path;
use doppler_sen::model::SpectrumEnhancer;
use doppler_sen::synthesis::chirp::{default_carriers, synthesize_scene};

/// Length of the built-in synthetic scene
const SYNTHETIC_DURATION_S: f64 = 4.0;

fn main() -> Result<()> {
    let args = EnhanceArgs::parse();
    init_tracing(&args.log_level);

    let config = load_config(args.config.as_deref()).context("loading configuration")?;
    let device = select_device(args.device)?;

    let checkpoint = args.checkpoint.clone().unwrap_or_else(|| {
        checkpoint_path(
            &config.training.checkpoint_dir,
            &config.model_prefix(),
            DEFAULT_ENHANCE_EPOCH,
        )
    });
    let model = SpectrumEnhancer::load(&checkpoint, config.spectral.feature_len, &device)
        .with_context(|| format!("loading checkpoint {}", checkpoint.display()))?;
    info!(path = %checkpoint.display(), "checkpoint loaded");

    let mut enhancer = Enhancer::new(&config.spectral, model)?;

    let enhancement = match (&args.input, args.synthetic) {
        (Some(path), _) => {
            let csi = read_csi(path)?;
            info!(path = %path.display(), shape = ?csi.dim(), "capture loaded");
            enhancer.enhance_csi(csi.view())?
        }
        (None, true) => {
            let scene = synthesize_scene(
                &default_carriers(),
                config.spectral.sample_rate,
                SYNTHETIC_DURATION_S,
            )?;
            enhancer.enhance_series(scene.view())?
        }
        (None, false) => bail!("either --input <FILE> or --synthetic is required"),
    };

    let (raw_path, enhanced_path) = write_outputs(
        &args.output_dir,
        config.spectral.window_len,
        &enhancement.x_tilde.data,
        &enhancement.y,
    )?;
    info!(
        x_tilde = %raw_path.display(),
        y = %enhanced_path.display(),
        "outputs written"
    );
    Ok(())
}
