//! Command-line arguments of the `sen-train` and `sen-enhance` binaries
//!
//! Both take a single required positional argument selecting the
//! accelerator: the literal `0` or `1`. Anything else (or nothing) makes
//! clap print the usage and exit with a non-zero status before any model is
//! built.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::SenConfig;
use crate::error::SenResult;
use crate::model::device::parse_device_index;

/// Train the spectrum enhancement network on synthetic data
#[derive(Parser, Debug)]
#[command(name = "sen-train", version, long_about = None)]
pub struct TrainArgs {
    /// Accelerator to use (0 or 1)
    #[arg(value_name = "GPU", value_parser = parse_device_index)]
    pub device: usize,

    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Checkpoint to load before training starts
    #[arg(long, value_name = "FILE")]
    pub resume: Option<PathBuf>,

    /// Seed for the sample synthesizer (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Enhance a CSI capture with a trained network
#[derive(Parser, Debug)]
#[command(name = "sen-enhance", version, long_about = None)]
pub struct EnhanceArgs {
    /// Accelerator to use (0 or 1)
    #[arg(value_name = "GPU", value_parser = parse_device_index)]
    pub device: usize,

    /// Trained checkpoint (defaults to `<checkpoint_dir>/<prefix>_E2500.safetensors`)
    #[arg(long, value_name = "FILE")]
    pub checkpoint: Option<PathBuf>,

    /// `.npz` capture holding a complex `csi_mat` [time, channel]
    #[arg(long, value_name = "FILE", conflicts_with = "synthetic")]
    pub input: Option<PathBuf>,

    /// Enhance the built-in synthetic Doppler scene instead of a capture
    #[arg(long, default_value_t = false)]
    pub synthetic: bool,

    /// Directory for the `x_tilde` and `y` output files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Epoch of the checkpoint `sen-enhance` loads by default
pub const DEFAULT_ENHANCE_EPOCH: usize = 2500;

/// Install the global `tracing` subscriber at `level`
pub fn init_tracing(level: &str) {
    let filter = level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .init();
}

/// Load `path` when given, otherwise the validated defaults
pub fn load_config(path: Option<&Path>) -> SenResult<SenConfig> {
    match path {
        Some(path) => SenConfig::from_json(path),
        None => {
            let config = SenConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
