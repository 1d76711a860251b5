//! End-to-end checks across analysis, synthesis, training and enhancement

use candle_core::Device;
use ndarray::{Array2, Ix3};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

use doppler_sen::cli::TrainArgs;
use doppler_sen::config::{SenConfig, SpectralConfig, SynthesisConfig, TrainingConfig};
use doppler_sen::enhance::Enhancer;
use doppler_sen::io::{read_array, write_outputs, ENHANCED_SPECTROGRAM_KEY};
use doppler_sen::model::{CheckpointDir, SpectrumEnhancer, Trainer};
use doppler_sen::spectrum::SpectrogramAnalyzer;
use doppler_sen::synthesis::chirp::{default_carriers, synthesize_scene};
use doppler_sen::synthesis::{BlurMatrix, SampleGenerator};

use clap::Parser;

fn small_spectral() -> SpectralConfig {
    SpectralConfig {
        window_len: 25,
        dft_width: 100,
        padded_len: 100,
        crop_len: 21,
        feature_len: 21,
        ..SpectralConfig::default()
    }
}

fn argmax(values: impl Iterator<Item = Complex64>) -> usize {
    values
        .enumerate()
        .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

#[test]
fn test_dc_row_peaks_at_center() {
    let blur = BlurMatrix::from_config(&SpectralConfig::default()).unwrap();
    assert_eq!(argmax(blur.view().row(60).iter().copied()), 60);
}

#[test]
fn test_centered_carrier_reproduces_dc_row() {
    let blur = BlurMatrix::from_config(&SpectralConfig::default()).unwrap();
    let mut x = Array2::<Complex64>::zeros((1, 121));
    x[[0, 60]] = Complex64::new(1.0, 0.0);

    let blurred = blur.apply(x.view()).unwrap();
    for (a, b) in blurred.row(0).iter().zip(blur.view().row(60).iter()) {
        assert!((a - b).norm() < 1e-12);
    }
}

#[test]
fn test_tone_lands_on_its_doppler_bin() {
    let mut analyzer = SpectrogramAnalyzer::new(&SpectralConfig::default()).unwrap();
    let csi = Array2::from_shape_fn((600, 2), |(n, _)| {
        Complex64::from_polar(1.0, 2.0 * PI * 30.0 * n as f64 / 1000.0)
    });

    let spec = analyzer.analyze_csi(csi.view()).unwrap();
    assert_eq!(spec.data.dim(), (2, 121, 600));
    assert_eq!(spec.non_finite, 0);

    let mid = spec.data.slice(ndarray::s![0, .., 300]);
    assert_eq!(argmax(mid.iter().copied()), 90);

    let peak = spec.data.iter().map(|c| c.norm()).fold(0.0, f64::max);
    assert!((peak - 1.0).abs() < 1e-12);
}

#[test]
fn test_silent_channel_is_reported() {
    let mut analyzer = SpectrogramAnalyzer::new(&small_spectral()).unwrap();
    let csi = Array2::<Complex64>::zeros((40, 1));

    let spec = analyzer.analyze_csi(csi.view()).unwrap();
    assert_eq!(spec.non_finite, spec.data.len());
}

#[test]
fn test_zero_iteration_training_still_validates() {
    let spectral = small_spectral();
    let blur = BlurMatrix::from_config(&spectral).unwrap();
    let sampler = SampleGenerator::new(blur, &SynthesisConfig::default()).unwrap();
    let model = SpectrumEnhancer::new(21, &Device::Cpu).unwrap();
    let training = TrainingConfig {
        iterations_per_epoch: 0,
        end_epoch: 3,
        batch_size: 4,
        valid_batch_size: 4,
        ..TrainingConfig::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let mut sink = CheckpointDir::new(dir.path(), "SEN_test");
    let mut trainer = Trainer::new(&model, sampler, training).unwrap();
    let reports = trainer
        .fit(&model, &mut StdRng::seed_from_u64(5), &mut sink)
        .unwrap();

    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.iterations == 0 && r.valid_loss.is_finite()));
}

#[test]
fn test_unsupported_device_exits_nonzero() {
    let err = TrainArgs::try_parse_from(["sen-train", "2"]).unwrap_err();
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn test_train_checkpoint_then_enhance() {
    let config = SenConfig {
        spectral: small_spectral(),
        training: TrainingConfig {
            batch_size: 8,
            valid_batch_size: 8,
            iterations_per_epoch: 2,
            end_epoch: 2,
            checkpoint_interval: 2,
            ..TrainingConfig::default()
        },
        ..SenConfig::default()
    };
    config.validate().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let blur = BlurMatrix::from_config(&config.spectral).unwrap();
    let sampler = SampleGenerator::new(blur, &config.synthesis).unwrap();
    let model = SpectrumEnhancer::new(21, &Device::Cpu).unwrap();
    let mut sink = CheckpointDir::new(dir.path(), config.model_prefix());
    let mut trainer = Trainer::new(&model, sampler, config.training.clone()).unwrap();
    trainer
        .fit(&model, &mut StdRng::seed_from_u64(11), &mut sink)
        .unwrap();

    let checkpoint = sink.path_for(2);
    assert!(checkpoint.ends_with("SEN_gaussian_W25_E2.safetensors"));

    let restored = SpectrumEnhancer::load(&checkpoint, 21, &Device::Cpu).unwrap();
    let mut enhancer = Enhancer::new(&config.spectral, restored).unwrap();
    let scene = synthesize_scene(&default_carriers(), 1000, 0.2).unwrap();
    let out = enhancer.enhance_series(scene.view()).unwrap();
    assert_eq!(out.y.dim(), (1, 21, 200));

    let original = Enhancer::new(&config.spectral, model).unwrap();
    let expected = original.enhance_spectrogram(out.x_tilde.data.view()).unwrap();
    for (a, b) in out.y.iter().zip(expected.iter()) {
        assert!((a - b).norm() < 1e-6);
    }

    let (_, enhanced_path) =
        write_outputs(dir.path(), config.spectral.window_len, &out.x_tilde.data, &out.y).unwrap();
    let y = read_array::<Ix3>(&enhanced_path, ENHANCED_SPECTROGRAM_KEY).unwrap();
    assert_eq!(y, out.y);
}
