//! Complex-valued correction network, its loss and its training loop

pub mod encoding;
pub mod linear;
pub mod network;
pub mod loss;
pub mod device;
pub mod trainer;

pub use linear::ComplexLinear;
pub use network::SpectrumEnhancer;
pub use trainer::{CheckpointDir, CheckpointSink, EpochReport, Trainer};
