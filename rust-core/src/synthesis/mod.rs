//! Training-data synthesis: leakage operator, sample pairs and test scenes

pub mod blur;
pub mod sampler;
pub mod chirp;

pub use blur::{BlurMatrix, BlurSpec};
pub use sampler::{SampleBatch, SampleGenerator};
