//! Error types for the spectral pipeline and the model
//!
//! Numerical degeneracy (a zero or non-finite normalization peak) is not an
//! error: it is reported through `tracing::warn!` and the non-finite values
//! are propagated to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Convenient `Result` alias used across the crate
pub type SenResult<T> = Result<T, SenError>;

#[derive(Error, Debug)]
pub enum SenError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Device {index} is not available: {source}")]
    Device {
        index: usize,
        #[source]
        source: candle_core::Error,
    },

    #[error("Unexpected array shape: expected {expected}, found {actual:?}")]
    Shape { expected: String, actual: Vec<usize> },

    #[error("Failed to read `{key}` from {path}: {source}")]
    ReadData {
        path: PathBuf,
        key: String,
        #[source]
        source: ndarray_npy::ReadNpzError,
    },

    #[error("Failed to write `{key}` to {path}: {source}")]
    WriteData {
        path: PathBuf,
        key: String,
        #[source]
        source: ndarray_npy::WriteNpzError,
    },

    #[error("Failed to parse configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tensor(#[from] candle_core::Error),
}

impl SenError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SenError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SenError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = SenError::invalid("stride", "must be in (0, window width]");
        let msg = err.to_string();
        assert!(msg.contains("stride"));
        assert!(msg.contains("window width"));
    }
}
