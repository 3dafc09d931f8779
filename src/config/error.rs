//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Threshold string could not be parsed as a float.
    #[error("failed to parse similarity threshold '{value}': {source}")]
    ThresholdParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Threshold is non-finite or outside `[0, 1]`.
    #[error("invalid similarity threshold {value}: must be within [0, 1]")]
    InvalidThreshold { value: f32 },

    /// Dimension string could not be parsed as an integer.
    #[error("failed to parse embedding dimension '{value}': {source}")]
    DimensionParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Embedding dimension of zero.
    #[error("invalid embedding dimension: must be greater than 0")]
    ZeroDimension,

    /// Embedding endpoint is not an http(s) URL.
    #[error("invalid embedding url '{value}': must start with http:// or https://")]
    InvalidEmbeddingUrl { value: String },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
