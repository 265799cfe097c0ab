//! Error types for lintrans operations.

use thiserror::Error;

/// Errors that can occur while building or drawing a transformation picture.
///
/// Degenerate geometry (zero image vectors, singular matrices, axis-aligned
/// images) is never an error; it is handled by explicit branches.
#[derive(Debug, Error)]
pub enum VisualError {
    /// The matrix is not 2×2.
    #[error("expected a 2x2 matrix, got {rows} row(s) with {cols} column(s)")]
    InvalidMatrixShape {
        /// Number of rows supplied.
        rows: usize,
        /// Number of entries in the first offending row (or total entries for flat input).
        cols: usize,
    },

    /// At least one matrix entry is NaN or infinite.
    #[error("matrix entries must be finite")]
    NonFiniteMatrix,

    /// The view half-size is not a positive finite number.
    #[error("view half-size must be positive and finite, got {0}")]
    InvalidViewSize(f64),

    /// A token could not be read as a number.
    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    /// A vector could not be read from its textual form.
    #[error("invalid vector: {0}")]
    InvalidVector(String),

    /// The operation needs a fitted session.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Writing rendered output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
