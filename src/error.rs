//! Error types for the neural net library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a matrix or network operation can be rejected.
///
/// Preconditions are checked before anything is mutated, so an `Err` always
/// leaves the operands exactly as they were.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid network construction (zero input dimension, empty layer, ...)
    #[error("invalid construction: {0}")]
    Construction(String),

    /// Incompatible matrix shapes, vector lengths or dataset sizes
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Randomization bounds that do not describe a finite closed interval
    #[error("invalid range [{lower}, {upper}]")]
    Range { lower: f64, upper: f64 },

    /// Learning rate that is not strictly positive
    #[error("learning rate must be > 0, got {0}")]
    Rate(f64),

    /// Unknown activation function name
    #[error("unknown activation function: {0}")]
    ActivationType(String),

    /// Malformed weight record
    #[error("invalid weight record: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Error::ShapeMismatch(msg.into())
    }
}
