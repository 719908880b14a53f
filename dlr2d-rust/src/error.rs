//! Error types for dlr2d-rust

use thiserror::Error;

/// Errors reported by the 2D DLR operators and their persistence layer
#[derive(Debug, Error)]
pub enum Dlr2dError {
    /// Leading axis of a coefficient or value array differs from the DLR rank
    #[error("Shape mismatch: first dimension is {actual}, expected DLR rank {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Input array has rank 0
    #[error("Input array must have at least one dimension")]
    EmptyInput,

    /// Stored format tag does not name this object type
    #[error("Format mismatch: expected '{expected}', found '{found}'")]
    FormatMismatch { expected: String, found: String },

    /// Stored format version is newer than this library understands
    #[error("Unsupported format version {found} (max supported: {max})")]
    UnsupportedVersion { found: u32, max: u32 },

    /// Reconstructed fields do not fit together
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Construction parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Exact zero pivot encountered during LU factorization
    #[error("Singular matrix: zero pivot in column {column}")]
    SingularMatrix { column: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout dlr2d-rust
pub type Result<T> = std::result::Result<T, Dlr2dError>;
