//! Error types for the tseval library.

use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur during fitting, resampling or result-file handling.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Unrecognised train/test split label.
    #[error("unknown split '{0}' - should be 'TRAIN', 'TEST' or none")]
    InvalidSplit(String),

    /// A results file has fewer lines than the three-line header requires.
    #[error("results file is truncated: need at least {needed} lines, got {got}")]
    TruncatedFile { needed: usize, got: usize },

    /// No line matching a task summary layout was found during repair.
    #[error("no valid third line found in results file")]
    NoValidThirdLine,

    /// Two results files cannot be compared because their lengths differ.
    #[error("results files have different numbers of lines: {0} vs {1}")]
    LineCountMismatch(usize, usize),

    /// Underlying file I/O failure, propagated unmodified.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
