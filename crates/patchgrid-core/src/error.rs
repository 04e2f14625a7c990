//! Error taxonomy shared by every operation in the crate.
//!
//! Empty outcomes for legitimately empty input (no pairs, no patches) are
//! returned as `Ok`; these variants are reserved for malformed input.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Grid dimensions disagree with the data or indices supplied.
    #[error("invalid shape: {width}x{height} grid cannot hold {len} cells")]
    InvalidShape { width: usize, height: usize, len: usize },

    /// Linear index or coordinate outside the grid.
    #[error("{what} out of range for {width}x{height} grid")]
    OutOfRange { what: String, width: usize, height: usize },

    /// Zero offset, duplicate offset or malformed weight matrix.
    #[error("invalid direction set: {0}")]
    InvalidDirectionSet(String),

    /// Unsupported logarithm base token for entropy.
    #[error("invalid log base {0:?}, expected one of \"log2\", \"ln\", \"log10\"")]
    InvalidBase(String),

    /// Negative or non-finite entry in an entropy frequency vector.
    #[error("invalid frequency {value} at position {index}")]
    InvalidFrequency { index: usize, value: f64 },

    /// Input too small for the result to be defined.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A patch operation was requested on a grid with no classified cells.
    #[error("grid contains only missing values")]
    MissingValueOnly,

    /// Cell resolution must be finite and strictly positive.
    #[error("invalid resolution ({x}, {y})")]
    InvalidResolution { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, GridError>;
