//! Error types for scalematch.

use thiserror::Error;

/// Result alias for scalematch operations.
pub type Result<T> = std::result::Result<T, ScaleMatchError>;

/// Errors that can occur when building descriptor sets or running the matcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScaleMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The number of pyramid levels must be at least one.
    #[error("invalid number of levels: {n_levels}")]
    InvalidLevels { n_levels: usize },
    /// A row count is not compatible with the configured number of levels.
    #[error("{rows} descriptor rows cannot be split into {n_levels} levels")]
    LevelMismatch { rows: usize, n_levels: usize },
    /// A scoring block must have as many rows as columns.
    #[error("scoring block must be square, got {rows}x{cols}")]
    NonSquareBlock { rows: usize, cols: usize },
    /// The strategy selector does not name a known strategy.
    #[error("unknown matching strategy {0} (expected 0-6)")]
    UnknownStrategy(i64),
    /// A line of a text input could not be parsed.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    /// Reading or writing a file failed.
    #[error("i/o error: {reason}")]
    Io { reason: String },
    /// Loading or decoding an image failed.
    #[error("image i/o error: {reason}")]
    ImageIo { reason: String },
}

impl From<std::io::Error> for ScaleMatchError {
    fn from(err: std::io::Error) -> Self {
        ScaleMatchError::Io {
            reason: err.to_string(),
        }
    }
}
