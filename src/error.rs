//! Error types for Reverie.

use thiserror::Error;

/// Reverie error types.
#[derive(Error, Debug)]
pub enum ReverieError {
    /// A numeric argument outside its valid range
    #[error("invalid {argument}: {value} (expected {constraint})")]
    Config {
        argument: &'static str,
        value: f64,
        constraint: &'static str,
    },

    /// Vector or matrix length that does not match the network size
    #[error("length mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Operation attempted before the network was ready for it
    #[error("invalid state: {0}")]
    State(String),

    /// Empty input where non-empty was required
    #[error("empty input: {0}")]
    EmptyInput(String),
}

/// Result type alias for Reverie operations.
pub type Result<T> = std::result::Result<T, ReverieError>;
