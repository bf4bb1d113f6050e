//! Tween error types

use thiserror::Error;

/// Errors surfaced by easing-name dispatch and tween construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// Easing name not present in the easing table
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// Duration must be finite and greater than zero
    #[error("Invalid duration: {0} ms")]
    InvalidDuration(f64),
}

/// Result type for tween operations
pub type Result<T> = std::result::Result<T, TweenError>;
