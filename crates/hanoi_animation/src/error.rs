//! Error types for hanoi_animation

use thiserror::Error;

/// Errors raised by the easing table and the animator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// No easing curve is registered under this name
    #[error("unknown easing curve: {0:?}")]
    UnknownEasing(String),

    /// Durations must be finite and strictly positive
    #[error("invalid animation duration: {0}")]
    InvalidDuration(f64),

    /// Start and change values must be finite
    #[error("invalid animation value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Result type for hanoi_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
