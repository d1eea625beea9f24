//! Element engine error types

use thiserror::Error;
use velum_core::ElementId;

/// Errors raised while drawing an element
#[derive(Error, Debug)]
pub enum RenderError {
    /// The element's draw logic failed
    #[error("draw failed: {0}")]
    Draw(String),

    /// No element with this id lives on the stage
    #[error("element {0:?} not found")]
    UnknownElement(ElementId),

    /// Draw code left the transform stack at a different depth than it found it
    #[error("transform stack unbalanced: depth {before} before render, {after} after")]
    UnbalancedStack { before: usize, after: usize },
}

/// Errors raised while loading stage configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Animation durations must be finite and non-negative
    #[error("invalid animation duration: {0}s")]
    InvalidDuration(f64),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
