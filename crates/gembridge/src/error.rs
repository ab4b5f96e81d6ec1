//! Error types for Gembridge

use thiserror::Error;

/// Main error type for Gembridge operations
#[derive(Error, Debug)]
pub enum GembridgeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload handling errors
    #[error("Upload error: {0}")]
    Upload(String),

    /// Upstream API errors
    #[error("API error: {0}")]
    Api(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Gembridge operations
pub type Result<T> = std::result::Result<T, GembridgeError>;
