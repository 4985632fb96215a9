//! Error types for the stockdata codec.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the stockdata crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Buffer shorter than the header of the format being decoded.
    #[error("Buffer too small: need at least {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Frequency tag outside the closed set of known values.
    #[error("Unknown frequency tag: {0}")]
    UnknownFrequency(i32),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a buffer-too-small error.
    pub fn buffer_too_small(needed: usize, actual: usize) -> Self {
        Error::BufferTooSmall { needed, actual }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_too_small_message() {
        let err = Error::buffer_too_small(26, 4);
        assert_eq!(err.to_string(), "Buffer too small: need at least 26 bytes, got 4");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
