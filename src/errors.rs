/*!
 * Error types for the localgen pipeline.
 *
 * Backend errors are absorbed by the model gateway and turned into template
 * fallbacks; only filesystem and configuration errors ever reach a caller.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while loading or querying a text-generation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The backend is not selected, not compiled in, or not reachable
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Error when making a request fails
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a backend response fails
    #[error("Failed to parse backend response: {0}")]
    ParseError(String),

    /// Error returned by the backend itself
    #[error("Backend responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the backend
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested model could not be found or registered
    #[error("Model not found: {0}")]
    ModelNotFound(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while rendering an image
    #[error("Render error: {0}")]
    Render(String),

    /// Error while writing audio
    #[error("Audio error: {0}")]
    Audio(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<hound::Error> for AppError {
    fn from(error: hound::Error) -> Self {
        match error {
            hound::Error::IoError(e) => Self::File(e.to_string()),
            other => Self::Audio(other.to_string()),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(e) => Self::File(e.to_string()),
            other => Self::Render(other.to_string()),
        }
    }
}
