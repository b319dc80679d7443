//! Domain-specific error types for hf-text-processor

use thiserror::Error;

use crate::clients::InferenceError;

/// Main error type for the text processor
#[derive(Error, Debug)]
pub enum TextProcessorError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Inference error: {message}")]
    Inference { message: String },
}

impl From<std::io::Error> for TextProcessorError {
    fn from(err: std::io::Error) -> Self {
        TextProcessorError::Input {
            message: err.to_string(),
        }
    }
}

impl From<InferenceError> for TextProcessorError {
    fn from(err: InferenceError) -> Self {
        TextProcessorError::Inference {
            message: err.to_string(),
        }
    }
}

/// Result type alias for text processor operations
pub type Result<T> = std::result::Result<T, TextProcessorError>;
