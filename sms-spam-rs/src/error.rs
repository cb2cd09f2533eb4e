//! Error types for sms-spam-rs

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, SpamError>;

/// Service error types
#[derive(Error, Debug)]
pub enum SpamError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Lemma lexicon could not be loaded
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Remote artifact download failed
    #[error("Failed to fetch {artifact}: {reason}")]
    ArtifactFetch { artifact: String, reason: String },

    /// Tokenizer error
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Encoder forward pass or weight loading error
    #[error("Model error: {0}")]
    Model(#[from] candle_core::Error),

    /// Feature vector does not match the trained dimensionality
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Chart drawing error
    #[error("Render error: {0}")]
    Render(String),

    /// PNG encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<tokenizers::Error> for SpamError {
    fn from(e: tokenizers::Error) -> Self {
        SpamError::Tokenizer(e.to_string())
    }
}
