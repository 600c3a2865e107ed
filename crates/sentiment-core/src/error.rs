//! Error Types

use thiserror::Error;

/// Result type alias for sentiment pipeline operations
pub type Result<T> = std::result::Result<T, SentimentError>;

/// Sentiment pipeline error types
#[derive(Error, Debug)]
pub enum SentimentError {
    /// Date input that is not a parseable calendar date
    #[error("Invalid date input: {0:?}")]
    InvalidDate(String),

    /// Numeric input that does not parse to a finite float
    #[error("Invalid {field} input: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Classifier produced an empty candidate list
    #[error("Classifier produced no candidates")]
    NoCandidates,

    /// Classification requested before a model was trained
    #[error("Model is not ready")]
    NotReady,

    /// Training requested while a run is already in flight
    #[error("Training already in progress")]
    TrainingInProgress,

    /// Classifier collaborator failure
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// History source failure (single source or an exhausted chain)
    #[error("History source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SentimentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            SentimentError::InvalidDate(_) => {
                "The date could not be read. Use the YYYY-MM-DD format.".into()
            }
            SentimentError::InvalidNumber { field, .. } => {
                format!("The {} value is not a number.", field)
            }
            SentimentError::NoCandidates => {
                "The model produced no usable result. Please try again.".into()
            }
            SentimentError::NotReady => {
                "The model has not finished training. Please try again shortly.".into()
            }
            SentimentError::TrainingInProgress => "A training run is already in progress.".into(),
            SentimentError::Classifier(_) => "The classifier encountered an error.".into(),
            SentimentError::Source(_) => "Historical market data is currently unavailable.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}
