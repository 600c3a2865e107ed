//! Application State

use std::sync::Arc;

use sentiment_core::SentimentAdvisor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The advisor pipeline behind every endpoint
    pub advisor: Arc<SentimentAdvisor>,
}
