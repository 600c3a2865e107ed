//! Classifier Abstraction
//!
//! Strategy trait for the trainable sentiment classifier. The engine
//! behind it (network shape, optimizer, loss) is the implementation's
//! business; the pipeline only prepares inputs and interprets scored
//! outputs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::TrainingExample;
use crate::error::Result;
use crate::feature::FeatureVector;
use crate::selector::PredictionCandidate;

/// Summary returned by a completed training run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Number of examples the model was fitted on
    pub examples: usize,

    /// Implementation-reported model name
    pub model: String,

    /// When training finished
    pub trained_at: DateTime<Utc>,
}

/// Strategy trait for trainable sentiment classifiers
///
/// Implement this to plug in a model backend. The pipeline calls `train`
/// once per dataset and `classify` exactly once per request.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Fit the model to the encoded examples
    async fn train(&self, examples: &[TrainingExample]) -> Result<TrainingReport>;

    /// Score a single feature vector into label candidates
    async fn classify(&self, features: &FeatureVector) -> Result<Vec<PredictionCandidate>>;

    /// Whether the classifier currently holds a trained model
    async fn ready(&self) -> bool;

    /// Implementation name for logs and health reporting
    fn name(&self) -> &str;
}
