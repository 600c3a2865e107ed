//! Mock Classifier
//!
//! A deterministic [`Classifier`] for demos and tests. Training fits
//! nothing more than the size and mean rate of the example set; a query
//! is then bucketed by how far its rate sits from that mean, and each
//! bucket maps to a fixed candidate distribution over the five labels.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use sentiment_core::{
    Classifier, FeatureVector, PredictionCandidate, Result, SentimentError, SentimentLabel,
    TrainingExample, TrainingReport,
};

/// Deterministic classifier stand-in
pub struct MockClassifier {
    state: RwLock<Option<FittedState>>,
    fixed: Option<SentimentLabel>,
}

#[derive(Clone, Copy, Debug)]
struct FittedState {
    examples: usize,
    mean_rate: f64,
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
            fixed: None,
        }
    }

    /// A classifier that always answers with one fixed label.
    ///
    /// Still requires training first; only the answer is pinned.
    pub fn with_fixed(label: SentimentLabel) -> Self {
        Self {
            state: RwLock::new(None),
            fixed: Some(label),
        }
    }

    /// Candidate distribution for a rate bucketed against the trained
    /// mean. Confidences within a bucket are distinct so the top pick
    /// is unambiguous.
    fn candidate_table(ratio: f64) -> Vec<PredictionCandidate> {
        let table: &[(SentimentLabel, f64)] = if ratio < 0.80 {
            &[
                (SentimentLabel::ExtremeFear, 0.72),
                (SentimentLabel::Fear, 0.18),
                (SentimentLabel::Neutral, 0.06),
                (SentimentLabel::Greed, 0.03),
                (SentimentLabel::ExtremeGreed, 0.01),
            ]
        } else if ratio < 0.95 {
            &[
                (SentimentLabel::Fear, 0.58),
                (SentimentLabel::ExtremeFear, 0.20),
                (SentimentLabel::Neutral, 0.14),
                (SentimentLabel::Greed, 0.06),
                (SentimentLabel::ExtremeGreed, 0.02),
            ]
        } else if ratio <= 1.05 {
            &[
                (SentimentLabel::Neutral, 0.52),
                (SentimentLabel::Greed, 0.19),
                (SentimentLabel::Fear, 0.16),
                (SentimentLabel::ExtremeGreed, 0.07),
                (SentimentLabel::ExtremeFear, 0.06),
            ]
        } else if ratio <= 1.25 {
            &[
                (SentimentLabel::Greed, 0.55),
                (SentimentLabel::Neutral, 0.20),
                (SentimentLabel::ExtremeGreed, 0.15),
                (SentimentLabel::Fear, 0.07),
                (SentimentLabel::ExtremeFear, 0.03),
            ]
        } else {
            &[
                (SentimentLabel::ExtremeGreed, 0.70),
                (SentimentLabel::Greed, 0.19),
                (SentimentLabel::Neutral, 0.07),
                (SentimentLabel::Fear, 0.03),
                (SentimentLabel::ExtremeFear, 0.01),
            ]
        };

        table
            .iter()
            .map(|(label, confidence)| PredictionCandidate::new(label.as_str(), *confidence))
            .collect()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn train(&self, examples: &[TrainingExample]) -> Result<TrainingReport> {
        if examples.is_empty() {
            return Err(SentimentError::Classifier(
                "cannot train on zero examples".to_string(),
            ));
        }

        let mean_rate =
            examples.iter().map(|example| example.rate).sum::<f64>() / examples.len() as f64;

        let mut state = self.state.write().await;
        *state = Some(FittedState {
            examples: examples.len(),
            mean_rate,
        });

        tracing::info!(
            examples = examples.len(),
            mean_rate,
            "✓ mock classifier fitted"
        );

        Ok(TrainingReport {
            examples: examples.len(),
            model: self.name().to_string(),
            trained_at: Utc::now(),
        })
    }

    async fn classify(&self, features: &FeatureVector) -> Result<Vec<PredictionCandidate>> {
        let fitted = match *self.state.read().await {
            Some(fitted) => fitted,
            None => return Err(SentimentError::NotReady),
        };

        if let Some(label) = self.fixed {
            return Ok(vec![PredictionCandidate::new(label.as_str(), 0.9)]);
        }

        let ratio = if fitted.mean_rate > 0.0 {
            features.rate / fitted.mean_rate
        } else {
            1.0
        };

        tracing::debug!(
            rate = features.rate,
            mean_rate = fitted.mean_rate,
            ratio,
            trained_on = fitted.examples,
            "mock classification"
        );

        Ok(Self::candidate_table(ratio))
    }

    async fn ready(&self) -> bool {
        self.state.read().await.is_some()
    }

    fn name(&self) -> &str {
        "MockClassifier"
    }
}
