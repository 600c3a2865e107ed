//! Inference Result Selection
//!
//! Picks the winning candidate out of a classifier's scored output.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};

/// One scored label candidate from the classifier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionCandidate {
    /// Predicted sentiment label
    pub label: String,

    /// Classifier confidence; absent or non-finite scores never win
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PredictionCandidate {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: Some(confidence),
        }
    }

    /// Candidate without a confidence score
    pub fn unscored(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence: None,
        }
    }

    /// Confidence used for ranking; unusable scores rank below everything
    fn comparison_score(&self) -> f64 {
        match self.confidence {
            Some(score) if score.is_finite() => score,
            _ => f64::NEG_INFINITY,
        }
    }
}

/// Select the highest-confidence candidate in one linear scan.
///
/// Strict greater-than comparison, so the first of several equally
/// confident candidates wins. Candidates without a usable confidence
/// compare as negative infinity. An empty list is the distinct
/// no-candidates error, never a low-confidence result.
pub fn select_top(candidates: &[PredictionCandidate]) -> Result<&PredictionCandidate> {
    let mut iter = candidates.iter();
    let mut best = iter.next().ok_or(SentimentError::NoCandidates)?;

    for candidate in iter {
        if candidate.comparison_score() > best.comparison_score() {
            best = candidate;
        }
    }

    Ok(best)
}
