//! Sentiment Label Vocabulary
//!
//! The closed set of market-sentiment labels the classifier is trained on,
//! mirroring the classic crypto fear & greed scale.

use serde::{Deserialize, Serialize};

/// Market sentiment label
///
/// The vocabulary is closed: any label outside these five is treated as
/// unknown at advice time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,

    Fear,

    Neutral,

    Greed,

    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl SentimentLabel {
    /// All labels, in scale order
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::ExtremeFear,
        SentimentLabel::Fear,
        SentimentLabel::Neutral,
        SentimentLabel::Greed,
        SentimentLabel::ExtremeGreed,
    ];

    /// Canonical display string
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::ExtremeFear => "Extreme Fear",
            SentimentLabel::Fear => "Fear",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Greed => "Greed",
            SentimentLabel::ExtremeGreed => "Extreme Greed",
        }
    }

    /// CSS class name presentation layers hang styling on
    pub fn css_class(&self) -> &'static str {
        match self {
            SentimentLabel::ExtremeFear => "extreme-fear",
            SentimentLabel::Fear => "fear",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Greed => "greed",
            SentimentLabel::ExtremeGreed => "extreme-greed",
        }
    }

    /// Parse a canonical label string; anything else is None
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Extreme Fear" => Some(SentimentLabel::ExtremeFear),
            "Fear" => Some(SentimentLabel::Fear),
            "Neutral" => Some(SentimentLabel::Neutral),
            "Greed" => Some(SentimentLabel::Greed),
            "Extreme Greed" => Some(SentimentLabel::ExtremeGreed),
            _ => None,
        }
    }

    /// Map a 0-100 fear/greed score onto the label scale
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            SentimentLabel::ExtremeFear
        } else if score < 45.0 {
            SentimentLabel::Fear
        } else if score < 55.0 {
            SentimentLabel::Neutral
        } else if score < 75.0 {
            SentimentLabel::Greed
        } else {
            SentimentLabel::ExtremeGreed
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
