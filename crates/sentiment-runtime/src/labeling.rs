//! Daily Sentiment Labeling
//!
//! The remote market APIs return prices and volumes without sentiment
//! labels. This module derives one per day from the close-over-close
//! percentage change, scaled onto the 0-100 fear/greed score that the
//! label thresholds expect.

use chrono::NaiveDate;

use sentiment_core::{SentimentLabel, SourceRow};

/// Score points per percent of daily change
const SCORE_PER_PERCENT: f64 = 5.0;

/// Midpoint of the fear/greed scale
const NEUTRAL_SCORE: f64 = 50.0;

/// One day of market history before labeling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyQuote {
    /// Calendar date of the close
    pub date: NaiveDate,

    /// Close price in USD
    pub rate: f64,

    /// Traded volume
    pub volume: f64,
}

/// Fear/greed score for a close-over-close percentage change.
///
/// A move of +/-10% in one day saturates the scale.
pub fn score_for_change(pct_change: f64) -> f64 {
    (pct_change.mul_add(SCORE_PER_PERCENT, NEUTRAL_SCORE)).clamp(0.0, 100.0)
}

/// Label a series of daily quotes into source rows.
///
/// The first day has no previous close and is dropped, as is any day
/// whose previous close is non-positive or non-finite. Output keeps the
/// input order.
pub fn label_rows(quotes: &[DailyQuote]) -> Vec<SourceRow> {
    quotes
        .windows(2)
        .filter_map(|pair| {
            let (yesterday, today) = (pair[0], pair[1]);
            if yesterday.rate <= 0.0 || !yesterday.rate.is_finite() || !today.rate.is_finite() {
                return None;
            }

            let pct_change = (today.rate - yesterday.rate) / yesterday.rate * 100.0;
            let label = SentimentLabel::from_score(score_for_change(pct_change));

            Some(SourceRow::new(
                today.date.format("%Y-%m-%d").to_string(),
                today.volume.to_string(),
                today.rate.to_string(),
                label.as_str(),
            ))
        })
        .collect()
}
