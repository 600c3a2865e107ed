//! CryptoCompare History Source
//!
//! Daily BTC/USD history from the public CryptoCompare API. Unlike the
//! other sources this API reports failures in-band, with an envelope
//! whose `Response` field must read `Success`.

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use sentiment_core::{HistorySource, Result, SentimentError, SourceRow};

use crate::labeling::{self, DailyQuote};

const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com";

/// CryptoCompare daily-history source for BTC/USD
pub struct CryptoCompareSource {
    client: reqwest::Client,
    base_url: String,
    days: u32,
}

#[derive(Debug, Deserialize)]
struct HistoDayEnvelope {
    #[serde(rename = "Response")]
    response: String,

    #[serde(rename = "Message", default)]
    message: Option<String>,

    #[serde(rename = "Data", default)]
    data: HistoDayData,
}

#[derive(Debug, Default, Deserialize)]
struct HistoDayData {
    #[serde(rename = "Data", default)]
    points: Vec<HistoDayPoint>,
}

#[derive(Debug, Deserialize)]
struct HistoDayPoint {
    /// Unix seconds of the daily close
    time: i64,

    close: f64,

    /// Volume in the quote currency (USD)
    volumeto: f64,
}

impl CryptoCompareSource {
    pub fn new(client: reqwest::Client, days: u32) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            days,
        }
    }

    /// Override the API base URL, primarily for tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn quotes(points: &[HistoDayPoint]) -> Vec<DailyQuote> {
        points
            .iter()
            .filter_map(|point| {
                let date = DateTime::from_timestamp(point.time, 0)?.date_naive();
                Some(DailyQuote {
                    date,
                    rate: point.close,
                    volume: point.volumeto,
                })
            })
            .collect()
    }
}

#[async_trait]
impl HistorySource for CryptoCompareSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        let url = format!(
            "{}/data/v2/histoday?fsym=BTC&tsym=USD&limit={}",
            self.base_url, self.days
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SentimentError::Source(format!("cryptocompare: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::Source(format!(
                "cryptocompare: HTTP {}",
                response.status()
            )));
        }

        let envelope: HistoDayEnvelope = response
            .json()
            .await
            .map_err(|e| SentimentError::Source(format!("cryptocompare: {e}")))?;

        if envelope.response != "Success" {
            return Err(SentimentError::Source(format!(
                "cryptocompare: {}",
                envelope
                    .message
                    .unwrap_or_else(|| "unspecified API error".to_string())
            )));
        }

        Ok(labeling::label_rows(&Self::quotes(&envelope.data.points)))
    }

    fn name(&self) -> &str {
        "cryptocompare"
    }
}
