//! CoinGecko History Source
//!
//! Daily BTC/USD market history from the public CoinGecko API. The
//! endpoint returns parallel `[timestamp, value]` series for prices and
//! volumes; with more than 90 days requested the API serves one point
//! per day automatically.

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use sentiment_core::{HistorySource, Result, SentimentError, SourceRow};

use crate::labeling::{self, DailyQuote};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

/// CoinGecko market-chart source for BTC/USD
pub struct CoinGeckoSource {
    client: reqwest::Client,
    base_url: String,
    days: u32,
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[timestamp_ms, price]` pairs
    prices: Vec<(f64, f64)>,

    /// `[timestamp_ms, volume]` pairs
    total_volumes: Vec<(f64, f64)>,
}

impl CoinGeckoSource {
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

    fn quotes(chart: MarketChart) -> Vec<DailyQuote> {
        let mut quotes: Vec<DailyQuote> = chart
            .prices
            .into_iter()
            .zip(chart.total_volumes)
            .filter_map(|((timestamp_ms, price), (_, volume))| {
                let date = DateTime::from_timestamp_millis(timestamp_ms as i64)?.date_naive();
                Some(DailyQuote {
                    date,
                    rate: price,
                    volume,
                })
            })
            .collect();

        // The series ends with a snapshot of the current partial day,
        // which can duplicate the midnight point of the same date.
        quotes.dedup_by_key(|quote| quote.date);

        quotes
    }
}

#[async_trait]
impl HistorySource for CoinGeckoSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        let url = format!(
            "{}/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days={}",
            self.base_url, self.days
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SentimentError::Source(format!("coingecko: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::Source(format!(
                "coingecko: HTTP {}",
                response.status()
            )));
        }

        let chart: MarketChart = response
            .json()
            .await
            .map_err(|e| SentimentError::Source(format!("coingecko: {e}")))?;

        Ok(labeling::label_rows(&Self::quotes(chart)))
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}
