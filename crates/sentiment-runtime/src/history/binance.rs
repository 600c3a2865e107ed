//! Binance History Source
//!
//! Daily BTCUSDT candlesticks from the public Binance API. Klines come
//! back as positional JSON arrays, so fields are picked out by index
//! rather than by name.

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;

use sentiment_core::{HistorySource, Result, SentimentError, SourceRow};

use crate::labeling::{self, DailyQuote};

const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Binance caps the klines limit parameter at 1000
const MAX_LIMIT: u32 = 1000;

/// Binance daily-kline source for BTCUSDT
pub struct BinanceSource {
    client: reqwest::Client,
    base_url: String,
    days: u32,
}

impl BinanceSource {
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

    /// Kline layout: `[open_time_ms, open, high, low, close, volume, ..]`
    /// with the prices and volume as decimal strings.
    fn quotes(klines: &[Value]) -> Vec<DailyQuote> {
        klines
            .iter()
            .filter_map(|kline| {
                let open_ms = kline.get(0)?.as_i64()?;
                let rate = kline.get(4)?.as_str()?.parse::<f64>().ok()?;
                let volume = kline.get(5)?.as_str()?.parse::<f64>().ok()?;
                let date = DateTime::from_timestamp_millis(open_ms)?.date_naive();

                Some(DailyQuote { date, rate, volume })
            })
            .collect()
    }
}

#[async_trait]
impl HistorySource for BinanceSource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        let url = format!(
            "{}/api/v3/klines?symbol=BTCUSDT&interval=1d&limit={}",
            self.base_url,
            self.days.min(MAX_LIMIT)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SentimentError::Source(format!("binance: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::Source(format!(
                "binance: HTTP {}",
                response.status()
            )));
        }

        let klines: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SentimentError::Source(format!("binance: {e}")))?;

        Ok(labeling::label_rows(&Self::quotes(&klines)))
    }

    fn name(&self) -> &str {
        "binance"
    }
}
