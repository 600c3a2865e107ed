//! History Sources
//!
//! Implementations of [`HistorySource`]: a local CSV reader plus three
//! public market-data APIs, and a chain that falls through them in
//! order until one produces rows.

mod binance;
mod coingecko;
mod cryptocompare;
mod csv_file;
#[cfg(test)]
pub(crate) mod stub;

pub use binance::BinanceSource;
pub use coingecko::CoinGeckoSource;
pub use cryptocompare::CryptoCompareSource;
pub use csv_file::CsvHistorySource;

use async_trait::async_trait;

use sentiment_core::{HistorySource, Result, SentimentError, SourceRow};

/// Sequential fallback over several history sources.
///
/// Sources are tried in insertion order; the first one that returns a
/// non-empty row set wins. A failure or an empty result only advances
/// the chain, and the chain errors only once every source is exhausted.
pub struct SourceChain {
    sources: Vec<Box<dyn HistorySource>>,
    name: String,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn HistorySource>>) -> Self {
        let name = if sources.is_empty() {
            "empty-chain".to_string()
        } else {
            sources
                .iter()
                .map(|source| source.name())
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        Self { sources, name }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the chained sources, in fallback order
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|source| source.name())
    }
}

#[async_trait]
impl HistorySource for SourceChain {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        for source in &self.sources {
            match source.fetch_rows().await {
                Ok(rows) if !rows.is_empty() => {
                    tracing::info!(
                        source = source.name(),
                        rows = rows.len(),
                        "✓ history source succeeded"
                    );
                    return Ok(rows);
                }
                Ok(_) => {
                    tracing::warn!(
                        source = source.name(),
                        "⚠ history source returned no rows, trying next"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        error = %e,
                        "⚠ history source failed, trying next"
                    );
                }
            }
        }

        Err(SentimentError::Source(format!(
            "all history sources exhausted: {}",
            self.name
        )))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FixedSource {
        name: &'static str,
        rows: Vec<SourceRow>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        fn new(name: &'static str, rows: Vec<SourceRow>) -> Self {
            Self::with_counter(name, rows, Arc::new(AtomicUsize::new(0)))
        }

        fn with_counter(
            name: &'static str,
            rows: Vec<SourceRow>,
            calls: Arc<AtomicUsize>,
        ) -> Self {
            Self { name, rows, calls }
        }
    }

    #[async_trait]
    impl HistorySource for FixedSource {
        async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.clone())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct FailingSource;

    #[async_trait]
    impl HistorySource for FailingSource {
        async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
            Err(SentimentError::Source("connection refused".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn sample_row() -> SourceRow {
        SourceRow::new("2021-06-01", "12345", "36684.93", "Fear")
    }

    #[tokio::test]
    async fn test_first_productive_source_wins() {
        let chain = SourceChain::new(vec![
            Box::new(FailingSource),
            Box::new(FixedSource::new("empty", vec![])),
            Box::new(FixedSource::new("full", vec![sample_row()])),
            Box::new(FixedSource::new("unreached", vec![sample_row()])),
        ]);

        let rows = chain.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prediction, "Fear");
    }

    #[tokio::test]
    async fn test_later_sources_are_not_called_after_a_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = SourceChain::new(vec![
            Box::new(FixedSource::new("first", vec![sample_row()])),
            Box::new(FixedSource::with_counter(
                "second",
                vec![sample_row()],
                calls.clone(),
            )),
        ]);

        chain.fetch_rows().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_a_source_error() {
        let chain = SourceChain::new(vec![
            Box::new(FailingSource),
            Box::new(FixedSource::new("empty", vec![])),
        ]);

        let err = chain.fetch_rows().await.unwrap_err();
        assert!(matches!(err, SentimentError::Source(_)));
    }

    #[tokio::test]
    async fn test_empty_chain_errors_immediately() {
        let chain = SourceChain::new(vec![]);
        assert!(chain.is_empty());
        assert!(chain.fetch_rows().await.is_err());
    }

    #[test]
    fn test_chain_name_joins_source_names() {
        let chain = SourceChain::new(vec![
            Box::new(FixedSource::new("csv", vec![])),
            Box::new(FixedSource::new("coingecko", vec![])),
        ]);

        assert_eq!(chain.name(), "csv -> coingecko");
        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.source_names().collect::<Vec<_>>(),
            vec!["csv", "coingecko"]
        );
    }
}
