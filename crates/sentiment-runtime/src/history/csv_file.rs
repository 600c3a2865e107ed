//! CSV History Source
//!
//! Reads a local CSV export with `date,volume,rate,prediction` columns.
//! The reader is deliberately lenient: headers are trimmed, ragged lines
//! are tolerated, and unreadable records are dropped with a log line.
//! Per-field validation belongs to the dataset loader, not here.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use sentiment_core::{HistorySource, Result, SourceRow};

/// File-backed history source
pub struct CsvHistorySource {
    path: PathBuf,
}

impl CsvHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(bytes: &[u8]) -> Vec<SourceRow> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<SourceRow>().enumerate() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::debug!(index, error = %e, "dropping unreadable CSV record");
                }
            }
        }

        rows
    }
}

#[async_trait]
impl HistorySource for CsvHistorySource {
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let rows = Self::parse(&bytes);

        tracing::info!(
            path = %self.path.display(),
            rows = rows.len(),
            "read history CSV"
        );

        Ok(rows)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
