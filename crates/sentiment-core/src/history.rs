//! History Source Abstraction
//!
//! Strategy trait for anything that can supply historical market rows:
//! CSV exports, public price APIs, test fixtures.

use async_trait::async_trait;

use crate::dataset::SourceRow;
use crate::error::Result;

/// Strategy trait for historical market-data suppliers
///
/// Implementations own all I/O and reshape whatever they read into
/// ordered [`SourceRow`]s; validation happens later in the dataset
/// loader.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch all available rows, oldest first
    async fn fetch_rows(&self) -> Result<Vec<SourceRow>>;

    /// Source name for logs and health reporting
    fn name(&self) -> &str;
}
