//! # sentiment-runtime
//!
//! Runtime implementations behind the collaborator traits of
//! `sentiment-core`:
//!
//! - **History sources**: a CSV file reader for pre-labeled exports and
//!   three public market-data APIs (CoinGecko, Binance, CryptoCompare)
//!   reshaped into source rows, plus a sequential fallback chain.
//! - **Labeling**: derives fear/greed labels for raw price history that
//!   arrives without them.
//! - **Mock classifier**: a deterministic classifier stand-in for demos
//!   and tests.

pub mod history;
pub mod labeling;
pub mod mock;

pub use history::{
    BinanceSource, CoinGeckoSource, CryptoCompareSource, CsvHistorySource, SourceChain,
};
pub use labeling::{DailyQuote, label_rows, score_for_change};
pub use mock::MockClassifier;
