//! # sentiment-core
//!
//! Core pipeline for the Bitcoin market-sentiment advisor: feature
//! encoding, dataset loading, inference result selection, and advice
//! mapping, plus the collaborator traits that plug in data and models.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SentimentAdvisor                        │
//! │                                                              │
//! │  HistorySource ──▶ Dataset Loader ──▶ Classifier::train      │
//! │   (Strategy)       + Feature Encoder      (Strategy)         │
//! │                                                              │
//! │  raw input ──▶ Feature Encoder ──▶ Classifier::classify      │
//! │                                          │                   │
//! │                    Advice Mapper ◀── Result Selector         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `HistorySource` and `Classifier` traits keep all I/O and model
//! machinery outside this crate: the pipeline itself is pure data
//! preparation and decision interpretation.

pub mod feature;
pub mod dataset;
pub mod selector;
pub mod advice;
pub mod label;
pub mod classifier;
pub mod history;
pub mod advisor;
pub mod session;
pub mod error;

pub use advice::{Advice, UNKNOWN_ADVICE, advise};
pub use advisor::{AdvisorBuilder, SentimentAdvisor, Verdict};
pub use classifier::{Classifier, TrainingReport};
pub use dataset::{LoadOutcome, SourceRow, TrainingExample, load_examples};
pub use error::{Result, SentimentError};
pub use feature::{FeatureVector, REFERENCE_EPOCH, encode_date, encode_rate, encode_volume};
pub use history::HistorySource;
pub use label::SentimentLabel;
pub use selector::{PredictionCandidate, select_top};
pub use session::{Session, SessionPhase};
