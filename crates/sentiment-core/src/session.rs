//! Session State
//!
//! Tracks the pipeline lifecycle for one service run: a single shared
//! state object that observers read as snapshots, instead of scattered
//! is-training / is-ready flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::LoadOutcome;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline lifecycle phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing has run yet
    #[default]
    Idle,

    /// Fetching rows from a history source
    Fetching,

    /// Classifier training in progress
    Training,

    /// Model trained; classification available
    Ready,

    /// The last pipeline run failed; see `last_error`
    Failed,
}

/// Pipeline session state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Current lifecycle phase
    pub phase: SessionPhase,

    /// Name of the source that supplied the current dataset
    pub source: Option<String>,

    /// Rows seen in the last load
    pub rows_seen: usize,

    /// Examples accepted in the last load
    pub examples_accepted: usize,

    /// Rows skipped in the last load
    pub rows_skipped: usize,

    /// Failure detail when phase is Failed
    pub last_error: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last state-change timestamp
    pub updated_at: DateTime<Utc>,

    /// When the current model finished training
    pub trained_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a new idle session
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            phase: SessionPhase::Idle,
            source: None,
            rows_seen: 0,
            examples_accepted: 0,
            rows_skipped: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
            trained_at: None,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Enter the fetching phase, clearing any previous failure
    pub fn begin_fetch(&mut self) {
        self.phase = SessionPhase::Fetching;
        self.last_error = None;
        self.touch();
    }

    /// Record the outcome of a dataset load
    pub fn record_load(&mut self, source: impl Into<String>, outcome: &LoadOutcome) {
        self.source = Some(source.into());
        self.rows_seen = outcome.rows_seen;
        self.examples_accepted = outcome.accepted();
        self.rows_skipped = outcome.skipped.len();
        self.touch();
    }

    /// Enter the training phase
    pub fn begin_training(&mut self) {
        self.phase = SessionPhase::Training;
        self.touch();
    }

    /// Mark the model trained and usable
    pub fn mark_ready(&mut self) {
        self.phase = SessionPhase::Ready;
        self.trained_at = Some(Utc::now());
        self.touch();
    }

    /// Mark the pipeline failed
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.phase = SessionPhase::Failed;
        self.last_error = Some(error.into());
        self.touch();
    }

    /// Whether a pipeline run is currently in flight
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, SessionPhase::Fetching | SessionPhase::Training)
    }

    /// Whether classification is currently available
    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_examples, SourceRow};

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase, SessionPhase::Idle);
        assert!(!session.in_flight());
        assert!(!session.is_ready());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut session = Session::new();

        session.begin_fetch();
        assert!(session.in_flight());

        let outcome = load_examples(&[SourceRow::new("2021-06-01", "100", "50000", "Fear")]);
        session.record_load("fixture", &outcome);
        assert_eq!(session.examples_accepted, 1);
        assert_eq!(session.source.as_deref(), Some("fixture"));

        session.begin_training();
        assert!(session.in_flight());

        session.mark_ready();
        assert!(session.is_ready());
        assert!(session.trained_at.is_some());
    }

    #[test]
    fn test_failure_records_error() {
        let mut session = Session::new();
        session.mark_failed("no usable training rows");
        assert_eq!(session.phase, SessionPhase::Failed);
        assert_eq!(session.last_error.as_deref(), Some("no usable training rows"));
    }

    #[test]
    fn test_refetch_clears_previous_error() {
        let mut session = Session::new();
        session.mark_failed("boom");
        session.begin_fetch();
        assert_eq!(session.last_error, None);
        assert_eq!(session.phase, SessionPhase::Fetching);
    }
}
