//! Advisor Orchestration
//!
//! Wires a history source, a classifier, and session state into the full
//! train-then-classify pipeline.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, watch};

use crate::advice::{Advice, advise};
use crate::classifier::Classifier;
use crate::dataset::{LoadOutcome, load_examples};
use crate::error::{Result, SentimentError};
use crate::feature::FeatureVector;
use crate::history::HistorySource;
use crate::selector::select_top;
use crate::session::{Session, SessionPhase};

/// Final verdict for one classification request
#[derive(Clone, Debug, Serialize)]
pub struct Verdict {
    /// Winning sentiment label
    pub label: String,

    /// Winning candidate's confidence, when it had a usable one
    pub confidence: Option<f64>,

    /// Advisory for the label
    pub advice: Advice,
}

/// The sentiment advisor: one source, one classifier, one session
pub struct SentimentAdvisor {
    source: Arc<dyn HistorySource>,
    classifier: Arc<dyn Classifier>,
    session: Arc<RwLock<Session>>,
    phase_tx: watch::Sender<SessionPhase>,
}

impl fmt::Debug for SentimentAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAdvisor")
            .field("source", &self.source.name())
            .field("classifier", &self.classifier.name())
            .finish_non_exhaustive()
    }
}

impl SentimentAdvisor {
    /// Create a new advisor
    pub fn new(source: Arc<dyn HistorySource>, classifier: Arc<dyn Classifier>) -> Self {
        let (phase_tx, _) = watch::channel(SessionPhase::Idle);
        Self {
            source,
            classifier,
            session: Arc::new(RwLock::new(Session::new())),
            phase_tx,
        }
    }

    /// Snapshot of the current session state
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Subscribe to lifecycle phase changes
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.phase_tx.subscribe()
    }

    /// History source name
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Classifier name
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Whether the classifier currently holds a trained model
    pub async fn ready(&self) -> bool {
        self.classifier.ready().await
    }

    /// Claim the pipeline for a new run.
    ///
    /// The in-flight check and the move into the fetching phase happen
    /// under a single session write lock: of several concurrent callers
    /// exactly one wins the claim, the rest get `false` and no side
    /// effects. Winners must follow up with [`Self::run_pipeline`].
    pub async fn begin_run(&self) -> bool {
        let mut session = self.session.write().await;
        if session.in_flight() {
            return false;
        }
        session.begin_fetch();
        self.publish_phase(session.phase);
        true
    }

    /// Claim and run the full data-to-model pipeline.
    ///
    /// Refuses with [`SentimentError::TrainingInProgress`] while another
    /// run holds the claim. See [`Self::run_pipeline`] for the rest of
    /// the contract.
    pub async fn train(&self) -> Result<LoadOutcome> {
        if !self.begin_run().await {
            return Err(SentimentError::TrainingInProgress);
        }
        self.run_pipeline().await
    }

    /// Run the pipeline under a claim taken with [`Self::begin_run`].
    ///
    /// Fetches rows, loads them into examples, and trains the classifier.
    /// A dataset with zero usable rows marks the session failed and
    /// returns the load outcome without training; it is not an error.
    /// Split from [`Self::train`] so a server can settle the claim while
    /// answering a request and run the slow part on a background task.
    pub async fn run_pipeline(&self) -> Result<LoadOutcome> {
        let rows = match self.source.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                self.update_session(|s| s.mark_failed(e.to_string())).await;
                return Err(e);
            }
        };

        let outcome = load_examples(&rows);
        self.update_session(|s| s.record_load(self.source.name(), &outcome))
            .await;

        if outcome.is_empty() {
            tracing::warn!(
                rows = outcome.rows_seen,
                source = self.source.name(),
                "no usable training rows; skipping training"
            );
            self.update_session(|s| s.mark_failed("no usable training rows"))
                .await;
            return Ok(outcome);
        }

        self.update_session(|s| s.begin_training()).await;

        match self.classifier.train(&outcome.examples).await {
            Ok(report) => {
                tracing::info!(
                    examples = report.examples,
                    model = %report.model,
                    "classifier trained"
                );
                self.update_session(|s| s.mark_ready()).await;
                Ok(outcome)
            }
            Err(e) => {
                self.update_session(|s| s.mark_failed(e.to_string())).await;
                Err(e)
            }
        }
    }

    /// Classify one raw user input into a verdict.
    ///
    /// Refuses while no trained model is available. Inputs are encoded
    /// first; the classifier is invoked exactly once per request.
    pub async fn classify(&self, date: &str, volume: &str, rate: &str) -> Result<Verdict> {
        if !self.classifier.ready().await {
            return Err(SentimentError::NotReady);
        }

        let features = FeatureVector::from_raw(date, volume, rate)?;
        let candidates = self.classifier.classify(&features).await?;
        let top = select_top(&candidates)?;
        let advice = advise(&top.label);

        tracing::debug!(label = %top.label, confidence = ?top.confidence, "classified");

        Ok(Verdict {
            label: top.label.clone(),
            confidence: top.confidence.filter(|c| c.is_finite()),
            advice,
        })
    }

    async fn update_session<F>(&self, apply: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.session.write().await;
        apply(&mut session);
        self.publish_phase(session.phase);
    }

    // Broadcast a phase, suppressing no-op repeats
    fn publish_phase(&self, phase: SessionPhase) {
        self.phase_tx.send_if_modified(|current| {
            if *current == phase {
                false
            } else {
                *current = phase;
                true
            }
        });
    }
}

/// Builder for the advisor
pub struct AdvisorBuilder {
    source: Option<Arc<dyn HistorySource>>,
    classifier: Option<Arc<dyn Classifier>>,
}

impl Default for AdvisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            classifier: None,
        }
    }

    pub fn source(mut self, source: Arc<dyn HistorySource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Result<SentimentAdvisor> {
        let source = self
            .source
            .ok_or_else(|| SentimentError::Config("History source is required".into()))?;
        let classifier = self
            .classifier
            .ok_or_else(|| SentimentError::Config("Classifier is required".into()))?;

        Ok(SentimentAdvisor::new(source, classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrainingReport;
    use crate::dataset::{SourceRow, TrainingExample};
    use crate::selector::PredictionCandidate;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FixedSource {
        rows: Vec<SourceRow>,
    }

    #[async_trait]
    impl HistorySource for FixedSource {
        async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
            Ok(self.rows.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingSource;

    #[async_trait]
    impl HistorySource for FailingSource {
        async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
            Err(SentimentError::Source("gateway down".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Parks inside fetch_rows until the gate is released
    struct GatedSource {
        gate: Arc<tokio::sync::Notify>,
        rows: Vec<SourceRow>,
    }

    #[async_trait]
    impl HistorySource for GatedSource {
        async fn fetch_rows(&self) -> Result<Vec<SourceRow>> {
            self.gate.notified().await;
            Ok(self.rows.clone())
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    struct ScriptedClassifier {
        candidates: Vec<PredictionCandidate>,
        trained: AtomicBool,
        classify_calls: AtomicUsize,
    }

    impl ScriptedClassifier {
        fn new(candidates: Vec<PredictionCandidate>) -> Self {
            Self {
                candidates,
                trained: AtomicBool::new(false),
                classify_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        async fn train(&self, examples: &[TrainingExample]) -> Result<TrainingReport> {
            self.trained.store(true, Ordering::SeqCst);
            Ok(TrainingReport {
                examples: examples.len(),
                model: "scripted".into(),
                trained_at: chrono::Utc::now(),
            })
        }

        async fn classify(&self, _features: &FeatureVector) -> Result<Vec<PredictionCandidate>> {
            self.classify_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }

        async fn ready(&self) -> bool {
            self.trained.load(Ordering::SeqCst)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn tie_candidates() -> Vec<PredictionCandidate> {
        vec![
            PredictionCandidate::new("Fear", 0.3),
            PredictionCandidate::new("Greed", 0.9),
            PredictionCandidate::new("Neutral", 0.9),
        ]
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let source = Arc::new(FixedSource {
            rows: vec![
                SourceRow::new("2021-06-01", "100", "50000", "Fear"),
                SourceRow::new("", "100", "50000", "Fear"),
            ],
        });
        let classifier = Arc::new(ScriptedClassifier::new(tie_candidates()));

        let advisor = AdvisorBuilder::new()
            .source(source)
            .classifier(classifier.clone())
            .build()
            .unwrap();

        let outcome = advisor.train().await.unwrap();
        assert_eq!(outcome.accepted(), 1);

        let session = advisor.session().await;
        assert!(session.is_ready());
        assert_eq!(session.examples_accepted, 1);
        assert_eq!(session.rows_skipped, 1);
        assert_eq!(session.source.as_deref(), Some("fixed"));

        let verdict = advisor.classify("2021-06-01", "100", "50000").await.unwrap();
        assert_eq!(verdict.label, "Greed");
        assert_eq!(verdict.confidence, Some(0.9));
        assert_eq!(verdict.advice.css_class, "greed");
        assert_eq!(classifier.classify_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_classify_before_training_is_refused() {
        let advisor = SentimentAdvisor::new(
            Arc::new(FixedSource { rows: vec![] }),
            Arc::new(ScriptedClassifier::new(tie_candidates())),
        );

        let err = advisor.classify("2021-06-01", "100", "50000").await.unwrap_err();
        assert!(matches!(err, SentimentError::NotReady));
    }

    #[tokio::test]
    async fn test_empty_dataset_marks_failed_without_training() {
        let advisor = SentimentAdvisor::new(
            Arc::new(FixedSource {
                rows: vec![SourceRow::new("", "", "", "")],
            }),
            Arc::new(ScriptedClassifier::new(tie_candidates())),
        );

        let outcome = advisor.train().await.unwrap();
        assert!(outcome.is_empty());

        let session = advisor.session().await;
        assert_eq!(session.phase, SessionPhase::Failed);
        assert!(!advisor.ready().await);
    }

    #[tokio::test]
    async fn test_source_failure_marks_failed() {
        let advisor = SentimentAdvisor::new(
            Arc::new(FailingSource),
            Arc::new(ScriptedClassifier::new(tie_candidates())),
        );

        let err = advisor.train().await.unwrap_err();
        assert!(matches!(err, SentimentError::Source(_)));

        let session = advisor.session().await;
        assert_eq!(session.phase, SessionPhase::Failed);
        assert!(session.last_error.as_deref().unwrap_or("").contains("gateway down"));
    }

    #[tokio::test]
    async fn test_overlapping_runs_are_refused() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let advisor = Arc::new(SentimentAdvisor::new(
            Arc::new(GatedSource {
                gate: gate.clone(),
                rows: vec![SourceRow::new("2021-06-01", "100", "50000", "Fear")],
            }),
            Arc::new(ScriptedClassifier::new(tie_candidates())),
        ));

        // Take the claim, then park the run inside the source
        assert!(advisor.begin_run().await);
        let runner = {
            let advisor = advisor.clone();
            tokio::spawn(async move { advisor.run_pipeline().await })
        };

        // While the first run holds the claim, a second claim and a
        // direct train call are both turned away
        assert!(!advisor.begin_run().await);
        let err = advisor.train().await.unwrap_err();
        assert!(matches!(err, SentimentError::TrainingInProgress));

        gate.notify_one();
        runner.await.unwrap().unwrap();
        assert!(advisor.session().await.is_ready());

        // A finished run releases the claim
        assert!(advisor.begin_run().await);
    }

    #[tokio::test]
    async fn test_invalid_input_is_reported() {
        let advisor = SentimentAdvisor::new(
            Arc::new(FixedSource {
                rows: vec![SourceRow::new("2021-06-01", "100", "50000", "Fear")],
            }),
            Arc::new(ScriptedClassifier::new(tie_candidates())),
        );
        advisor.train().await.unwrap();

        let err = advisor.classify("banana", "100", "50000").await.unwrap_err();
        assert!(matches!(err, SentimentError::InvalidDate(_)));

        let err = advisor.classify("2021-06-01", "100", "much").await.unwrap_err();
        assert!(matches!(err, SentimentError::InvalidNumber { field: "rate", .. }));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_distinct_error() {
        let advisor = SentimentAdvisor::new(
            Arc::new(FixedSource {
                rows: vec![SourceRow::new("2021-06-01", "100", "50000", "Fear")],
            }),
            Arc::new(ScriptedClassifier::new(vec![])),
        );
        advisor.train().await.unwrap();

        let err = advisor.classify("2021-06-01", "100", "50000").await.unwrap_err();
        assert!(matches!(err, SentimentError::NoCandidates));
    }

    #[tokio::test]
    async fn test_phase_stream_reaches_ready() {
        let advisor = SentimentAdvisor::new(
            Arc::new(FixedSource {
                rows: vec![SourceRow::new("2021-06-01", "100", "50000", "Fear")],
            }),
            Arc::new(ScriptedClassifier::new(tie_candidates())),
        );

        let rx = advisor.subscribe();
        advisor.train().await.unwrap();
        assert_eq!(*rx.borrow(), SessionPhase::Ready);
    }

    #[test]
    fn test_builder_requires_both_collaborators() {
        let err = AdvisorBuilder::new().build().unwrap_err();
        assert!(matches!(err, SentimentError::Config(_)));
    }
}
