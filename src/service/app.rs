//! Pipeline coordination
//!
//! Wires the match stream, hold-out split, rating engine, rating repository
//! and evaluator together according to the application configuration.

use crate::config::{validate_config, AppConfig};
use crate::error::Result;
use crate::evaluation::{evaluate, EvaluationReport, SessionSplit, Signal};
use crate::rating::{RatingEngine, RatingRepository, RatingStore, RunSummary};
use crate::stream::{load_documents, MatchStream};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Name of the rating signal in reports
pub const RATING_SIGNAL: &str = "elo";
/// Name of the alternative signal in reports
pub const ALTERNATIVE_SIGNAL: &str = "masterpoints";

/// Everything a full train-and-evaluate run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub training: RunSummary,
    pub skipped_records: usize,
    pub participants: usize,
    pub holdout_sessions: usize,
    pub evaluation: EvaluationReport,
}

/// Coordinates one rating experiment
#[derive(Debug, Clone)]
pub struct RatingPipeline {
    config: AppConfig,
}

impl RatingPipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read the configured game documents and build the ordered stream
    pub fn load_stream(&self) -> Result<MatchStream> {
        let report = load_documents(&self.config.storage.games_path)?;
        if !report.failures.is_empty() {
            warn!(
                "{} game files could not be read and were left out",
                report.failures.len()
            );
        }
        Ok(report.into_stream())
    }

    pub fn split(&self, stream: &MatchStream) -> Result<SessionSplit> {
        SessionSplit::by_fraction(&stream.matches, self.config.evaluation.holdout_fraction)
    }

    /// Rate the training partition and persist the final table once.
    ///
    /// The store is seeded with every participant of the full stream so that
    /// held-out players who never appear in training still have a rating.
    pub fn train(
        &self,
        stream: &MatchStream,
        split: &SessionSplit,
        repository: &mut dyn RatingRepository,
    ) -> Result<(RatingStore, RunSummary)> {
        let engine = RatingEngine::from_config(&self.config.rating)?;
        let mut store = RatingStore::new();
        store.initialize(&stream.participants, self.config.rating.baseline_rating)?;

        let summary = engine.run_and_persist(&split.train, &mut store, repository)?;
        Ok((store, summary))
    }

    /// Score the held-out partition with the trained ratings and masterpoints
    pub fn evaluate(
        &self,
        stream: &MatchStream,
        split: &SessionSplit,
        store: &RatingStore,
    ) -> Result<EvaluationReport> {
        let ratings = Signal::from_snapshot(RATING_SIGNAL, &store.snapshot());
        let masterpoints = Signal::new(ALTERNATIVE_SIGNAL, stream.masterpoint_values());
        evaluate(&split.test, &ratings, &masterpoints)
    }

    /// Load, split, train, persist and evaluate in one go
    pub fn run(&self, repository: &mut dyn RatingRepository) -> Result<ExperimentReport> {
        let stream = self.load_stream()?;
        self.run_on_stream(&stream, repository)
    }

    pub fn run_on_stream(
        &self,
        stream: &MatchStream,
        repository: &mut dyn RatingRepository,
    ) -> Result<ExperimentReport> {
        let split = self.split(stream)?;
        let (store, training) = self.train(stream, &split, repository)?;
        let evaluation = self.evaluate(stream, &split, &store)?;

        info!("Experiment complete");
        Ok(ExperimentReport {
            training,
            skipped_records: stream.skipped.len(),
            participants: store.len(),
            holdout_sessions: split.holdout_sessions.len(),
            evaluation,
        })
    }
}
