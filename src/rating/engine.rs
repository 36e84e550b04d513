//! Rating engine: replays an ordered match stream against a rating store
//!
//! For every match the two partnerships are pooled (mean of the two members'
//! current ratings), the pools are rated against each other, and the pool
//! delta, multiplied by the update scale, is added to both members of the
//! side. Matches are applied strictly in the order given.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::rating::calculator::PairwiseRater;
use crate::rating::elo::EloRatingCalculator;
use crate::rating::storage::{RatingRepository, RatingStore};
use crate::types::{MatchRecord, Outcome, Partnership};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// What a single match did to the ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub match_id: u64,
    pub outcome: Outcome,
    pub pool_ns: f64,
    pub pool_ew: f64,
    /// Delta added to each north-south member
    pub delta_ns: f64,
    /// Delta added to each east-west member
    pub delta_ew: f64,
}

/// Totals for a completed pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub matches_processed: usize,
    pub ns_wins: usize,
    pub ew_wins: usize,
    pub draws: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: Outcome) {
        self.matches_processed += 1;
        match outcome {
            Outcome::NsWins => self.ns_wins += 1,
            Outcome::EwWins => self.ew_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

/// Sequential partnership rating engine
#[derive(Debug, Clone)]
pub struct RatingEngine<R = EloRatingCalculator> {
    rater: R,
    update_scale: f64,
}

impl RatingEngine<EloRatingCalculator> {
    /// Engine with the Elo calculator built from configuration
    pub fn from_config(config: &RatingConfig) -> Result<Self> {
        let rater = EloRatingCalculator::new(config.elo_settings())?;
        Self::new(rater, config.update_scale)
    }
}

impl<R: PairwiseRater> RatingEngine<R> {
    pub fn new(rater: R, update_scale: f64) -> Result<Self> {
        if !update_scale.is_finite() || update_scale <= 0.0 {
            return Err(RatingError::Configuration {
                message: format!("Update scale must be positive, got {}", update_scale),
            }
            .into());
        }

        Ok(Self {
            rater,
            update_scale,
        })
    }

    pub fn rater(&self) -> &R {
        &self.rater
    }

    pub fn update_scale(&self) -> f64 {
        self.update_scale
    }

    fn pool(store: &RatingStore, side: Partnership) -> Result<f64> {
        let first = store.get(side.0)?;
        let second = store.get(side.1)?;
        Ok((first + second) / 2.0)
    }

    /// Apply one match to the store.
    ///
    /// All four ratings are read before anything is written, so a match that
    /// fails (unknown participant, bad scores) leaves the store untouched.
    pub fn process_match(&self, record: &MatchRecord, store: &mut RatingStore) -> Result<MatchUpdate> {
        let pool_ns = Self::pool(store, record.north_south)?;
        let pool_ew = Self::pool(store, record.east_west)?;
        record.validate()?;
        let outcome = record.outcome()?;

        let (new_pool_ns, new_pool_ew) = self.rater.rate(pool_ns, pool_ew, outcome);
        let delta_ns = (new_pool_ns - pool_ns) * self.update_scale;
        let delta_ew = (new_pool_ew - pool_ew) * self.update_scale;

        for id in record.north_south.members() {
            store.apply_delta(id, delta_ns)?;
        }
        for id in record.east_west.members() {
            store.apply_delta(id, delta_ew)?;
        }

        debug!(
            match_id = record.match_id,
            %outcome,
            pool_ns,
            pool_ew,
            delta_ns,
            delta_ew,
            "Applied match"
        );

        Ok(MatchUpdate {
            match_id: record.match_id,
            outcome,
            pool_ns,
            pool_ew,
            delta_ns,
            delta_ew,
        })
    }

    /// Replay `matches` in order against the in-memory store.
    ///
    /// Stops at the first failing match; matches before it stay applied.
    pub fn run(&self, matches: &[MatchRecord], store: &mut RatingStore) -> Result<RunSummary> {
        info!(
            "Rating {} matches for {} participants",
            matches.len(),
            store.len()
        );

        let mut summary = RunSummary::default();
        for record in matches {
            let update = self.process_match(record, store).map_err(|e| {
                error!("Rating pass halted at match {}: {}", record.match_id, e);
                e
            })?;
            summary.record(update.outcome);
        }

        info!(
            "Rated {} matches ({} NS wins, {} EW wins, {} draws)",
            summary.matches_processed, summary.ns_wins, summary.ew_wins, summary.draws
        );
        Ok(summary)
    }

    /// Run the full pass, then persist the store with a single bulk write.
    ///
    /// The repository is not touched if the pass fails.
    pub fn run_and_persist(
        &self,
        matches: &[MatchRecord],
        store: &mut RatingStore,
        repository: &mut dyn RatingRepository,
    ) -> Result<RunSummary> {
        let summary = self.run(matches, store)?;
        store.flush(repository)?;
        Ok(summary)
    }
}
