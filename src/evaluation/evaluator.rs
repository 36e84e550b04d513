//! Predictive evaluation of player signals on held-out matches
//!
//! Each signal assigns a number to every player. For a match, the side with
//! the higher pooled (mean) value is predicted to win. Drawn matches are
//! excluded from scoring and counted separately. An exact tie between the
//! pools gives an undefined prediction, which is counted and never scored as
//! correct.

use crate::error::{RatingError, Result};
use crate::evaluation::statistics::{spearman, Correlation};
use crate::rating::storage::RatingEntry;
use crate::types::{MatchRecord, ParticipantId, Partnership, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// A per-player value used to predict match winners
#[derive(Debug, Clone, Default)]
pub struct Signal {
    pub name: String,
    values: HashMap<ParticipantId, f64>,
}

impl Signal {
    pub fn new(name: impl Into<String>, values: HashMap<ParticipantId, f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Ratings signal from a store snapshot
    pub fn from_snapshot(name: impl Into<String>, snapshot: &[RatingEntry]) -> Self {
        Self::new(
            name,
            snapshot
                .iter()
                .map(|entry| (entry.participant_id, entry.rating))
                .collect(),
        )
    }

    pub fn get(&self, participant_id: ParticipantId) -> Result<f64> {
        self.values
            .get(&participant_id)
            .copied()
            .ok_or_else(|| RatingError::NotFound { participant_id }.into())
    }

    /// Mean value of the two partners
    pub fn pool(&self, partnership: Partnership) -> Result<f64> {
        Ok((self.get(partnership.0)? + self.get(partnership.1)?) / 2.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Predicted winner from the two pooled values; `None` on an exact tie
pub fn predict_winner(pool_ns: f64, pool_ew: f64) -> Option<Side> {
    if pool_ns > pool_ew {
        Some(Side::NorthSouth)
    } else if pool_ew > pool_ns {
        Some(Side::EastWest)
    } else {
        None
    }
}

/// How well one signal predicted the decided matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub name: String,
    /// Correct predictions over decided matches, in `[0, 1]`
    pub accuracy: f64,
    pub correct: usize,
    /// Matches where both pools were exactly equal
    pub undefined: usize,
    /// Share of decided matches where this signal picked North-South
    pub predicted_ns_rate: f64,
    /// Spearman correlation of pool difference against score difference
    pub correlation: Option<Correlation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub matches: usize,
    /// Matches with a winner; the accuracy denominator for both signals
    pub decided: usize,
    /// Matches with equal scores, excluded from scoring
    pub drawn: usize,
    /// Share of decided matches won by North-South, the accuracy of always
    /// predicting North-South
    pub ns_win_rate: f64,
    pub rating: SignalReport,
    pub alternative: SignalReport,
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[derive(Debug, Default)]
struct SignalTally {
    correct: usize,
    undefined: usize,
    predicted_ns: usize,
    pool_differences: Vec<f64>,
    score_differences: Vec<f64>,
}

impl SignalTally {
    fn observe(
        &mut self,
        signal: &Signal,
        record: &MatchRecord,
        winner: Side,
        score_difference: Option<f64>,
    ) -> Result<()> {
        let pool_ns = signal.pool(record.north_south)?;
        let pool_ew = signal.pool(record.east_west)?;

        match predict_winner(pool_ns, pool_ew) {
            Some(predicted) => {
                if predicted == Side::NorthSouth {
                    self.predicted_ns += 1;
                }
                if predicted == winner {
                    self.correct += 1;
                }
            }
            None => self.undefined += 1,
        }
        if let Some(score_difference) = score_difference {
            self.pool_differences.push(pool_ns - pool_ew);
            self.score_differences.push(score_difference);
        }
        Ok(())
    }

    fn report(self, name: &str, decided: usize) -> SignalReport {
        SignalReport {
            name: name.to_string(),
            accuracy: rate(self.correct, decided),
            correct: self.correct,
            undefined: self.undefined,
            predicted_ns_rate: rate(self.predicted_ns, decided),
            correlation: spearman(&self.pool_differences, &self.score_differences),
        }
    }
}

/// Score difference as a share of the matchpoints on the table.
///
/// `None` when the table total is not positive; such matches still count for
/// accuracy but stay out of the rank correlation.
fn normalized_score_difference(record: &MatchRecord) -> Option<f64> {
    let total = record.ns_score + record.ew_score;
    (total > 0.0).then(|| (record.ns_score - record.ew_score) / total)
}

/// Compare how well `ratings` and `alternative` predict the winners of `matches`
pub fn evaluate(
    matches: &[MatchRecord],
    ratings: &Signal,
    alternative: &Signal,
) -> Result<EvaluationReport> {
    let mut rating_tally = SignalTally::default();
    let mut alternative_tally = SignalTally::default();
    let mut decided = 0;
    let mut ns_wins = 0;
    let mut drawn = 0;

    for record in matches {
        let Some(winner) = record.outcome()?.winner() else {
            drawn += 1;
            continue;
        };

        decided += 1;
        if winner == Side::NorthSouth {
            ns_wins += 1;
        }
        let score_difference = normalized_score_difference(record);
        rating_tally.observe(ratings, record, winner, score_difference)?;
        alternative_tally.observe(alternative, record, winner, score_difference)?;
    }

    let report = EvaluationReport {
        matches: matches.len(),
        decided,
        drawn,
        ns_win_rate: rate(ns_wins, decided),
        rating: rating_tally.report(&ratings.name, decided),
        alternative: alternative_tally.report(&alternative.name, decided),
    };

    info!(
        "Evaluated {} matches ({} drawn): {} accuracy {:.3}, {} accuracy {:.3}",
        report.matches,
        report.drawn,
        report.rating.name,
        report.rating.accuracy,
        report.alternative.name,
        report.alternative.accuracy
    );
    Ok(report)
}
