//! Pairwise rating calculator trait
//!
//! A pairwise calculator takes the ratings of two competing sides and an
//! explicit outcome and returns both updated ratings. Implementations must be
//! pure: the same inputs always produce the same outputs.

use crate::error::Result;
use crate::types::Outcome;

/// Trait for two-sided rating updates
pub trait PairwiseRater {
    /// Updated ratings for sides A and B after `outcome` (seen from side A)
    fn rate(&self, rating_a: f64, rating_b: f64, outcome: Outcome) -> (f64, f64);

    /// Expected scores of sides A and B; the two values sum to one
    fn expected_score(&self, rating_a: f64, rating_b: f64) -> (f64, f64);

    /// Same as [`PairwiseRater::rate`] for an outcome given as a text tag.
    ///
    /// An unrecognized tag rejects the computation with `InvalidOutcome`.
    fn rate_tagged(&self, rating_a: f64, rating_b: f64, tag: &str) -> Result<(f64, f64)> {
        let outcome: Outcome = tag.parse()?;
        Ok(self.rate(rating_a, rating_b, outcome))
    }

    /// Current configuration as JSON
    fn config(&self) -> serde_json::Value;
}
