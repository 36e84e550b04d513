//! Logistic (Elo) pairwise rating update
//!
//! Wraps the Elo implementation of the skillratings crate. With expected
//! score `E_a = 1 / (1 + 10^((r_b - r_a) / 400))` and actual score
//! `S_a` in {1, 0.5, 0}, each side moves by `K * (S - E)`. Because
//! `E_a + E_b == 1` and `S_a + S_b == 1` the update is zero-sum.

use crate::error::{RatingError, Result};
use crate::rating::calculator::PairwiseRater;
use crate::types::Outcome;
use serde::{Deserialize, Serialize};
use skillratings::elo::{elo, expected_score, EloConfig, EloRating};

/// Configuration for the Elo calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloSettings {
    /// Sensitivity constant `K`
    pub k_factor: f64,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self { k_factor: 32.0 }
    }
}

impl EloSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::Configuration {
                message: format!("K factor must be positive, got {}", self.k_factor),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    settings: EloSettings,
    config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(settings: EloSettings) -> Result<Self> {
        settings.validate()?;

        let config = EloConfig {
            k: settings.k_factor,
        };
        Ok(Self { settings, config })
    }

    pub fn k_factor(&self) -> f64 {
        self.settings.k_factor
    }
}

impl PairwiseRater for EloRatingCalculator {
    fn rate(&self, rating_a: f64, rating_b: f64, outcome: Outcome) -> (f64, f64) {
        let (new_a, new_b) = elo(
            &EloRating { rating: rating_a },
            &EloRating { rating: rating_b },
            &outcome.into(),
            &self.config,
        );

        (new_a.rating, new_b.rating)
    }

    fn expected_score(&self, rating_a: f64, rating_b: f64) -> (f64, f64) {
        expected_score(
            &EloRating { rating: rating_a },
            &EloRating { rating: rating_b },
        )
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.settings).unwrap_or(serde_json::Value::Null)
    }
}
