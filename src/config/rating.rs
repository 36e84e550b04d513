//! Rating system configuration

use crate::error::{RatingError, Result};
use crate::rating::elo::EloSettings;
use serde::{Deserialize, Serialize};

/// Parameters of the rating pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating every participant starts from
    pub baseline_rating: f64,
    /// Elo sensitivity constant
    pub k_factor: f64,
    /// Multiplier applied to each pool delta before it is distributed
    pub update_scale: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            baseline_rating: 1200.0,
            k_factor: 32.0,
            update_scale: 1.0,
        }
    }
}

impl RatingConfig {
    pub fn elo_settings(&self) -> EloSettings {
        EloSettings {
            k_factor: self.k_factor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.baseline_rating.is_finite() {
            return Err(RatingError::Configuration {
                message: "Baseline rating must be finite".to_string(),
            }
            .into());
        }

        self.elo_settings().validate()?;

        if !self.update_scale.is_finite() || self.update_scale <= 0.0 {
            return Err(RatingError::Configuration {
                message: "Update scale must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
