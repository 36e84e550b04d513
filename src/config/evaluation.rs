//! Evaluation configuration

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Share of sessions, latest first, held out from training
    pub holdout_fraction: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            holdout_fraction: 0.2,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.holdout_fraction) {
            return Err(RatingError::Configuration {
                message: format!(
                    "Holdout fraction must be in [0, 1), got {}",
                    self.holdout_fraction
                ),
            }
            .into());
        }

        Ok(())
    }
}
