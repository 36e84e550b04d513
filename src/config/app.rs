//! Main application configuration
//!
//! This module defines the top-level configuration for the rating tool,
//! including TOML file loading, environment variable overrides and
//! validation.

use crate::config::{EvaluationConfig, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub evaluation: EvaluationConfig,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where inputs are read from and ratings are written to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Game document file, or a directory of them
    pub games_path: PathBuf,
    /// Rating table written after training
    pub ratings_path: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "partnership-elo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            games_path: PathBuf::from("data/games"),
            ratings_path: PathBuf::from("data/ratings.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load a TOML configuration file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| anyhow!("Failed to parse TOML: {}", e))
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(baseline) = env::var("BASELINE_RATING") {
            self.rating.baseline_rating = baseline
                .parse()
                .map_err(|_| anyhow!("Invalid BASELINE_RATING value: {}", baseline))?;
        }
        if let Ok(k_factor) = env::var("K_FACTOR") {
            self.rating.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(scale) = env::var("UPDATE_SCALE") {
            self.rating.update_scale = scale
                .parse()
                .map_err(|_| anyhow!("Invalid UPDATE_SCALE value: {}", scale))?;
        }
        if let Ok(fraction) = env::var("HOLDOUT_FRACTION") {
            self.evaluation.holdout_fraction = fraction
                .parse()
                .map_err(|_| anyhow!("Invalid HOLDOUT_FRACTION value: {}", fraction))?;
        }
        if let Ok(path) = env::var("GAMES_PATH") {
            self.storage.games_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("RATINGS_PATH") {
            self.storage.ratings_path = PathBuf::from(path);
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    config.rating.validate()?;
    config.evaluation.validate()?;

    if config.storage.ratings_path.as_os_str().is_empty() {
        return Err(anyhow!("Ratings path cannot be empty"));
    }

    Ok(())
}
