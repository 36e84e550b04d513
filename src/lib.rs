//! Partnership Elo - skill ratings for duplicate bridge club players
//!
//! This crate replays historical board results through a partnership-pooled
//! Elo engine and compares the resulting ratings with masterpoint totals as
//! predictors of match winners.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod rating;
pub mod service;
pub mod stream;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{PairwiseRater, RatingEngine, RatingRepository, RatingStore};
pub use service::RatingPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
