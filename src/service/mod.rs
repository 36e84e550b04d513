//! Service layer for the rating tool
//!
//! This module coordinates loading, training, persistence and evaluation.

pub mod app;

pub use app::{ExperimentReport, RatingPipeline, ALTERNATIVE_SIGNAL, RATING_SIGNAL};
