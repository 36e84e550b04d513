//! Evaluation of rating quality on held-out sessions
//!
//! This module provides the session-based split, winner-prediction accuracy
//! and Spearman rank correlation against an alternative player signal.

pub mod evaluator;
pub mod split;
pub mod statistics;

// Re-export commonly used types
pub use evaluator::{evaluate, predict_winner, EvaluationReport, Signal, SignalReport};
pub use split::SessionSplit;
pub use statistics::{spearman, Correlation};
