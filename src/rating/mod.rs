//! Partnership rating: storage, the pairwise Elo update and the engine
//!
//! This module provides the in-memory rating store with its durable
//! repositories, the pairwise calculator built on the skillratings crate, and
//! the sequential engine that replays matches against the store.

pub mod calculator;
pub mod elo;
pub mod engine;
pub mod storage;

// Re-export commonly used types
pub use calculator::PairwiseRater;
pub use elo::{EloRatingCalculator, EloSettings};
pub use engine::{MatchUpdate, RatingEngine, RunSummary};
pub use storage::{
    InMemoryRepository, JsonFileRepository, RatingEntry, RatingRepository, RatingStore,
};
