//! Match stream construction from club game documents
//!
//! This module turns raw game documents into the ordered sequence of match
//! records consumed by the rating engine, together with the full player
//! universe and the masterpoint signal used for evaluation.

pub mod builder;
pub mod document;
pub mod loader;

// Re-export commonly used types
pub use builder::{MatchStream, MatchStreamBuilder, RecordOutcome, SkipReason, SkippedRecord};
pub use document::GameDocument;
pub use loader::{load_documents, LoadReport};
