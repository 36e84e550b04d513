//! Session-based hold-out split
//!
//! Whole sessions are held out so that no board of a test session leaks into
//! training. The held-out sessions are the last ones to appear in the
//! (chronologically ordered) stream.

use crate::error::{RatingError, Result};
use crate::types::{MatchRecord, SessionId};
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct SessionSplit {
    pub train: Vec<MatchRecord>,
    pub test: Vec<MatchRecord>,
    pub holdout_sessions: Vec<SessionId>,
}

impl SessionSplit {
    /// Hold out `round(sessions * holdout_fraction)` of the latest sessions.
    ///
    /// At least one session always stays in training. Records without a
    /// session key are always training records. Stream order is kept in both
    /// partitions.
    pub fn by_fraction(matches: &[MatchRecord], holdout_fraction: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&holdout_fraction) {
            return Err(RatingError::Configuration {
                message: format!(
                    "Holdout fraction must be in [0, 1), got {}",
                    holdout_fraction
                ),
            }
            .into());
        }

        let mut sessions: Vec<&SessionId> = Vec::new();
        let mut seen = HashSet::new();
        for session in matches.iter().filter_map(|m| m.session.as_ref()) {
            if seen.insert(session) {
                sessions.push(session);
            }
        }

        let holdout_count = ((sessions.len() as f64 * holdout_fraction).round() as usize)
            .min(sessions.len().saturating_sub(1));
        let holdout_sessions: Vec<SessionId> = sessions[sessions.len() - holdout_count..]
            .iter()
            .map(|&session| session.clone())
            .collect();

        Ok(Self::by_sessions(matches, holdout_sessions))
    }

    /// Hold out an explicit list of sessions
    pub fn by_sessions(matches: &[MatchRecord], holdout_sessions: Vec<SessionId>) -> Self {
        let holdout: HashSet<&SessionId> = holdout_sessions.iter().collect();
        let (test, train): (Vec<MatchRecord>, Vec<MatchRecord>) =
            matches.iter().cloned().partition(|m| {
                m.session
                    .as_ref()
                    .is_some_and(|session| holdout.contains(session))
            });

        info!(
            "Split {} matches: {} train, {} test ({} held-out sessions)",
            matches.len(),
            train.len(),
            test.len(),
            holdout_sessions.len()
        );

        Self {
            train,
            test,
            holdout_sessions,
        }
    }
}
