//! Common types used throughout the rating pipeline

use crate::error::{RatingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skillratings::Outcomes;
use std::str::FromStr;

/// Stable numeric identifier for a player (ACBL number)
pub type ParticipantId = u64;

/// Identifier of the club session a match was played in
pub type SessionId = String;

/// One of the two partnerships seated at a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    NorthSouth,
    EastWest,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::NorthSouth => write!(f, "NS"),
            Side::EastWest => write!(f, "EW"),
        }
    }
}

/// Result of a match from the north-south perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    NsWins,
    EwWins,
    Draw,
}

impl Outcome {
    /// Derive the outcome by comparing the two side scores.
    ///
    /// An exact tie is a draw. Scores that cannot be ordered (NaN) are
    /// rejected rather than silently treated as a draw.
    pub fn from_scores(ns_score: f64, ew_score: f64) -> Result<Self> {
        match ns_score.partial_cmp(&ew_score) {
            Some(std::cmp::Ordering::Greater) => Ok(Outcome::NsWins),
            Some(std::cmp::Ordering::Less) => Ok(Outcome::EwWins),
            Some(std::cmp::Ordering::Equal) => Ok(Outcome::Draw),
            None => Err(RatingError::InvalidOutcome {
                tag: format!("{} vs {}", ns_score, ew_score),
            }
            .into()),
        }
    }

    /// Actual score for the north-south side: 1, 0.5 or 0
    pub fn ns_score(self) -> f64 {
        match self {
            Outcome::NsWins => 1.0,
            Outcome::Draw => 0.5,
            Outcome::EwWins => 0.0,
        }
    }

    /// Winning side, if any
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::NsWins => Some(Side::NorthSouth),
            Outcome::EwWins => Some(Side::EastWest),
            Outcome::Draw => None,
        }
    }

    /// The same result seen from the other side of the table
    pub fn reversed(self) -> Self {
        match self {
            Outcome::NsWins => Outcome::EwWins,
            Outcome::EwWins => Outcome::NsWins,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

impl From<Outcome> for Outcomes {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NsWins => Outcomes::WIN,
            Outcome::EwWins => Outcomes::LOSS,
            Outcome::Draw => Outcomes::DRAW,
        }
    }
}

impl FromStr for Outcome {
    type Err = RatingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NS" | "NS_WINS" | "A_WINS" => Ok(Outcome::NsWins),
            "EW" | "EW_WINS" | "B_WINS" => Ok(Outcome::EwWins),
            "DRAW" | "TIE" => Ok(Outcome::Draw),
            _ => Err(RatingError::InvalidOutcome { tag: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::NsWins => write!(f, "NS_WINS"),
            Outcome::EwWins => write!(f, "EW_WINS"),
            Outcome::Draw => write!(f, "DRAW"),
        }
    }
}

/// Two players sitting in the same direction for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partnership(pub ParticipantId, pub ParticipantId);

impl Partnership {
    pub fn members(&self) -> [ParticipantId; 2] {
        [self.0, self.1]
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.0 == id || self.1 == id
    }
}

/// One board result between two partnerships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    pub north_south: Partnership,
    pub east_west: Partnership,
    /// Matchpoints scored by north-south
    pub ns_score: f64,
    /// Matchpoints scored by east-west
    pub ew_score: f64,
    /// Partition key used for hold-out splits
    pub session: Option<SessionId>,
    pub played_on: Option<NaiveDate>,
}

impl MatchRecord {
    pub fn new(
        match_id: u64,
        north_south: Partnership,
        east_west: Partnership,
        ns_score: f64,
        ew_score: f64,
    ) -> Self {
        Self {
            match_id,
            north_south,
            east_west,
            ns_score,
            ew_score,
            session: None,
            played_on: None,
        }
    }

    pub fn with_session(mut self, session: impl Into<SessionId>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_date(mut self, played_on: NaiveDate) -> Self {
        self.played_on = Some(played_on);
        self
    }

    pub fn outcome(&self) -> Result<Outcome> {
        Outcome::from_scores(self.ns_score, self.ew_score)
    }

    pub fn partnership(&self, side: Side) -> Partnership {
        match side {
            Side::NorthSouth => self.north_south,
            Side::EastWest => self.east_west,
        }
    }

    /// All four participants in seat order: ns1, ns2, ew1, ew2
    pub fn participants(&self) -> [ParticipantId; 4] {
        [
            self.north_south.0,
            self.north_south.1,
            self.east_west.0,
            self.east_west.1,
        ]
    }

    /// Check that four distinct players are seated
    pub fn validate(&self) -> Result<()> {
        let ids = self.participants();
        for (i, id) in ids.iter().enumerate() {
            if ids[i + 1..].contains(id) {
                return Err(RatingError::InvalidMatch {
                    match_id: self.match_id,
                    reason: format!("participant {} is seated twice", id),
                }
                .into());
            }
        }
        Ok(())
    }
}
