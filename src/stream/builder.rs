//! Match stream builder
//!
//! Joins every board result with the pair summaries of its section to seat
//! four players, and orders the resulting records for the rating pass:
//! sessions by start date (undated sessions last), then session id (numeric
//! ids compared as numbers), then board result id. Each board result yields
//! either an accepted record or a skip with an explicit reason; nothing is
//! dropped silently.

use crate::stream::document::{GameDocument, PairSummary, SectionDocument, SessionDocument};
use crate::types::{MatchRecord, ParticipantId, Partnership, SessionId, Side};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Why a board result or pair summary could not be used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum SkipReason {
    #[error("no {side} pair numbered {pair_number} in section")]
    UnknownPair { side: Side, pair_number: String },

    #[error("pair {pair_number} has {count} players, expected 2")]
    IncompletePair { pair_number: String, count: usize },

    #[error("invalid player number {value:?}")]
    InvalidIdentity { value: String },

    #[error("unknown direction {value:?}")]
    UnknownDirection { value: String },

    #[error("player {participant_id} is seated twice")]
    DuplicateSeat { participant_id: ParticipantId },

    #[error("non-finite matchpoints")]
    NonFiniteScore,

    #[error("board result already seen")]
    DuplicateResult,
}

/// A board result that did not make it into the stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub match_id: u64,
    pub session: SessionId,
    pub reason: SkipReason,
}

/// Per-record result of the join
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Accepted(MatchRecord),
    Skipped(SkippedRecord),
}

/// Ordered match stream plus the data derived alongside it
#[derive(Debug, Clone, Default)]
pub struct MatchStream {
    pub matches: Vec<MatchRecord>,
    pub skipped: Vec<SkippedRecord>,
    /// Every player listed in a usable pair summary, whether or not they
    /// appear in an accepted match
    pub participants: BTreeSet<ParticipantId>,
    /// Latest masterpoint total seen per player
    pub masterpoints: HashMap<ParticipantId, f64>,
}

impl MatchStream {
    /// Masterpoint total for every participant; players listed without a
    /// total count as zero
    pub fn masterpoint_values(&self) -> HashMap<ParticipantId, f64> {
        self.participants
            .iter()
            .map(|&id| (id, self.masterpoints.get(&id).copied().unwrap_or(0.0)))
            .collect()
    }
}

/// Collects game documents and builds the ordered match stream
#[derive(Debug, Default)]
pub struct MatchStreamBuilder {
    sessions: Vec<SessionDocument>,
}

type PairKey = (String, Side);

impl MatchStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: GameDocument) -> &mut Self {
        self.sessions.extend(document.sessions);
        self
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Join and order everything added so far
    pub fn build(mut self) -> MatchStream {
        self.sessions.sort_by(|a, b| {
            (a.start_date.is_none(), a.start_date)
                .cmp(&(b.start_date.is_none(), b.start_date))
                .then_with(|| session_id_key(&a.id).cmp(&session_id_key(&b.id)))
        });

        let mut stream = MatchStream::default();
        let mut seen_results = HashSet::new();

        for session in &self.sessions {
            let mut outcomes = Vec::new();
            for section in &session.sections {
                outcomes.extend(join_section(session, section, &mut stream));
            }

            outcomes.sort_by_key(|outcome| match outcome {
                RecordOutcome::Accepted(record) => record.match_id,
                RecordOutcome::Skipped(skipped) => skipped.match_id,
            });

            for outcome in outcomes {
                match outcome {
                    RecordOutcome::Accepted(record) => {
                        if seen_results.insert(record.match_id) {
                            stream.matches.push(record);
                        } else {
                            stream.skipped.push(SkippedRecord {
                                match_id: record.match_id,
                                session: session.id.clone(),
                                reason: SkipReason::DuplicateResult,
                            });
                        }
                    }
                    RecordOutcome::Skipped(skipped) => {
                        debug!(
                            "Skipping board result {} in session {}: {}",
                            skipped.match_id, skipped.session, skipped.reason
                        );
                        stream.skipped.push(skipped);
                    }
                }
            }
        }

        if !stream.skipped.is_empty() {
            warn!(
                "Skipped {} board results while building the match stream",
                stream.skipped.len()
            );
        }
        info!(
            "Built match stream: {} matches, {} participants, {} sessions",
            stream.matches.len(),
            stream.participants.len(),
            self.sessions.len()
        );

        stream
    }
}

/// Numeric session ids sort as numbers, ahead of any non-numeric id
fn session_id_key(id: &str) -> (bool, Option<u64>, &str) {
    let number = id.parse::<u64>().ok();
    (number.is_none(), number, id)
}

fn parse_direction(value: &str) -> Result<Side, SkipReason> {
    match value.replace('-', "").to_ascii_uppercase().as_str() {
        "NS" => Ok(Side::NorthSouth),
        "EW" => Ok(Side::EastWest),
        _ => Err(SkipReason::UnknownDirection {
            value: value.to_string(),
        }),
    }
}

fn parse_identity(value: &str) -> Result<ParticipantId, SkipReason> {
    value.parse().map_err(|_| SkipReason::InvalidIdentity {
        value: value.to_string(),
    })
}

fn seat_pair(pair: &PairSummary) -> Result<Partnership, SkipReason> {
    if pair.players.len() != 2 {
        return Err(SkipReason::IncompletePair {
            pair_number: pair.pair_number.clone(),
            count: pair.players.len(),
        });
    }

    let first = parse_identity(&pair.players[0].id_number)?;
    let second = parse_identity(&pair.players[1].id_number)?;
    if first == second {
        return Err(SkipReason::DuplicateSeat {
            participant_id: first,
        });
    }

    Ok(Partnership(first, second))
}

/// Seat every board result of one section
fn join_section(
    session: &SessionDocument,
    section: &SectionDocument,
    stream: &mut MatchStream,
) -> Vec<RecordOutcome> {
    let mut pairs: HashMap<PairKey, Result<Partnership, SkipReason>> = HashMap::new();

    for pair in &section.pair_summaries {
        let side = match parse_direction(&pair.direction) {
            Ok(side) => side,
            Err(reason) => {
                warn!(
                    "Ignoring pair {} in session {} section {}: {}",
                    pair.pair_number, session.id, section.id, reason
                );
                // Results naming this pair report the direction, unless a
                // well-formed summary claims the same number and side
                for side in [Side::NorthSouth, Side::EastWest] {
                    pairs
                        .entry((pair.pair_number.clone(), side))
                        .or_insert_with(|| Err(reason.clone()));
                }
                continue;
            }
        };

        let seated = seat_pair(pair);
        if let Ok(partnership) = &seated {
            for (player, id) in pair.players.iter().zip(partnership.members()) {
                stream.participants.insert(id);
                if let Some(masterpoints) = player.masterpoints {
                    stream.masterpoints.insert(id, masterpoints);
                }
            }
        }
        pairs.insert((pair.pair_number.clone(), side), seated);
    }

    let lookup = |pair_number: &str, side: Side| -> Result<Partnership, SkipReason> {
        match pairs.get(&(pair_number.to_string(), side)) {
            Some(seated) => seated.clone(),
            None => Err(SkipReason::UnknownPair {
                side,
                pair_number: pair_number.to_string(),
            }),
        }
    };

    let mut outcomes = Vec::new();
    for board in &section.boards {
        for result in &board.board_results {
            let joined = lookup(&result.ns_pair, Side::NorthSouth).and_then(|north_south| {
                let east_west = lookup(&result.ew_pair, Side::EastWest)?;
                if !result.ns_match_points.is_finite() || !result.ew_match_points.is_finite() {
                    return Err(SkipReason::NonFiniteScore);
                }

                let mut record = MatchRecord::new(
                    result.id,
                    north_south,
                    east_west,
                    result.ns_match_points,
                    result.ew_match_points,
                )
                .with_session(session.id.clone());
                record.played_on = session.start_date;

                if let Some(participant_id) = east_west
                    .members()
                    .into_iter()
                    .find(|&id| north_south.contains(id))
                {
                    return Err(SkipReason::DuplicateSeat { participant_id });
                }

                Ok(record)
            });

            outcomes.push(match joined {
                Ok(record) => RecordOutcome::Accepted(record),
                Err(reason) => RecordOutcome::Skipped(SkippedRecord {
                    match_id: result.id,
                    session: session.id.clone(),
                    reason,
                }),
            });
        }
    }

    outcomes
}
