//! Test fixtures for integration testing
//!
//! Builders for game documents in the club export format plus small helpers
//! for match records and seeded rating stores.

#![allow(dead_code)]

use partnership_elo::config::AppConfig;
use partnership_elo::rating::RatingStore;
use partnership_elo::types::{MatchRecord, Partnership};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One session of one section, built up pair by pair and result by result
#[derive(Debug, Clone)]
pub struct SessionFixture {
    id: String,
    start_date: Option<String>,
    pairs: Vec<Value>,
    results: Vec<Value>,
}

impl SessionFixture {
    pub fn new(id: &str, start_date: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            start_date: start_date.map(str::to_string),
            pairs: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Seat a pair; each player is `(id_number, masterpoints)`
    pub fn pair(mut self, number: u32, direction: &str, players: [(u64, f64); 2]) -> Self {
        self.pairs.push(json!({
            "pair_number": number,
            "direction": direction,
            "players": players
                .iter()
                .map(|(id, mp)| json!({ "id_number": id.to_string(), "masterpoints": mp }))
                .collect::<Vec<_>>(),
        }));
        self
    }

    pub fn result(mut self, id: u64, ns_pair: u32, ew_pair: u32, ns: f64, ew: f64) -> Self {
        self.results.push(json!({
            "id": id,
            "board_id": id % 27 + 1,
            "ns_pair": ns_pair.to_string(),
            "ew_pair": ew_pair.to_string(),
            "ns_match_points": ns,
            "ew_match_points": ew,
        }));
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "start_date": self.start_date,
            "sections": [{
                "id": "A",
                "pair_summaries": self.pairs,
                "boards": [{ "board_results": self.results }],
            }],
        })
    }
}

/// Standard four-player table: pairs 1 (NS: 1, 2) and 2 (EW: 3, 4)
pub fn four_player_session(id: &str, start_date: &str) -> SessionFixture {
    SessionFixture::new(id, Some(start_date))
        .pair(1, "NS", [(1, 500.0), (2, 300.0)])
        .pair(2, "EW", [(3, 20.0), (4, 10.0)])
}

pub fn game_document(sessions: &[SessionFixture]) -> Value {
    json!({ "sessions": sessions.iter().map(SessionFixture::to_json).collect::<Vec<_>>() })
}

/// Write a game document into `dir` and return its path
pub fn write_document(dir: &Path, name: &str, sessions: &[SessionFixture]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, game_document(sessions).to_string()).unwrap();
    path
}

/// Default configuration pointed at a games directory and a ratings file
pub fn config_for(games_path: &Path, ratings_path: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.games_path = games_path.to_path_buf();
    config.storage.ratings_path = ratings_path.to_path_buf();
    config
}

/// Match between pairs (1, 2) and (3, 4)
pub fn table(id: u64, ns_score: f64, ew_score: f64) -> MatchRecord {
    MatchRecord::new(id, Partnership(1, 2), Partnership(3, 4), ns_score, ew_score)
}

pub fn baseline_store(ids: &[u64]) -> RatingStore {
    let ids: BTreeSet<u64> = ids.iter().copied().collect();
    let mut store = RatingStore::new();
    store.initialize(&ids, 1200.0).unwrap();
    store
}
