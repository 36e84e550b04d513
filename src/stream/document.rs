//! Club game documents as published by the results site
//!
//! A document holds sessions, each session holds sections, and each section
//! lists its pair summaries (who sat where) and its boards (per-table
//! results referring to pairs by number). Identifiers appear as either JSON
//! strings or numbers and are normalized to strings here.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameDocument {
    #[serde(default)]
    pub sessions: Vec<SessionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub sections: Vec<SectionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDocument {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub pair_summaries: Vec<PairSummary>,
    #[serde(default)]
    pub boards: Vec<BoardDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSummary {
    #[serde(deserialize_with = "id_string")]
    pub pair_number: String,
    pub direction: String,
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(deserialize_with = "id_string")]
    pub id_number: String,
    #[serde(default)]
    pub masterpoints: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default)]
    pub board_results: Vec<BoardResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResult {
    pub id: u64,
    #[serde(default)]
    pub board_id: Option<u64>,
    #[serde(deserialize_with = "id_string")]
    pub ns_pair: String,
    #[serde(deserialize_with = "id_string")]
    pub ew_pair: String,
    pub ns_match_points: f64,
    pub ew_match_points: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text.trim().to_string(),
        RawId::Number(number) => number.to_string(),
    })
}
