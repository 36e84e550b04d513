//! Rating storage: the in-memory store used during a pass and the durable
//! repository it is loaded from and flushed to.
//!
//! The engine only ever touches [`RatingStore`]. Durable storage is reached
//! through [`RatingRepository`] exactly twice per run: one bulk read when the
//! store is built and one bulk write when it is flushed.

use crate::error::{RatingError, Result};
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Storage entry for a participant's rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub participant_id: ParticipantId,
    pub rating: f64,
    pub games_played: u64,
}

impl RatingEntry {
    /// Create a new entry for a participant who has not played yet
    pub fn new(participant_id: ParticipantId, baseline: f64) -> Self {
        Self {
            participant_id,
            rating: baseline,
            games_played: 0,
        }
    }

    /// Add a rating delta and count the game
    pub fn apply_delta(&mut self, delta: f64) {
        self.rating += delta;
        self.games_played += 1;
    }
}

/// Durable storage for the rating table
#[cfg_attr(test, mockall::automock)]
pub trait RatingRepository {
    /// Read the whole table
    fn load_all(&self) -> Result<Vec<RatingEntry>>;

    /// Replace the whole table in one operation
    fn persist_all(&mut self, entries: &[RatingEntry]) -> Result<()>;
}

/// In-memory rating table mutated during a rating pass
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    entries: HashMap<ParticipantId, RatingEntry>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a previously persisted table
    pub fn from_repository(repository: &dyn RatingRepository) -> Result<Self> {
        let mut store = Self::new();
        for entry in repository.load_all()? {
            if store.entries.contains_key(&entry.participant_id) {
                return Err(RatingError::DuplicateKey {
                    participant_id: entry.participant_id,
                }
                .into());
            }
            store.entries.insert(entry.participant_id, entry);
        }

        info!("Loaded {} ratings from repository", store.len());
        Ok(store)
    }

    /// Insert every identity at the baseline rating with zero games.
    ///
    /// The batch is checked before anything is inserted, so a rejected call
    /// leaves the store unchanged.
    pub fn initialize(&mut self, ids: &BTreeSet<ParticipantId>, baseline: f64) -> Result<()> {
        if !baseline.is_finite() {
            return Err(RatingError::Configuration {
                message: format!("Baseline rating must be finite, got {}", baseline),
            }
            .into());
        }

        if let Some(&participant_id) = ids.iter().find(|id| self.entries.contains_key(id)) {
            return Err(RatingError::DuplicateKey { participant_id }.into());
        }

        for &id in ids {
            self.entries.insert(id, RatingEntry::new(id, baseline));
        }

        debug!(
            "Initialized {} participants at baseline {}",
            ids.len(),
            baseline
        );
        Ok(())
    }

    /// Drop every entry
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Current rating of a participant
    pub fn get(&self, participant_id: ParticipantId) -> Result<f64> {
        self.entry(participant_id).map(|entry| entry.rating)
    }

    pub fn entry(&self, participant_id: ParticipantId) -> Result<&RatingEntry> {
        self.entries
            .get(&participant_id)
            .ok_or_else(|| RatingError::NotFound { participant_id }.into())
    }

    /// Add `delta` to the participant's rating and count one game
    pub fn apply_delta(&mut self, participant_id: ParticipantId, delta: f64) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&participant_id)
            .ok_or(RatingError::NotFound { participant_id })?;
        entry.apply_delta(delta);
        Ok(())
    }

    pub fn contains(&self, participant_id: ParticipantId) -> bool {
        self.entries.contains_key(&participant_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by participant id
    pub fn snapshot(&self) -> Vec<RatingEntry> {
        let mut entries: Vec<RatingEntry> = self.entries.values().cloned().collect();
        entries.sort_by_key(|entry| entry.participant_id);
        entries
    }

    /// Participant id to rating, for use as an evaluation signal
    pub fn ratings(&self) -> HashMap<ParticipantId, f64> {
        self.entries
            .iter()
            .map(|(&id, entry)| (id, entry.rating))
            .collect()
    }

    /// Write the whole table to durable storage in one bulk operation
    pub fn flush(&self, repository: &mut dyn RatingRepository) -> Result<()> {
        let snapshot = self.snapshot();
        repository.persist_all(&snapshot)?;
        info!("Flushed {} ratings to repository", snapshot.len());
        Ok(())
    }
}

/// Rating table stored as a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RatingRepository for JsonFileRepository {
    fn load_all(&self) -> Result<Vec<RatingEntry>> {
        let file = File::open(&self.path).map_err(|e| RatingError::Persistence {
            message: format!("Failed to open {}: {}", self.path.display(), e),
        })?;

        let entries: Vec<RatingEntry> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                RatingError::Persistence {
                    message: format!("Failed to parse {}: {}", self.path.display(), e),
                }
            })?;

        Ok(entries)
    }

    fn persist_all(&mut self, entries: &[RatingEntry]) -> Result<()> {
        // Write next to the target and rename so readers never see a partial table
        let staging = self.staging_path();
        let write = || -> std::io::Result<()> {
            {
                let mut writer = BufWriter::new(File::create(&staging)?);
                serde_json::to_writer_pretty(&mut writer, entries)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            std::fs::rename(&staging, &self.path)
        };

        write().map_err(|e| {
            let _ = std::fs::remove_file(&staging);
            RatingError::Persistence {
                message: format!("Failed to write {}: {}", self.path.display(), e),
            }
        })?;

        Ok(())
    }
}

/// Repository kept in memory, for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entries: Vec<RatingEntry>,
    persist_calls: usize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the table returned by `load_all`
    pub fn with_entries(entries: Vec<RatingEntry>) -> Self {
        Self {
            entries,
            persist_calls: 0,
        }
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    /// Number of bulk writes received
    pub fn persist_calls(&self) -> usize {
        self.persist_calls
    }
}

impl RatingRepository for InMemoryRepository {
    fn load_all(&self) -> Result<Vec<RatingEntry>> {
        Ok(self.entries.clone())
    }

    fn persist_all(&mut self, entries: &[RatingEntry]) -> Result<()> {
        self.persist_calls += 1;
        self.entries = entries.to_vec();
        Ok(())
    }
}
