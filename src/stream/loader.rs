//! Reading game documents from disk

use crate::error::Result;
use crate::stream::builder::{MatchStream, MatchStreamBuilder};
use crate::stream::document::GameDocument;
use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A file that could not be turned into a game document
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Documents read from a path, plus the files that were rejected
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<GameDocument>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Feed every loaded document into a stream builder
    pub fn into_stream(self) -> MatchStream {
        let mut builder = MatchStreamBuilder::new();
        for document in self.documents {
            builder.add_document(document);
        }
        builder.build()
    }
}

fn read_document(path: &Path) -> Result<GameDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let document = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(document)
}

/// Load a single document, or every `.json` file in a directory.
///
/// Directory entries are read in file name order. A file that fails to parse
/// is reported in [`LoadReport::failures`] and does not stop the load; an
/// unreadable top-level path is an error.
pub fn load_documents(path: &Path) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    if !path.is_dir() {
        report.documents.push(read_document(path)?);
        return Ok(report);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("Failed to list {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|file| file.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    for file in files {
        match read_document(&file) {
            Ok(document) => report.documents.push(document),
            Err(e) => {
                warn!("Skipping game file: {:#}", e);
                report.failures.push(LoadFailure {
                    path: file,
                    message: format!("{:#}", e),
                });
            }
        }
    }

    info!(
        "Loaded {} game documents from {} ({} failed)",
        report.documents.len(),
        path.display(),
        report.failures.len()
    );
    Ok(report)
}
