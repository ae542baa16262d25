//! Export/import collaborator.
//!
//! Choosing a file is the collaborator's business; the core only hands over
//! or receives a [`TimeDocument`].

use std::fs;
use std::path::PathBuf;

use super::document::TimeDocument;

pub trait DocumentDialog {
    /// Write `doc` somewhere the user chose. `false` on failure or cancel.
    fn export_document(&self, doc: &TimeDocument) -> bool;

    /// Read a document the user chose. `None` on failure or cancel.
    fn import_document(&self) -> Option<TimeDocument>;
}

/// Dialog stand-in that uses a path fixed up front, as the CLI does.
#[derive(Debug, Clone)]
pub struct FilePathDialog {
    path: PathBuf,
}

impl FilePathDialog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default backup file name for a given day, e.g. `good-timer-backup-2024-03-01.json`.
    pub fn backup_file_name(date: chrono::NaiveDate) -> String {
        format!("good-timer-backup-{}.json", date.format("%Y-%m-%d"))
    }
}

impl DocumentDialog for FilePathDialog {
    fn export_document(&self, doc: &TimeDocument) -> bool {
        let result = serde_json::to_string_pretty(doc)
            .map_err(std::io::Error::from)
            .and_then(|json| fs::write(&self.path, json));
        match result {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "time document exported");
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "export failed");
                false
            }
        }
    }

    fn import_document(&self) -> Option<TimeDocument> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| tracing::warn!(path = %self.path.display(), error = %e, "import read failed"))
            .ok()?;
        serde_json::from_str(&content)
            .map_err(|e| tracing::warn!(path = %self.path.display(), error = %e, "import parse failed"))
            .ok()
    }
}
