//! Document persistence backends.
//!
//! The contract is lossy: `load` answers `None` on any failure
//! and `save` answers `false`. Failures are logged here and never propagate.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::document::TimeDocument;

/// Storage collaborator for the time document.
pub trait Persist: Send + Sync {
    /// Read the persisted document. `None` when absent, unreadable or corrupt.
    fn load(&self) -> Option<TimeDocument>;

    /// Overwrite the persisted document. `false` on any failure.
    fn save(&self, doc: &TimeDocument) -> bool;

    /// Whether anything is stored, readable or not.
    fn exists(&self) -> bool {
        self.load().is_some()
    }
}

/// JSON file on local disk, pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonFilePersist {
    path: PathBuf,
    atomic: bool,
}

impl JsonFilePersist {
    /// Write through a temp file and rename over the target.
    pub fn atomic(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: true,
        }
    }

    /// Truncate-and-write in place. A crash mid-write can leave a partial file.
    pub fn in_place(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, json: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.atomic {
            return fs::write(&self.path, json);
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "timer-data.json".into());
        let temp_path = self
            .path
            .with_file_name(format!("{file_name}.tmp.{}", std::process::id()));

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(())
    }
}

impl Persist for JsonFilePersist {
    fn load(&self) -> Option<TimeDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no time document yet");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read time document");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "time document is corrupt");
                None
            }
        }
    }

    fn save(&self, doc: &TimeDocument) -> bool {
        let json = match serde_json::to_string_pretty(doc) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize time document");
                return false;
            }
        };
        match self.write(&json) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), bytes = json.len(), "time document saved");
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to save time document");
                false
            }
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// In-process backend holding the serialized JSON, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPersist {
    json: Mutex<Option<String>>,
    fail_saves: bool,
}

impl MemoryPersist {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose saves always fail.
    pub fn failing() -> Self {
        Self {
            json: Mutex::new(None),
            fail_saves: true,
        }
    }

    /// Seed with raw JSON, which need not be valid.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Mutex::new(Some(json.into())),
            fail_saves: false,
        }
    }

    /// The last successfully saved JSON.
    pub fn raw(&self) -> Option<String> {
        self.json.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Persist for MemoryPersist {
    fn load(&self) -> Option<TimeDocument> {
        let raw = self.raw()?;
        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(error = %e, "in-memory time document is corrupt");
                None
            }
        }
    }

    fn save(&self, doc: &TimeDocument) -> bool {
        if self.fail_saves {
            return false;
        }
        let Ok(json) = serde_json::to_string_pretty(doc) else {
            return false;
        };
        match self.json.lock() {
            Ok(mut guard) => {
                *guard = Some(json);
                true
            }
            Err(_) => false,
        }
    }

    fn exists(&self) -> bool {
        self.raw().is_some()
    }
}

impl<P: Persist + ?Sized> Persist for Box<P> {
    fn load(&self) -> Option<TimeDocument> {
        (**self).load()
    }

    fn save(&self, doc: &TimeDocument) -> bool {
        (**self).save(doc)
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }
}

impl<P: Persist + ?Sized> Persist for Arc<P> {
    fn load(&self) -> Option<TimeDocument> {
        (**self).load()
    }

    fn save(&self, doc: &TimeDocument) -> bool {
        (**self).save(doc)
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }
}
