//! Single-writer broker around a [`TimeStore`].
//!
//! Every surface in a process shares one broker. Writes are serialized
//! behind a mutex. Each one re-reads the persisted document, applies the
//! change, saves, and only then commits it to the cache and announces it on
//! a broadcast channel. A failed save leaves the cached document as it was.
//!
//! Writers in other processes are not locked out. A write from here keeps
//! theirs unless both land inside the same read-modify-write, in which case
//! the last writer wins. [`StoreBroker::refresh`] picks up their changes
//! between writes.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::{PersistenceError, Result};
use crate::storage::{
    DocumentDialog, NewProject, NewSession, NewTimeEntry, Persist, Project, SessionRecord,
    Settings, TimeDocument, TimeEntry, TimeStore,
};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    SessionAdded { id: u64 },
    TimeEntryAdded { id: u64 },
    TimeEntryDeleted { id: u64 },
    ProjectAdded { id: u64 },
    SettingsUpdated,
    Cleared,
    Imported,
    /// The persisted document changed underneath us.
    Reloaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    pub revision: u64,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

struct Cached {
    doc: TimeDocument,
    revision: u64,
}

pub struct StoreBroker<P: Persist> {
    store: TimeStore<P>,
    cached: Mutex<Cached>,
    changes: broadcast::Sender<StoreChange>,
}

impl<P: Persist> StoreBroker<P> {
    /// Load the current document and start at revision 0.
    pub fn open(store: TimeStore<P>) -> Self {
        let doc = store.load();
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            store,
            cached: Mutex::new(Cached { doc, revision: 0 }),
            changes,
        }
    }

    /// Receive every committed change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> TimeDocument {
        self.lock().doc.clone()
    }

    pub fn settings(&self) -> Settings {
        self.lock().doc.settings.clone()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn store(&self) -> &TimeStore<P> {
        &self.store
    }

    pub fn append_session(&self, session: NewSession) -> Result<SessionRecord> {
        self.commit(|doc| {
            let record = doc.push_session(session, Utc::now());
            let kind = ChangeKind::SessionAdded { id: record.id };
            Ok((record, kind))
        })
    }

    pub fn append_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        self.commit(|doc| {
            let record = doc.push_time_entry(entry, Utc::now());
            let kind = ChangeKind::TimeEntryAdded { id: record.id };
            Ok((record, kind))
        })
    }

    pub fn append_project(&self, project: NewProject) -> Result<Project> {
        self.commit(|doc| {
            let record = doc.push_project(project, Utc::now())?;
            let kind = ChangeKind::ProjectAdded { id: record.id };
            Ok((record, kind))
        })
    }

    /// Returns whether an entry was removed. Nothing is written otherwise.
    pub fn delete_time_entry(&self, id: u64) -> Result<bool> {
        let mut cached = self.lock();
        let mut doc = self.current(&cached);
        if !doc.remove_time_entry(id) {
            return Ok(false);
        }
        self.write(&mut cached, doc, ChangeKind::TimeEntryDeleted { id })?;
        Ok(true)
    }

    pub fn clear_all(&self) -> Result<()> {
        self.commit(|doc| {
            doc.clear_all();
            Ok(((), ChangeKind::Cleared))
        })
    }

    /// Validate and store new settings.
    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.commit(|doc| {
            doc.settings = settings;
            Ok(((), ChangeKind::SettingsUpdated))
        })
    }

    pub fn export(&self, dialog: &dyn DocumentDialog) -> Result<()> {
        if dialog.export_document(&self.snapshot()) {
            Ok(())
        } else {
            Err(PersistenceError::ExportFailed.into())
        }
    }

    /// Replace the whole document with an imported one.
    pub fn import(&self, dialog: &dyn DocumentDialog) -> Result<()> {
        let imported = dialog
            .import_document()
            .ok_or(PersistenceError::ImportFailed)?;
        imported.settings.validate()?;
        let mut cached = self.lock();
        self.write(&mut cached, imported, ChangeKind::Imported)
    }

    /// Re-read the persisted document and adopt it if it differs.
    ///
    /// Returns whether anything changed. A missing or unreadable document is
    /// ignored rather than replacing good cached data with defaults.
    pub fn refresh(&self) -> bool {
        let Some(doc) = self.store.try_load() else {
            return false;
        };
        let mut cached = self.lock();
        if cached.doc == doc {
            return false;
        }
        cached.doc = doc;
        self.publish(&mut cached, ChangeKind::Reloaded);
        true
    }

    fn commit<T>(
        &self,
        apply: impl FnOnce(&mut TimeDocument) -> Result<(T, ChangeKind)>,
    ) -> Result<T> {
        let mut cached = self.lock();
        let mut doc = self.current(&cached);
        let (out, kind) = apply(&mut doc)?;
        self.write(&mut cached, doc, kind)?;
        Ok(out)
    }

    /// The persisted document, or the cached one when it cannot be read.
    fn current(&self, cached: &Cached) -> TimeDocument {
        self.store.try_load().unwrap_or_else(|| cached.doc.clone())
    }

    fn write(
        &self,
        cached: &mut MutexGuard<'_, Cached>,
        doc: TimeDocument,
        kind: ChangeKind,
    ) -> Result<()> {
        if !self.store.save(&doc) {
            tracing::warn!(?kind, "store write failed; keeping previous document");
            return Err(PersistenceError::SaveFailed.into());
        }
        cached.doc = doc;
        self.publish(cached, kind);
        Ok(())
    }

    fn publish(&self, cached: &mut MutexGuard<'_, Cached>, kind: ChangeKind) {
        cached.revision += 1;
        let change = StoreChange {
            revision: cached.revision,
            kind,
        };
        tracing::debug!(revision = change.revision, kind = ?change.kind, "store changed");
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }

    fn lock(&self) -> MutexGuard<'_, Cached> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
