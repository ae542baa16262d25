//! TimeStore: load/mutate/save conveniences over a [`Persist`] backend.
//!
//! Every mutation re-reads the document, applies the change and rewrites the
//! whole file. There is no locking: two processes doing this concurrently can
//! lose each other's writes. Writers sharing one process should go through
//! [`crate::sync::StoreBroker`] instead.

use chrono::Utc;

use super::document::{
    NewProject, NewSession, NewTimeEntry, Project, SessionRecord, TimeDocument, TimeEntry,
};
use super::persist::Persist;
use super::settings::Settings;
use super::transfer::DocumentDialog;
use crate::error::{PersistenceError, Result};

pub struct TimeStore<P: Persist> {
    persist: P,
}

impl<P: Persist> TimeStore<P> {
    pub fn new(persist: P) -> Self {
        Self { persist }
    }

    pub fn persist(&self) -> &P {
        &self.persist
    }

    /// Write a default document when nothing is stored yet.
    ///
    /// An existing but unreadable document is left alone. Returns whether a
    /// document is in place afterwards.
    pub fn initialize(&self) -> bool {
        if self.persist.exists() {
            return true;
        }
        tracing::info!("initializing empty time document");
        self.persist.save(&TimeDocument::default())
    }

    /// The persisted document, or `None` when absent or unreadable.
    pub fn try_load(&self) -> Option<TimeDocument> {
        self.persist.load()
    }

    /// The persisted document, or a fresh default one.
    pub fn load(&self) -> TimeDocument {
        self.try_load().unwrap_or_default()
    }

    /// Full overwrite. `false` on failure; never retried.
    pub fn save(&self, doc: &TimeDocument) -> bool {
        self.persist.save(doc)
    }

    pub fn append_session(&self, session: NewSession) -> Result<SessionRecord> {
        self.mutate(|doc| Ok(doc.push_session(session, Utc::now())))
    }

    pub fn append_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        self.mutate(|doc| Ok(doc.push_time_entry(entry, Utc::now())))
    }

    pub fn append_project(&self, project: NewProject) -> Result<Project> {
        self.mutate(|doc| Ok(doc.push_project(project, Utc::now())?))
    }

    /// Returns whether an entry with `id` existed.
    pub fn delete_time_entry(&self, id: u64) -> Result<bool> {
        self.mutate(|doc| Ok(doc.remove_time_entry(id)))
    }

    /// Remove sessions, projects and entries, keeping settings.
    pub fn clear_all(&self) -> Result<()> {
        self.mutate(|doc| {
            doc.clear_all();
            Ok(())
        })
    }

    /// Replace settings after validating them.
    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.mutate(|doc| {
            doc.settings = settings;
            Ok(())
        })
    }

    /// Hand the current document to an export collaborator.
    pub fn export(&self, dialog: &dyn DocumentDialog) -> Result<()> {
        if dialog.export_document(&self.load()) {
            Ok(())
        } else {
            Err(PersistenceError::ExportFailed.into())
        }
    }

    /// Replace the stored document with one supplied by an import collaborator.
    ///
    /// The imported settings must validate; nothing is written otherwise.
    pub fn import(&self, dialog: &dyn DocumentDialog) -> Result<TimeDocument> {
        let doc = dialog
            .import_document()
            .ok_or(PersistenceError::ImportFailed)?;
        doc.settings.validate()?;
        if !self.save(&doc) {
            return Err(PersistenceError::SaveFailed.into());
        }
        tracing::info!(
            sessions = doc.sessions.len(),
            entries = doc.time_entries.len(),
            "time document imported"
        );
        Ok(doc)
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut TimeDocument) -> Result<T>) -> Result<T> {
        let mut doc = self.load();
        let out = apply(&mut doc)?;
        if !self.save(&doc) {
            return Err(PersistenceError::SaveFailed.into());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, CoreError, ValidationError};
    use crate::storage::persist::MemoryPersist;
    use crate::timer::Phase;

    fn work_session() -> NewSession {
        NewSession {
            phase_type: Phase::Work,
            duration_minutes: 25,
            started_at: Utc::now(),
            completed: true,
        }
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let store = TimeStore::new(MemoryPersist::with_json("]["));
        assert!(store.try_load().is_none());
        assert_eq!(store.load(), TimeDocument::default());
    }

    #[test]
    fn initialize_does_not_clobber_existing_data() {
        let store = TimeStore::new(MemoryPersist::with_json("corrupt"));
        assert!(store.initialize());
        assert_eq!(store.persist().raw().as_deref(), Some("corrupt"));

        let fresh = TimeStore::new(MemoryPersist::new());
        assert!(fresh.initialize());
        assert_eq!(fresh.try_load(), Some(TimeDocument::default()));
    }

    #[test]
    fn appends_persist_through_full_rewrites() {
        let store = TimeStore::new(MemoryPersist::new());
        let project = store
            .append_project(NewProject {
                name: "Garden".into(),
                ..NewProject::default()
            })
            .unwrap();
        store.append_session(work_session()).unwrap();
        let entry = store
            .append_time_entry(NewTimeEntry {
                project_id: project.id,
                description: "weeding".into(),
                duration_minutes: 10,
                started_at: Utc::now(),
                ended_at: Utc::now(),
            })
            .unwrap();

        let doc = store.load();
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.sessions.len(), 1);
        assert_eq!(doc.time_entries, vec![entry.clone()]);

        assert!(store.delete_time_entry(entry.id).unwrap());
        assert!(!store.delete_time_entry(entry.id).unwrap());
        store.clear_all().unwrap();
        let doc = store.load();
        assert!(doc.sessions.is_empty() && doc.projects.is_empty());
    }

    #[test]
    fn empty_project_name_is_a_validation_error() {
        let store = TimeStore::new(MemoryPersist::new());
        let err = store.append_project(NewProject::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EmptyProjectName)
        ));
        assert!(store.try_load().is_none());
    }

    #[test]
    fn save_failure_is_reported_not_raised() {
        let store = TimeStore::new(MemoryPersist::failing());
        assert!(!store.save(&TimeDocument::default()));
        assert!(matches!(
            store.append_session(work_session()),
            Err(CoreError::Persistence(PersistenceError::SaveFailed))
        ));
    }

    #[test]
    fn invalid_settings_are_rejected_at_save_time() {
        let store = TimeStore::new(MemoryPersist::new());
        let bad = Settings {
            long_break_interval: 0,
            ..Settings::default()
        };
        assert!(matches!(
            store.update_settings(bad),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(store.try_load().is_none());
    }
}
