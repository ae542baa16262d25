//! The persisted time document.
//!
//! One JSON object holds everything: settings, the session log, projects and
//! tracked time entries. Sessions and entries are append-mostly; the only
//! removals are [`TimeDocument::clear_all`] and
//! [`TimeDocument::remove_time_entry`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::settings::Settings;
use crate::error::ValidationError;
use crate::timer::Phase;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Label rendered for entries whose project no longer exists.
pub const UNKNOWN_PROJECT: &str = "Unknown project";

/// A completed (or skipped) pomodoro phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(alias = "type")]
    pub phase_type: Phase,
    /// Configured phase length at completion time, not elapsed time.
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(alias = "startTime")]
    pub started_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    pub name: String,
    #[serde(alias = "color", default = "default_color")]
    pub color_hex: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A manually tracked interval of work on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    /// Weak reference; resolve through [`TimeDocument::project`].
    #[serde(deserialize_with = "lenient_id")]
    pub project_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(alias = "startTime")]
    pub started_at: DateTime<Utc>,
    #[serde(alias = "endTime")]
    pub ended_at: DateTime<Utc>,
}

/// A session the engine finished, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub phase_type: Phase,
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub completed: bool,
}

/// A stopped tracking run, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub project_id: u64,
    pub description: String,
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub color_hex: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}
fn default_true() -> bool {
    true
}
fn default_color() -> String {
    "#ff6b6b".into()
}

/// Ids were numbers in most files, but entry project ids were written as
/// strings by the project picker.
fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl Default for TimeDocument {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            settings: Settings::default(),
            sessions: Vec::new(),
            projects: Vec::new(),
            time_entries: Vec::new(),
        }
    }
}

impl TimeDocument {
    /// Next record id: time-derived, strictly greater than any id in use.
    pub fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let last = self
            .sessions
            .iter()
            .map(|s| s.id)
            .chain(self.projects.iter().map(|p| p.id))
            .chain(self.time_entries.iter().map(|e| e.id))
            .max()
            .unwrap_or(0);
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        now_ms.max(last.saturating_add(1))
    }

    /// Resolve a project by id.
    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Display name for a project id, falling back to [`UNKNOWN_PROJECT`].
    pub fn project_label(&self, id: u64) -> &str {
        self.project(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PROJECT)
    }

    pub fn push_session(&mut self, session: NewSession, now: DateTime<Utc>) -> SessionRecord {
        let record = SessionRecord {
            id: self.next_id(now),
            phase_type: session.phase_type,
            duration_minutes: session.duration_minutes,
            started_at: session.started_at,
            completed: session.completed,
        };
        self.sessions.push(record.clone());
        record
    }

    pub fn push_time_entry(&mut self, entry: NewTimeEntry, now: DateTime<Utc>) -> TimeEntry {
        let record = TimeEntry {
            id: self.next_id(now),
            project_id: entry.project_id,
            description: entry.description,
            duration_minutes: entry.duration_minutes,
            started_at: entry.started_at,
            ended_at: entry.ended_at,
        };
        self.time_entries.push(record.clone());
        record
    }

    /// Append a project.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyProjectName` for a blank name; the
    /// document is unchanged.
    pub fn push_project(
        &mut self,
        project: NewProject,
        now: DateTime<Utc>,
    ) -> Result<Project, ValidationError> {
        let name = project.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        let record = Project {
            id: self.next_id(now),
            name: name.to_string(),
            color_hex: project.color_hex.unwrap_or_else(default_color),
            description: project.description,
            created_at: now,
        };
        self.projects.push(record.clone());
        Ok(record)
    }

    /// Remove a time entry by id. Returns whether an entry was removed.
    pub fn remove_time_entry(&mut self, id: u64) -> bool {
        let before = self.time_entries.len();
        self.time_entries.retain(|e| e.id != id);
        self.time_entries.len() != before
    }

    /// Drop sessions, projects and entries; settings survive.
    pub fn clear_all(&mut self) {
        self.sessions.clear();
        self.projects.clear();
        self.time_entries.clear();
    }
}

impl TimeEntry {
    /// Resolve this entry's project, if it still exists.
    pub fn project<'a>(&self, doc: &'a TimeDocument) -> Option<&'a Project> {
        doc.project(self.project_id)
    }
}
