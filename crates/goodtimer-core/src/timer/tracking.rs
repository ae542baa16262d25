//! Manual time tracking.
//!
//! A stopwatch independent of the pomodoro engine. Elapsed time is counted in
//! ticks, one per second. Runs shorter than a full minute are discarded on
//! stop; longer runs are rounded down to whole minutes.

use chrono::{DateTime, Utc};

use super::phase::format_stopwatch;
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::NewTimeEntry;

#[derive(Debug, Clone, PartialEq)]
struct ActiveRun {
    project_id: u64,
    description: String,
    started_at: DateTime<Utc>,
    elapsed_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TrackingSession {
    active: Option<ActiveRun>,
}

impl TrackingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.active.as_ref().map_or(0, |run| run.elapsed_secs)
    }

    pub fn project_id(&self) -> Option<u64> {
        self.active.as_ref().map(|run| run.project_id)
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn display(&self) -> String {
        format_stopwatch(self.elapsed_secs())
    }

    pub fn start(
        &mut self,
        project_id: Option<u64>,
        description: impl Into<String>,
    ) -> Result<Event, ValidationError> {
        self.start_at(project_id, description, Utc::now())
    }

    /// Begin a run for `project_id`.
    ///
    /// # Errors
    /// `MissingProject` when no project is selected, `TrackingActive` when a
    /// run is already in progress. Nothing changes on error.
    pub fn start_at(
        &mut self,
        project_id: Option<u64>,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let project_id = project_id.ok_or(ValidationError::MissingProject)?;
        if self.active.is_some() {
            return Err(ValidationError::TrackingActive);
        }
        let description = description.into();
        self.active = Some(ActiveRun {
            project_id,
            description: description.clone(),
            started_at: at,
            elapsed_secs: 0,
        });
        tracing::debug!(project_id, "tracking started");
        Ok(Event::TrackingStarted {
            project_id,
            description,
            at,
        })
    }

    /// Count one second. `None` when nothing is being tracked.
    pub fn tick(&mut self) -> Option<Event> {
        let run = self.active.as_mut()?;
        run.elapsed_secs += 1;
        Some(Event::TrackingTick {
            elapsed_secs: run.elapsed_secs,
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.stop_at(Utc::now())
    }

    /// End the active run. `None` when nothing is being tracked.
    ///
    /// The returned `TrackingStopped` carries an entry only when at least one
    /// whole minute elapsed. The run is cleared either way.
    pub fn stop_at(&mut self, at: DateTime<Utc>) -> Option<Event> {
        let run = self.active.take()?;
        let duration_minutes = u32::try_from(run.elapsed_secs / 60).unwrap_or(u32::MAX);
        let entry = (duration_minutes > 0).then(|| NewTimeEntry {
            project_id: run.project_id,
            description: run.description,
            duration_minutes,
            started_at: run.started_at,
            ended_at: at,
        });
        if entry.is_none() {
            tracing::debug!(elapsed_secs = run.elapsed_secs, "tracking run under a minute discarded");
        }
        Some(Event::TrackingStopped {
            elapsed_secs: run.elapsed_secs,
            entry,
            at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_for(secs: u64) -> Option<NewTimeEntry> {
        let mut tracking = TrackingSession::new();
        tracking.start(Some(7), "draft").unwrap();
        for _ in 0..secs {
            tracking.tick();
        }
        match tracking.stop() {
            Some(Event::TrackingStopped { entry, elapsed_secs, .. }) => {
                assert_eq!(elapsed_secs, secs);
                assert!(!tracking.is_active());
                entry
            }
            other => panic!("Expected TrackingStopped, got {other:?}"),
        }
    }

    #[test]
    fn missing_project_is_rejected() {
        let mut tracking = TrackingSession::new();
        assert_eq!(
            tracking.start(None, "anything"),
            Err(ValidationError::MissingProject)
        );
        assert!(!tracking.is_active());
    }

    #[test]
    fn second_start_is_rejected_and_keeps_first_run() {
        let mut tracking = TrackingSession::new();
        tracking.start(Some(1), "").unwrap();
        tracking.tick();
        assert_eq!(
            tracking.start(Some(2), ""),
            Err(ValidationError::TrackingActive)
        );
        assert_eq!(tracking.project_id(), Some(1));
        assert_eq!(tracking.elapsed_secs(), 1);
    }

    #[test]
    fn sub_minute_runs_are_discarded() {
        assert!(run_for(0).is_none());
        assert!(run_for(59).is_none());
    }

    #[test]
    fn durations_round_down_to_whole_minutes() {
        let entry = run_for(60).unwrap();
        assert_eq!(entry.duration_minutes, 1);
        let entry = run_for(125).unwrap();
        assert_eq!(entry.duration_minutes, 2);
        assert_eq!(entry.project_id, 7);
        assert_eq!(entry.description, "draft");
    }

    #[test]
    fn stop_without_run_is_a_noop() {
        let mut tracking = TrackingSession::new();
        assert!(tracking.stop().is_none());
        assert!(tracking.tick().is_none());
    }

    #[test]
    fn display_counts_up() {
        let mut tracking = TrackingSession::new();
        tracking.start(Some(1), "").unwrap();
        for _ in 0..3661 {
            tracking.tick();
        }
        assert_eq!(tracking.display(), "01:01:01");
    }
}
