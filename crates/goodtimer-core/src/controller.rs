//! Glue between the state machines and the store.
//!
//! The engine and the tracking stopwatch only emit events. The controller
//! forwards the records those events carry to the [`StoreBroker`], asks the
//! [`Notifier`] to announce finished phases, and keeps the engine's settings
//! in step with the stored ones. A failed write is logged and the event is
//! still returned; the timer never stops because the disk did.

use std::sync::Arc;

use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::notify::Notifier;
use crate::storage::{NewProject, Persist, Project, Settings};
use crate::sync::StoreBroker;
use crate::timer::{PomodoroEngine, TrackingSession};

pub struct Controller<P: Persist> {
    broker: Arc<StoreBroker<P>>,
    engine: PomodoroEngine,
    tracking: TrackingSession,
    notifier: Box<dyn Notifier>,
}

impl<P: Persist> Controller<P> {
    /// Build an idle controller using the stored settings.
    ///
    /// # Errors
    /// Returns `ConfigError` if the stored settings are invalid.
    pub fn new(broker: Arc<StoreBroker<P>>, notifier: Box<dyn Notifier>) -> Result<Self> {
        let engine = PomodoroEngine::new(broker.settings())?;
        Ok(Self {
            broker,
            engine,
            tracking: TrackingSession::new(),
            notifier,
        })
    }

    pub fn engine(&self) -> &PomodoroEngine {
        &self.engine
    }

    pub fn tracking(&self) -> &TrackingSession {
        &self.tracking
    }

    pub fn broker(&self) -> &Arc<StoreBroker<P>> {
        &self.broker
    }

    // ── Pomodoro ─────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        self.engine.start()
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn skip_phase(&mut self) -> Event {
        let event = self.engine.skip();
        self.record(&event);
        event
    }

    pub fn reset_timer(&mut self) -> Event {
        self.engine.reset()
    }

    /// One second of pomodoro time.
    pub fn tick_timer(&mut self) -> Option<Event> {
        let event = self.engine.tick()?;
        self.record(&event);
        Some(event)
    }

    // ── Tracking ─────────────────────────────────────────────────────

    /// # Errors
    /// `MissingProject`, `UnknownProject` or `TrackingActive`.
    pub fn start_tracking(
        &mut self,
        project_id: Option<u64>,
        description: impl Into<String>,
    ) -> Result<Event> {
        if let Some(id) = project_id {
            if self.broker.snapshot().project(id).is_none() {
                return Err(ValidationError::UnknownProject(id).into());
            }
        }
        Ok(self.tracking.start(project_id, description)?)
    }

    pub fn tick_tracking(&mut self) -> Option<Event> {
        self.tracking.tick()
    }

    pub fn stop_tracking(&mut self) -> Option<Event> {
        let event = self.tracking.stop()?;
        self.record(&event);
        Some(event)
    }

    // ── Data ─────────────────────────────────────────────────────────

    pub fn add_project(&self, project: NewProject) -> Result<Project> {
        self.broker.append_project(project)
    }

    /// Store new settings and hand them to the engine.
    ///
    /// # Errors
    /// `ConfigError` for invalid settings, `PersistenceError` when the write
    /// fails. The engine keeps its settings in both cases.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.broker.update_settings(settings.clone())?;
        self.engine.apply_settings(settings)?;
        Ok(())
    }

    /// Change one setting by key. Returns the settings now in effect.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<Settings> {
        let settings = self.engine.settings().with_value(key, value)?;
        self.update_settings(settings.clone())?;
        Ok(settings)
    }

    /// Adopt settings written elsewhere, e.g. after [`StoreBroker::refresh`].
    /// Returns whether the engine's settings changed.
    pub fn sync_settings(&mut self) -> bool {
        let stored = self.broker.settings();
        if &stored == self.engine.settings() {
            return false;
        }
        match self.engine.apply_settings(stored) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid stored settings");
                false
            }
        }
    }

    fn record(&self, event: &Event) {
        match event {
            Event::PhaseCompleted {
                session,
                notification,
                ..
            } => {
                if let Err(e) = self.broker.append_session(session.clone()) {
                    tracing::warn!(error = %e, "failed to record session");
                }
                if self.engine.settings().notification_enabled {
                    self.notifier.show(notification);
                }
            }
            Event::TrackingStopped {
                entry: Some(entry), ..
            } => {
                if let Err(e) = self.broker.append_time_entry(entry.clone()) {
                    tracing::warn!(error = %e, "failed to record time entry");
                }
            }
            _ => {}
        }
    }
}
