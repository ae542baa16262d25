//! Pomodoro engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |          |
//!   +--------+----------+   (complete / skip / reset)
//! ```
//!
//! Completing a phase never starts the next one; the engine returns to
//! `Idle` with the next phase loaded.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(settings)?;
//! engine.start();
//! // Once per second:
//! if let Some(Event::PhaseCompleted { session, .. }) = engine.tick() { /* persist */ }
//! ```

use chrono::{DateTime, Utc};

use super::phase::{format_clock, Phase, TimerState};
use crate::error::ConfigError;
use crate::events::Event;
use crate::notify::Notification;
use crate::storage::{NewSession, Settings};

/// Core pomodoro engine.
#[derive(Debug, Clone)]
pub struct PomodoroEngine {
    settings: Settings,
    phase: Phase,
    state: TimerState,
    remaining_secs: u64,
    /// Work phases completed since this engine was created.
    completed_work_count: u32,
    /// When the current phase was first started; cleared on complete/reset.
    phase_started_at: Option<DateTime<Utc>>,
}

impl PomodoroEngine {
    /// Create an idle engine at the start of a work phase.
    ///
    /// # Errors
    /// Returns `ConfigError` if `settings` fail validation, notably a
    /// `longBreakInterval` below 1.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let remaining_secs = settings.phase_secs(Phase::Work);
        Ok(Self {
            settings,
            phase: Phase::Work,
            state: TimerState::Idle,
            remaining_secs,
            completed_work_count: 0,
            phase_started_at: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn completed_work_count(&self) -> u32 {
        self.completed_work_count
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn total_secs(&self) -> u64 {
        self.settings.phase_secs(self.phase)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            label: self.phase.label(self.is_running()).to_string(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: self.display(),
            progress: self.progress(),
            completed_work_count: self.completed_work_count,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Resume when paused, otherwise restart the current phase from its full
    /// length. No-op while already running.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => None,
            TimerState::Paused => {
                self.state = TimerState::Running;
                tracing::debug!(remaining_secs = self.remaining_secs, "timer resumed");
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Idle => {
                self.remaining_secs = self.total_secs();
                self.state = TimerState::Running;
                self.phase_started_at.get_or_insert_with(Utc::now);
                tracing::debug!(phase = ?self.phase, "timer started");
                Some(Event::TimerStarted {
                    phase: self.phase,
                    duration_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Suspend when running; when already paused this resumes, like `start`.
    /// No-op while idle.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                tracing::debug!(remaining_secs = self.remaining_secs, "timer paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => self.start(),
            TimerState::Idle => None,
        }
    }

    /// Finish the current phase now. Logs the full configured length.
    pub fn skip(&mut self) -> Event {
        self.complete(true)
    }

    /// Stop and rewind the current phase. Phase and counters are kept.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs();
        self.phase_started_at = None;
        Event::TimerReset {
            phase: self.phase,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `PhaseCompleted` when time runs out,
    /// `TimerTick` otherwise, and `None` unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete(false));
        }
        Some(Event::TimerTick {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Swap in new settings.
    ///
    /// While idle the remaining time follows the new phase length; a running
    /// or paused phase keeps its remaining time.
    ///
    /// # Errors
    /// Returns `ConfigError` and keeps the old settings if validation fails.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.settings = settings;
        if self.state == TimerState::Idle {
            self.remaining_secs = self.total_secs();
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, skipped: bool) -> Event {
        let now = Utc::now();
        let finished = self.phase;
        let session = NewSession {
            phase_type: finished,
            duration_minutes: self.settings.phase_minutes(finished),
            started_at: self.phase_started_at.take().unwrap_or(now),
            completed: true,
        };

        self.phase = self.next_phase(finished);
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs();

        tracing::info!(
            finished = ?finished,
            next = ?self.phase,
            skipped,
            completed_work_count = self.completed_work_count,
            "phase completed"
        );

        Event::PhaseCompleted {
            session,
            next_phase: self.phase,
            skipped,
            completed_work_count: self.completed_work_count,
            notification: Notification::phase_completed(self.phase, self.settings.sound_enabled),
            at: now,
        }
    }

    fn next_phase(&mut self, finished: Phase) -> Phase {
        match finished {
            Phase::Work => {
                self.completed_work_count += 1;
                // validate() guarantees a non-zero interval.
                if self.completed_work_count % self.settings.long_break_interval == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PomodoroEngine {
        PomodoroEngine::new(Settings::default()).unwrap()
    }

    #[test]
    fn rejects_zero_long_break_interval() {
        let settings = Settings {
            long_break_interval: 0,
            ..Settings::default()
        };
        assert!(PomodoroEngine::new(settings).is_err());
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 25 * 60);

        assert!(matches!(engine.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.start().is_none());

        for _ in 0..10 {
            engine.tick();
        }
        assert!(matches!(engine.pause(), Some(Event::TimerPaused { remaining_secs, .. }) if remaining_secs == 1490));
        assert!(engine.tick().is_none());

        assert!(matches!(engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(engine.remaining_secs(), 1490);
    }

    #[test]
    fn pause_toggles_when_already_paused() {
        let mut engine = engine();
        assert!(engine.pause().is_none());
        engine.start();
        engine.tick();
        engine.pause();
        assert!(engine.is_paused());
        assert!(matches!(engine.pause(), Some(Event::TimerResumed { .. })));
        assert!(engine.is_running());
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);
    }

    #[test]
    fn natural_completion_logs_configured_length() {
        let mut engine = engine();
        engine.start();
        let mut completed = None;
        for _ in 0..25 * 60 {
            if let Some(event @ Event::PhaseCompleted { .. }) = engine.tick() {
                completed = Some(event);
            }
        }
        match completed {
            Some(Event::PhaseCompleted {
                session,
                next_phase,
                skipped,
                ..
            }) => {
                assert_eq!(session.phase_type, Phase::Work);
                assert_eq!(session.duration_minutes, 25);
                assert_eq!(next_phase, Phase::ShortBreak);
                assert!(!skipped);
            }
            other => panic!("Expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn skip_logs_full_length_regardless_of_elapsed() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        match engine.skip() {
            Event::PhaseCompleted { session, skipped, .. } => {
                assert_eq!(session.duration_minutes, 25);
                assert!(skipped);
            }
            other => panic!("Expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.completed_work_count(), 1);
    }

    #[test]
    fn break_completion_returns_to_work() {
        let mut engine = engine();
        engine.skip();
        assert_eq!(engine.phase(), Phase::ShortBreak);
        engine.skip();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.completed_work_count(), 1);
    }

    #[test]
    fn interval_of_one_always_takes_long_breaks() {
        let settings = Settings {
            long_break_interval: 1,
            ..Settings::default()
        };
        let mut engine = PomodoroEngine::new(settings).unwrap();
        for _ in 0..3 {
            engine.skip();
            assert_eq!(engine.phase(), Phase::LongBreak);
            engine.skip();
        }
    }

    #[test]
    fn reset_keeps_phase_and_counter() {
        let mut engine = engine();
        engine.skip();
        engine.start();
        engine.tick();
        engine.pause();
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60);
        assert_eq!(engine.completed_work_count(), 1);
    }

    #[test]
    fn display_and_progress() {
        let mut engine = engine();
        assert_eq!(engine.display(), "25:00");
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        for _ in 0..(25 * 60 / 2) {
            engine.tick();
        }
        assert_eq!(engine.display(), "12:30");
        assert!((engine.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn settings_change_resets_only_idle_engine() {
        let mut engine = engine();
        let longer = Settings {
            pomodoro_minutes: 50,
            ..Settings::default()
        };
        engine.apply_settings(longer.clone()).unwrap();
        assert_eq!(engine.remaining_secs(), 50 * 60);

        engine.start();
        engine.tick();
        engine.apply_settings(Settings::default()).unwrap();
        assert_eq!(engine.remaining_secs(), 50 * 60 - 1);

        let bad = Settings {
            long_break_interval: 0,
            ..Settings::default()
        };
        assert!(engine.apply_settings(bad).is_err());
        assert_eq!(engine.settings(), &Settings::default());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = engine();
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                phase,
                remaining_secs,
                display,
                label,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(phase, Phase::Work);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(display, "25:00");
                assert_eq!(label, "Ready to focus");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
