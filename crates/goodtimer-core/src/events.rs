use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::Notification;
use crate::storage::{NewSession, NewTimeEntry};
use crate::timer::{Phase, TimerState};

/// Every state change of the engine or the tracking stopwatch produces an
/// Event. Surfaces render them; the controller persists the records they carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerTick {
        phase: Phase,
        remaining_secs: u64,
    },
    /// A phase finished, naturally or by skip. `session` is the record to log.
    PhaseCompleted {
        session: NewSession,
        next_phase: Phase,
        skipped: bool,
        completed_work_count: u32,
        notification: Notification,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        label: String,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        progress: f64,
        completed_work_count: u32,
        at: DateTime<Utc>,
    },
    TrackingStarted {
        project_id: u64,
        description: String,
        at: DateTime<Utc>,
    },
    TrackingTick {
        elapsed_secs: u64,
    },
    /// `entry` is `None` when the run was shorter than a minute.
    TrackingStopped {
        elapsed_secs: u64,
        entry: Option<NewTimeEntry>,
        at: DateTime<Utc>,
    },
}
