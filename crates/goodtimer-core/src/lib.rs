//! # Good Timer Core Library
//!
//! Core logic for Good Timer, a Pomodoro timer with manual time tracking.
//! Every surface (the `goodtimer` CLI today) is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: tick-driven state machines. The caller invokes `tick()` once
//!   per second; nothing here owns a clock thread.
//! - **Storage**: one JSON document holding settings, sessions, projects and
//!   time entries, rewritten whole on every change, plus a TOML config for
//!   where and how that document is stored.
//! - **Stats**: pure aggregation over a document snapshot.
//! - **Sync**: a single-writer broker that announces committed changes so all
//!   surfaces see the same data.
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: work / short break / long break cycle
//! - [`TrackingSession`]: per-project stopwatch
//! - [`TimeStore`]: load, mutate and save the document
//! - [`StoreBroker`]: serialized writes and change notifications
//! - [`Controller`]: wires the above together

pub mod controller;
pub mod error;
pub mod events;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod timer;

pub use controller::Controller;
pub use error::{ConfigError, CoreError, PersistenceError, ValidationError};
pub use events::Event;
pub use notify::{Notification, Notifier, TracingNotifier};
pub use stats::{
    goal_progress, period_report, today_stats, DateRange, GoalProgress, PeriodReport,
    ReportPeriod, TodayStats,
};
pub use storage::{
    Config, JsonFilePersist, MemoryPersist, Persist, Project, SessionRecord, Settings,
    TimeDocument, TimeEntry, TimeStore,
};
pub use sync::{spawn_poller, ChangeKind, StoreBroker, StoreChange};
pub use timer::{Phase, PomodoroEngine, TimerState, TrackingSession};
