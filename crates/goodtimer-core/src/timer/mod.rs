mod engine;
mod phase;
mod tracking;

pub use engine::PomodoroEngine;
pub use phase::{format_clock, format_stopwatch, Phase, TimerState};
pub use tracking::TrackingSession;
