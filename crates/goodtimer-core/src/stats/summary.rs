//! Today's dashboard numbers and goal progress.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::range::local_date;
use crate::storage::TimeDocument;
use crate::timer::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStats {
    pub date: NaiveDate,
    /// Completed work sessions.
    pub completed_pomodoros: u32,
    /// Completed break sessions of either length.
    pub break_count: u32,
    /// Sum of completed session lengths, breaks included.
    pub session_minutes: u64,
    /// Sum of tracked time entries.
    pub total_tracked_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub tracked_minutes: u64,
    /// Tracked hours rounded to one decimal.
    pub tracked_hours: f64,
    pub daily_goal_hours: f64,
    /// 0..=100
    pub time_pct: u32,
    pub completed_pomodoros: u32,
    pub pomodoro_goal: u32,
    /// 0..=100
    pub pomodoro_pct: u32,
}

pub fn today_stats(doc: &TimeDocument) -> TodayStats {
    today_stats_on(doc, Local::now().date_naive())
}

/// Stats for the local calendar day `day`.
pub fn today_stats_on(doc: &TimeDocument, day: NaiveDate) -> TodayStats {
    let mut stats = TodayStats {
        date: day,
        completed_pomodoros: 0,
        break_count: 0,
        session_minutes: 0,
        total_tracked_minutes: 0,
    };

    for session in doc
        .sessions
        .iter()
        .filter(|s| s.completed && local_date(&s.started_at) == day)
    {
        stats.session_minutes += u64::from(session.duration_minutes);
        match session.phase_type {
            Phase::Work => stats.completed_pomodoros += 1,
            Phase::ShortBreak | Phase::LongBreak => stats.break_count += 1,
        }
    }

    stats.total_tracked_minutes = doc
        .time_entries
        .iter()
        .filter(|e| local_date(&e.started_at) == day)
        .map(|e| u64::from(e.duration_minutes))
        .sum();

    stats
}

pub fn goal_progress(doc: &TimeDocument) -> GoalProgress {
    goal_progress_on(doc, Local::now().date_naive())
}

/// Progress toward the daily goals on `day`.
pub fn goal_progress_on(doc: &TimeDocument, day: NaiveDate) -> GoalProgress {
    let today = today_stats_on(doc, day);
    let settings = &doc.settings;
    let hours = today.total_tracked_minutes as f64 / 60.0;

    GoalProgress {
        tracked_minutes: today.total_tracked_minutes,
        tracked_hours: (hours * 10.0).round() / 10.0,
        daily_goal_hours: settings.daily_goal_hours,
        time_pct: percent(hours, settings.daily_goal_hours),
        completed_pomodoros: today.completed_pomodoros,
        pomodoro_goal: settings.pomodoro_goal_count,
        pomodoro_pct: percent(
            f64::from(today.completed_pomodoros),
            f64::from(settings.pomodoro_goal_count),
        ),
    }
}

/// `done / goal` as a rounded percentage clamped to 0..=100.
fn percent(done: f64, goal: f64) -> u32 {
    if goal <= 0.0 || !goal.is_finite() {
        return 0;
    }
    (done / goal * 100.0).round().clamp(0.0, 100.0) as u32
}
