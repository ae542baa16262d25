//! Statistics for goodtimer
//!
//! Pure functions over a [`TimeDocument`](crate::storage::TimeDocument)
//! snapshot: today's dashboard numbers, goal progress, period reports with a
//! productivity score, and per-day / per-project series for charts. Nothing
//! here mutates the document.

mod range;
mod report;
mod summary;

pub use range::{local_date, DateRange, ReportPeriod};

pub use report::{
    filter_entries, format_duration, period_report, productivity_score, totals_by_day,
    totals_by_project, DayTotal, PeriodReport, ProjectTotal, UNKNOWN_PROJECT_COLOR,
};

pub use summary::{
    goal_progress, goal_progress_on, today_stats, today_stats_on, GoalProgress, TodayStats,
};
