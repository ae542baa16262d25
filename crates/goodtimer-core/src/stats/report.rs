//! Period reports and the aggregated series behind the charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::range::{local_date, DateRange};
use crate::storage::{TimeDocument, TimeEntry, UNKNOWN_PROJECT};
use crate::timer::Phase;

/// Colour used for entries whose project is gone.
pub const UNKNOWN_PROJECT_COLOR: &str = "#999999";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTotal {
    pub project_id: u64,
    pub label: String,
    pub color_hex: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub range: DateRange,
    pub total_tracked_minutes: u64,
    pub total_work_sessions: u32,
    pub average_session_minutes: u64,
    /// 0..=100
    pub productivity_score: u32,
    pub by_day: Vec<DayTotal>,
    pub by_project: Vec<ProjectTotal>,
}

/// Report over `range` using the document's configured pomodoro length as
/// the nominal session length.
pub fn period_report(doc: &TimeDocument, range: DateRange) -> PeriodReport {
    let total_work_sessions = doc
        .sessions
        .iter()
        .filter(|s| s.completed && s.phase_type == Phase::Work)
        .filter(|s| range.contains_instant(&s.started_at))
        .count();
    let total_work_sessions = u32::try_from(total_work_sessions).unwrap_or(u32::MAX);

    let entries: Vec<&TimeEntry> = doc
        .time_entries
        .iter()
        .filter(|e| range.contains_instant(&e.started_at))
        .collect();
    let total_tracked_minutes: u64 = entries.iter().map(|e| u64::from(e.duration_minutes)).sum();

    let average_session_minutes = if total_work_sessions == 0 {
        0
    } else {
        (total_tracked_minutes as f64 / f64::from(total_work_sessions)).round() as u64
    };

    PeriodReport {
        range,
        total_tracked_minutes,
        total_work_sessions,
        average_session_minutes,
        productivity_score: productivity_score(
            total_tracked_minutes,
            total_work_sessions,
            doc.settings.pomodoro_minutes,
        ),
        by_day: totals_by_day(&entries),
        by_project: totals_by_project(doc, &entries),
    }
}

/// Tracked time against the time the completed pomodoros nominally cover,
/// as a percentage capped at 100. Zero when there is nothing to compare to.
pub fn productivity_score(tracked_minutes: u64, work_sessions: u32, nominal_minutes: u32) -> u32 {
    let expected = u64::from(work_sessions) * u64::from(nominal_minutes);
    if expected == 0 {
        return 0;
    }
    let score = (tracked_minutes as f64 / expected as f64 * 100.0).round();
    score.min(100.0) as u32
}

/// Tracked minutes per local calendar date, oldest first.
pub fn totals_by_day(entries: &[&TimeEntry]) -> Vec<DayTotal> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in entries {
        *days.entry(local_date(&entry.started_at)).or_default() += u64::from(entry.duration_minutes);
    }
    days.into_iter()
        .map(|(date, minutes)| DayTotal { date, minutes })
        .collect()
}

/// Tracked minutes per project, largest first. Dangling project ids keep
/// their own bucket under the unknown-project label.
pub fn totals_by_project(doc: &TimeDocument, entries: &[&TimeEntry]) -> Vec<ProjectTotal> {
    let mut projects: BTreeMap<u64, u64> = BTreeMap::new();
    for entry in entries {
        *projects.entry(entry.project_id).or_default() += u64::from(entry.duration_minutes);
    }
    let mut totals: Vec<ProjectTotal> = projects
        .into_iter()
        .map(|(project_id, minutes)| {
            let (label, color_hex) = match doc.project(project_id) {
                Some(p) => (p.name.clone(), p.color_hex.clone()),
                None => (UNKNOWN_PROJECT.to_string(), UNKNOWN_PROJECT_COLOR.to_string()),
            };
            ProjectTotal {
                project_id,
                label,
                color_hex,
                minutes,
            }
        })
        .collect();
    totals.sort_by(|a, b| b.minutes.cmp(&a.minutes).then(a.project_id.cmp(&b.project_id)));
    totals
}

/// Entries matching the optional date and project filters, newest first.
pub fn filter_entries(
    doc: &TimeDocument,
    date: Option<NaiveDate>,
    project_id: Option<u64>,
) -> Vec<&TimeEntry> {
    let mut entries: Vec<&TimeEntry> = doc
        .time_entries
        .iter()
        .filter(|e| date.map_or(true, |d| local_date(&e.started_at) == d))
        .filter(|e| project_id.map_or(true, |p| e.project_id == p))
        .collect();
    entries.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    entries
}

/// `Xh Ym`.
pub fn format_duration(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
