//! Integration tests for dashboard stats and period reports.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use goodtimer_core::stats::{
    filter_entries, goal_progress_on, period_report, today_stats_on, DateRange, ReportPeriod,
    UNKNOWN_PROJECT_COLOR,
};
use goodtimer_core::storage::{NewProject, NewSession, NewTimeEntry, UNKNOWN_PROJECT};
use goodtimer_core::{Phase, TimeDocument};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Local wall-clock time on `date`, as stored.
fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Local
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

fn add_session(doc: &mut TimeDocument, phase: Phase, minutes: u32, started_at: DateTime<Utc>) {
    doc.push_session(
        NewSession {
            phase_type: phase,
            duration_minutes: minutes,
            started_at,
            completed: true,
        },
        Utc::now(),
    );
}

fn add_entry(doc: &mut TimeDocument, project_id: u64, minutes: u32, started_at: DateTime<Utc>) {
    doc.push_time_entry(
        NewTimeEntry {
            project_id,
            description: String::new(),
            duration_minutes: minutes,
            started_at,
            ended_at: started_at + chrono::Duration::minutes(i64::from(minutes)),
        },
        Utc::now(),
    );
}

fn project(doc: &mut TimeDocument, name: &str) -> u64 {
    doc.push_project(
        NewProject {
            name: name.into(),
            ..NewProject::default()
        },
        Utc::now(),
    )
    .unwrap()
    .id
}

#[test]
fn goal_progress_rounds_and_clamps() {
    let today = day(2024, 5, 15);
    let mut doc = TimeDocument::default();
    let id = project(&mut doc, "Client");
    add_entry(&mut doc, id, 180, at(today, 9));
    add_entry(&mut doc, id, 90, at(today, 14));
    add_entry(&mut doc, id, 600, at(day(2024, 5, 14), 9));
    add_session(&mut doc, Phase::Work, 25, at(today, 9));
    add_session(&mut doc, Phase::ShortBreak, 5, at(today, 10));

    let goals = goal_progress_on(&doc, today);
    assert_eq!(goals.tracked_minutes, 270);
    assert_eq!(goals.tracked_hours, 4.5);
    assert_eq!(goals.time_pct, 56);
    assert_eq!(goals.completed_pomodoros, 1);
    assert_eq!(goals.pomodoro_pct, 13);

    let yesterday = goal_progress_on(&doc, day(2024, 5, 14));
    assert_eq!(yesterday.time_pct, 100);
}

#[test]
fn today_stats_split_work_and_breaks() {
    let today = day(2024, 5, 15);
    let mut doc = TimeDocument::default();
    add_session(&mut doc, Phase::Work, 25, at(today, 9));
    add_session(&mut doc, Phase::ShortBreak, 5, at(today, 10));
    add_session(&mut doc, Phase::LongBreak, 15, at(today, 11));
    add_session(&mut doc, Phase::Work, 25, at(day(2024, 5, 16), 9));

    let stats = today_stats_on(&doc, today);
    assert_eq!(stats.completed_pomodoros, 1);
    assert_eq!(stats.break_count, 2);
    assert_eq!(stats.session_minutes, 45);
    assert_eq!(stats.total_tracked_minutes, 0);
}

#[test]
fn report_without_work_sessions_scores_zero() {
    let today = day(2024, 5, 15);
    let mut doc = TimeDocument::default();
    let id = project(&mut doc, "Client");
    add_entry(&mut doc, id, 45, at(today, 9));

    let range = DateRange::for_period(ReportPeriod::Today, today).unwrap();
    let report = period_report(&doc, range);
    assert_eq!(report.total_tracked_minutes, 45);
    assert_eq!(report.total_work_sessions, 0);
    assert_eq!(report.average_session_minutes, 0);
    assert_eq!(report.productivity_score, 0);
}

#[test]
fn week_report_aggregates_by_day_and_project() {
    // Wednesday; the week runs Sunday 12th to Saturday 18th.
    let today = day(2024, 5, 15);
    let mut doc = TimeDocument::default();
    let client = project(&mut doc, "Client");
    let internal = project(&mut doc, "Internal");

    add_session(&mut doc, Phase::Work, 25, at(day(2024, 5, 12), 9));
    add_session(&mut doc, Phase::Work, 25, at(day(2024, 5, 13), 9));
    add_session(&mut doc, Phase::ShortBreak, 5, at(day(2024, 5, 13), 10));
    add_session(&mut doc, Phase::Work, 25, at(day(2024, 5, 11), 9));

    add_entry(&mut doc, client, 20, at(day(2024, 5, 12), 9));
    add_entry(&mut doc, internal, 10, at(day(2024, 5, 13), 9));
    add_entry(&mut doc, client, 15, at(day(2024, 5, 13), 11));
    add_entry(&mut doc, 999, 5, at(day(2024, 5, 15), 9));
    add_entry(&mut doc, client, 300, at(day(2024, 5, 19), 9));

    let range = DateRange::for_period(ReportPeriod::Week, today).unwrap();
    let report = period_report(&doc, range);

    assert_eq!(report.total_work_sessions, 2);
    assert_eq!(report.total_tracked_minutes, 50);
    assert_eq!(report.average_session_minutes, 25);
    assert_eq!(report.productivity_score, 100);

    let days: Vec<(NaiveDate, u64)> = report.by_day.iter().map(|d| (d.date, d.minutes)).collect();
    assert_eq!(
        days,
        vec![
            (day(2024, 5, 12), 20),
            (day(2024, 5, 13), 25),
            (day(2024, 5, 15), 5),
        ]
    );

    assert_eq!(report.by_project.len(), 3);
    assert_eq!(report.by_project[0].project_id, client);
    assert_eq!(report.by_project[0].minutes, 35);
    let unknown = report
        .by_project
        .iter()
        .find(|p| p.project_id == 999)
        .unwrap();
    assert_eq!(unknown.label, UNKNOWN_PROJECT);
    assert_eq!(unknown.color_hex, UNKNOWN_PROJECT_COLOR);
}

#[test]
fn entry_filters_compose() {
    let mut doc = TimeDocument::default();
    let client = project(&mut doc, "Client");
    let internal = project(&mut doc, "Internal");
    add_entry(&mut doc, client, 10, at(day(2024, 5, 15), 9));
    add_entry(&mut doc, client, 20, at(day(2024, 5, 15), 13));
    add_entry(&mut doc, internal, 30, at(day(2024, 5, 15), 11));
    add_entry(&mut doc, client, 40, at(day(2024, 5, 16), 9));

    let all = filter_entries(&doc, None, None);
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].duration_minutes, 40);

    let minutes: Vec<u32> = filter_entries(&doc, Some(day(2024, 5, 15)), Some(client))
        .iter()
        .map(|e| e.duration_minutes)
        .collect();
    assert_eq!(minutes, vec![20, 10]);
}
