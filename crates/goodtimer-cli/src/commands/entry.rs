use chrono::NaiveDate;
use clap::Subcommand;
use goodtimer_core::stats::{filter_entries, format_duration};
use goodtimer_core::{Config, TimeEntry};
use serde::Serialize;

use super::{open_broker, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum EntryAction {
    /// List time entries, newest first
    List {
        /// Only entries started on this local date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only entries for this project ID
        #[arg(long)]
        project: Option<u64>,
    },
    /// Delete a time entry
    Delete {
        /// Entry ID
        id: u64,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRow<'a> {
    #[serde(flatten)]
    entry: &'a TimeEntry,
    project_name: &'a str,
    duration: String,
}

pub fn run(action: EntryAction, config: &Config) -> CliResult {
    match action {
        EntryAction::List { date, project } => {
            let doc = open_store(config)?.load();
            let rows: Vec<EntryRow<'_>> = filter_entries(&doc, date, project)
                .into_iter()
                .map(|entry| EntryRow {
                    entry,
                    project_name: doc.project_label(entry.project_id),
                    duration: format_duration(u64::from(entry.duration_minutes)),
                })
                .collect();
            print_json(&rows)
        }
        EntryAction::Delete { id } => {
            if !open_broker(config)?.delete_time_entry(id)? {
                return Err(format!("no time entry with id {id}").into());
            }
            println!("deleted {id}");
            Ok(())
        }
    }
}
