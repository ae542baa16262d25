use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};
use goodtimer_core::stats::{goal_progress, period_report, today_stats, DateRange, ReportPeriod};
use goodtimer_core::Config;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and tracked time
    Today,
    /// Progress toward the daily goals
    Goals,
    /// Report over a period
    Report {
        #[arg(long, value_enum, default_value_t = Period::Week)]
        period: Period,
        /// First day of a custom period (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of a custom period, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Period {
    Today,
    Week,
    Month,
    Custom,
}

pub fn run(action: StatsAction, config: &Config) -> CliResult {
    let doc = open_store(config)?.load();
    match action {
        StatsAction::Today => print_json(&today_stats(&doc)),
        StatsAction::Goals => print_json(&goal_progress(&doc)),
        StatsAction::Report { period, from, to } => {
            let period = match period {
                Period::Today => ReportPeriod::Today,
                Period::Week => ReportPeriod::Week,
                Period::Month => ReportPeriod::Month,
                Period::Custom => match (from, to) {
                    (Some(start), Some(end)) => ReportPeriod::Custom { start, end },
                    _ => return Err("custom period needs --from and --to".into()),
                },
            };
            let range = DateRange::for_period(period, Local::now().date_naive())?;
            print_json(&period_report(&doc, range))
        }
    }
}
