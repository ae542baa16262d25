use clap::Subcommand;
use goodtimer_core::Config;

use super::{open_broker, print_json, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (e.g. "pomodoroMinutes", "dailyGoalHours")
    Get { key: String },
    /// Change a setting
    Set { key: String, value: String },
    /// Print all settings
    List,
}

pub fn run(action: SettingsAction, config: &Config) -> CliResult {
    let broker = open_broker(config)?;
    match action {
        SettingsAction::Get { key } => match broker.settings().get(&key) {
            Some(value) => {
                println!("{value}");
                Ok(())
            }
            None => Err(format!("unknown setting: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            let settings = broker.settings().with_value(&key, &value)?;
            broker.update_settings(settings.clone())?;
            print_json(&settings)
        }
        SettingsAction::List => print_json(&broker.settings()),
    }
}
