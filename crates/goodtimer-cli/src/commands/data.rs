use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use goodtimer_core::storage::FilePathDialog;
use goodtimer_core::Config;

use super::{open_broker, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write all data to a JSON file
    Export {
        /// Target file; defaults to good-timer-backup-<date>.json here
        path: Option<PathBuf>,
    },
    /// Replace all data with a previously exported file
    Import { path: PathBuf },
    /// Delete all sessions, projects and time entries; settings are kept
    Clear {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction, config: &Config) -> CliResult {
    let broker = open_broker(config)?;
    match action {
        DataAction::Export { path } => {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(FilePathDialog::backup_file_name(Local::now().date_naive()))
            });
            broker.export(&FilePathDialog::new(&path))?;
            println!("exported to {}", path.display());
        }
        DataAction::Import { path } => {
            broker.import(&FilePathDialog::new(&path))?;
            println!("imported {}", path.display());
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            broker.clear_all()?;
            println!("all data cleared");
        }
    }
    Ok(())
}
