//! Project management commands for CLI.

use clap::Subcommand;
use goodtimer_core::storage::NewProject;
use goodtimer_core::Config;

use super::{open_broker, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Add {
        /// Project name
        name: String,
        /// Colour as #rrggbb
        #[arg(long)]
        color: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all projects
    List,
}

pub fn run(action: ProjectAction, config: &Config) -> CliResult {
    match action {
        ProjectAction::Add {
            name,
            color,
            description,
        } => {
            let broker = open_broker(config)?;
            let project = broker.append_project(NewProject {
                name,
                color_hex: color,
                description,
            })?;
            print_json(&project)
        }
        ProjectAction::List => print_json(&open_store(config)?.load().projects),
    }
}
