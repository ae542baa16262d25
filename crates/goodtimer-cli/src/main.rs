use clap::{Parser, Subcommand};
use goodtimer_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "goodtimer", version, about = "Good Timer: pomodoro timer and time tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pomodoro timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Manual time tracking
    Track {
        #[command(subcommand)]
        action: commands::track::TrackAction,
    },
    /// Project management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Time entries
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Statistics and reports
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Timer and goal settings stored with the data
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export, import and clear data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Print today's stats whenever the data changes
    Watch,
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Track { action } => commands::track::run(action, &config),
        Commands::Project { action } => commands::project::run(action, &config),
        Commands::Entry { action } => commands::entry::run(action, &config),
        Commands::Stats { action } => commands::stats::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action, &config),
        Commands::Watch => commands::watch::run(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
