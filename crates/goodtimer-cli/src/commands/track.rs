use std::time::Duration;

use clap::Subcommand;
use goodtimer_core::{spawn_poller, Config, Controller, TracingNotifier};
use tokio::time::{self, MissedTickBehavior};

use super::{block_on, open_broker, print_json_line, CliResult};

#[derive(Subcommand)]
pub enum TrackAction {
    /// Track time against a project until Ctrl-C
    Run {
        /// Project ID
        #[arg(long)]
        project: u64,
        /// What you are working on
        #[arg(long, default_value = "")]
        description: String,
        /// Stop automatically after this many seconds
        #[arg(long)]
        for_secs: Option<u64>,
    },
}

pub fn run(action: TrackAction, config: &Config) -> CliResult {
    match action {
        TrackAction::Run {
            project,
            description,
            for_secs,
        } => block_on(track(config, project, description, for_secs)),
    }
}

async fn track(config: &Config, project: u64, description: String, for_secs: Option<u64>) -> CliResult {
    let broker = open_broker(config)?;
    let poller = spawn_poller(
        broker.clone(),
        Duration::from_secs(config.sync.poll_interval_secs),
    );
    let mut controller = Controller::new(broker, Box::new(TracingNotifier))?;
    print_json_line(&controller.start_tracking(Some(project), description)?)?;

    let mut ticker = time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        if for_secs.is_some_and(|limit| controller.tracking().elapsed_secs() >= limit) {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                controller.tick_tracking();
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.abort();
    if let Some(event) = controller.stop_tracking() {
        print_json_line(&event)?;
    }
    Ok(())
}
