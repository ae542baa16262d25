use std::time::Duration;

use clap::Subcommand;
use goodtimer_core::{spawn_poller, Config, Controller, Event, PomodoroEngine, TracingNotifier};
use tokio::time::{self, MissedTickBehavior};

use super::{block_on, open_broker, print_json, print_json_line, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the pomodoro cycle in the foreground until Ctrl-C
    Run {
        /// Stop after this many phases have completed
        #[arg(long)]
        cycles: Option<u32>,
    },
    /// Print the timer as it would start with the current settings
    Status,
}

pub fn run(action: TimerAction, config: &Config) -> CliResult {
    match action {
        TimerAction::Run { cycles } => block_on(run_cycles(config, cycles)),
        TimerAction::Status => {
            let broker = open_broker(config)?;
            let engine = PomodoroEngine::new(broker.settings())?;
            print_json(&engine.snapshot())
        }
    }
}

async fn run_cycles(config: &Config, cycles: Option<u32>) -> CliResult {
    let broker = open_broker(config)?;
    let mut changes = broker.subscribe();
    let poller = spawn_poller(
        broker.clone(),
        Duration::from_secs(config.sync.poll_interval_secs),
    );
    let mut controller = Controller::new(broker, Box::new(TracingNotifier))?;

    let mut ticker = time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    if let Some(event) = controller.start_timer() {
        print_json_line(&event)?;
    }

    let mut completed = 0u32;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(event) = controller.tick_timer() else {
                    continue;
                };
                match &event {
                    Event::PhaseCompleted { .. } => {
                        print_json_line(&event)?;
                        completed += 1;
                        if cycles.is_some_and(|n| completed >= n) {
                            break;
                        }
                        if let Some(started) = controller.start_timer() {
                            print_json_line(&started)?;
                        }
                    }
                    // One line per minute is enough for a terminal.
                    Event::TimerTick { remaining_secs, .. } if remaining_secs % 60 == 0 => {
                        print_json_line(&event)?;
                    }
                    _ => {}
                }
            }
            Ok(_) = changes.recv() => {
                // Settings may have been changed by another invocation.
                controller.sync_settings();
            }
            _ = tokio::signal::ctrl_c() => {
                // An interrupted phase is abandoned, not logged.
                print_json_line(&controller.reset_timer())?;
                break;
            }
        }
    }
    poller.abort();
    Ok(())
}
