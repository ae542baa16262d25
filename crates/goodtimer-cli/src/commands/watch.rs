//! The "mini view": today's numbers, reprinted on every data change.

use std::time::Duration;

use goodtimer_core::stats::today_stats;
use goodtimer_core::{spawn_poller, Config};
use tokio::sync::broadcast::error::RecvError;

use super::{block_on, open_broker, print_json_line, CliResult};

pub fn run(config: &Config) -> CliResult {
    block_on(watch(config))
}

async fn watch(config: &Config) -> CliResult {
    let broker = open_broker(config)?;
    let mut changes = broker.subscribe();
    let poller = spawn_poller(
        broker.clone(),
        Duration::from_secs(config.sync.poll_interval_secs),
    );

    print_json_line(&today_stats(&broker.snapshot()))?;
    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    print_json_line(&today_stats(&broker.snapshot()))?;
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    poller.abort();
    Ok(())
}
