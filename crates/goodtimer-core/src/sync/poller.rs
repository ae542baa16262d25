use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::StoreBroker;
use crate::storage::Persist;

/// Re-read the persisted document every `every` and announce external
/// changes through the broker. Runs until the returned handle is aborted.
pub fn spawn_poller<P>(broker: Arc<StoreBroker<P>>, every: Duration) -> JoinHandle<()>
where
    P: Persist + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the broker was just loaded.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if broker.refresh() {
                tracing::debug!("picked up external store change");
            }
        }
    })
}
