pub mod config;
pub mod data;
pub mod entry;
pub mod project;
pub mod settings;
pub mod stats;
pub mod timer;
pub mod track;
pub mod watch;

use std::future::Future;
use std::sync::Arc;

use goodtimer_core::{Config, JsonFilePersist, StoreBroker, TimeStore};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the configured document, creating it on first use.
pub fn open_store(config: &Config) -> CliResult<TimeStore<JsonFilePersist>> {
    let store = TimeStore::new(config.persist()?);
    if !store.initialize() {
        tracing::warn!(path = %store.persist().path().display(), "could not create data file");
    }
    Ok(store)
}

pub fn open_broker(config: &Config) -> CliResult<Arc<StoreBroker<JsonFilePersist>>> {
    Ok(Arc::new(StoreBroker::open(open_store(config)?)))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One JSON object per line, for streams of events.
pub fn print_json_line<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Drive a long-running command on a single-threaded runtime.
pub fn block_on<F: Future<Output = CliResult>>(future: F) -> CliResult {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}
