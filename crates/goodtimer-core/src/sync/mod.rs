//! Keeping every surface looking at the same data.
//!
//! [`StoreBroker`] is the one writer inside a process and announces each
//! committed change. [`spawn_poller`] watches the persisted document for
//! writes made by other processes and feeds them through the same channel.

mod broker;
mod poller;

pub use broker::{ChangeKind, StoreBroker, StoreChange};
pub use poller::spawn_poller;
