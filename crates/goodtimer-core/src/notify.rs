//! Notification requests and the collaborator that delivers them.

use serde::{Deserialize, Serialize};

use crate::timer::Phase;

pub const NOTIFICATION_TITLE: &str = "Good Timer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

impl Notification {
    /// Request announcing the phase that has just become current.
    pub fn phase_completed(next: Phase, sound: bool) -> Self {
        let body = match next {
            Phase::ShortBreak => "Work complete! Time for a short break.",
            Phase::LongBreak => "Pomodoro round complete! Time for a long break.",
            Phase::Work => "Break over! Ready for the next pomodoro.",
        };
        Self {
            title: NOTIFICATION_TITLE.into(),
            body: body.into(),
            sound,
        }
    }
}

/// Fire-and-forget delivery. Implementations log their own failures.
pub trait Notifier: Send + Sync {
    fn show(&self, notification: &Notification);
}

/// Writes notifications to the log instead of a desktop service.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, notification: &Notification) {
        tracing::info!(
            title = %notification.title,
            sound = notification.sound,
            "{}",
            notification.body
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_names_the_next_phase() {
        let n = Notification::phase_completed(Phase::LongBreak, true);
        assert_eq!(n.title, NOTIFICATION_TITLE);
        assert!(n.body.contains("long break"));
        assert!(n.sound);
        assert!(Notification::phase_completed(Phase::Work, false)
            .body
            .starts_with("Break over"));
    }
}
