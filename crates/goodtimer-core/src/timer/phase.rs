use serde::{Deserialize, Serialize};

/// Pomodoro phase. Serialized as `work`, `shortBreak`, `longBreak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Work)
    }

    /// Status line shown for this phase.
    pub fn label(self, running: bool) -> &'static str {
        match (self, running) {
            (Phase::Work, true) => "Focusing",
            (Phase::Work, false) => "Ready to focus",
            (Phase::ShortBreak, true) => "Short break",
            (Phase::ShortBreak, false) => "Ready for a short break",
            (Phase::LongBreak, true) => "Long break",
            (Phase::LongBreak, false) => "Ready for a long break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// `MM:SS`, minutes uncapped.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// `HH:MM:SS`, hours uncapped.
pub fn format_stopwatch(total_secs: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::ShortBreak).unwrap(), "\"shortBreak\"");
        assert_eq!(
            serde_json::from_str::<Phase>("\"longBreak\"").unwrap(),
            Phase::LongBreak
        );
        assert_eq!(serde_json::to_string(&TimerState::Paused).unwrap(), "\"paused\"");
    }

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(120 * 60 + 5), "120:05");
        assert_eq!(format_stopwatch(3725), "01:02:05");
    }
}
