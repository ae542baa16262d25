//! User productivity settings.
//!
//! Settings live inside the time document rather than the TOML config, so
//! they travel with exports. Keys are the camelCase names used on disk; the
//! legacy names written by older releases are accepted as aliases.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timer::Phase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_pomodoro_minutes", alias = "pomodoroTime")]
    pub pomodoro_minutes: u32,
    #[serde(default = "default_short_break_minutes", alias = "shortBreakTime")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes", alias = "longBreakTime")]
    pub long_break_minutes: u32,
    /// Work sessions per long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub notification_enabled: bool,
    #[serde(default = "default_daily_goal_hours", alias = "dailyGoal")]
    pub daily_goal_hours: f64,
    #[serde(default = "default_pomodoro_goal_count", alias = "pomodoroGoal")]
    pub pomodoro_goal_count: u32,
}

fn default_pomodoro_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_daily_goal_hours() -> f64 {
    8.0
}
fn default_pomodoro_goal_count() -> u32 {
    8
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_minutes: default_pomodoro_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            sound_enabled: true,
            notification_enabled: true,
            daily_goal_hours: default_daily_goal_hours(),
            pomodoro_goal_count: default_pomodoro_goal_count(),
        }
    }
}

impl Settings {
    /// Configured length of `phase` in minutes.
    pub fn phase_minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.pomodoro_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured length of `phase` in seconds.
    pub fn phase_secs(&self, phase: Phase) -> u64 {
        u64::from(self.phase_minutes(phase)).saturating_mul(60)
    }

    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.long_break_interval < 1 {
            return Err(invalid("longBreakInterval", "must be at least 1"));
        }
        for (key, minutes) in [
            ("pomodoroMinutes", self.pomodoro_minutes),
            ("shortBreakMinutes", self.short_break_minutes),
            ("longBreakMinutes", self.long_break_minutes),
        ] {
            if minutes < 1 {
                return Err(invalid(key, "phase length must be at least 1 minute"));
            }
        }
        if !self.daily_goal_hours.is_finite() || self.daily_goal_hours <= 0.0 {
            return Err(invalid("dailyGoalHours", "must be a positive number of hours"));
        }
        if self.pomodoro_goal_count < 1 {
            return Err(invalid("pomodoroGoalCount", "must be at least 1"));
        }
        Ok(())
    }

    /// Get a setting rendered as a string by its camelCase key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Return a copy with `key` set to `value`, validated.
    ///
    /// The value is parsed according to the type of the existing field.
    ///
    /// # Errors
    /// Returns `ConfigError::UnknownKey` for keys outside the settings set,
    /// `ConfigError::InvalidValue` when the value does not parse or the
    /// resulting settings fail [`Settings::validate`].
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut json =
            serde_json::to_value(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::ParseFailed("settings are not an object".into()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|_| invalid(key, &format!("cannot parse '{value}' as bool")))?,
            serde_json::Value::Number(n) if n.is_f64() => value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number)
                .ok_or_else(|| invalid(key, &format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Number(_) => value
                .parse::<u32>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(key, &format!("cannot parse '{value}' as whole number")))?,
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: Settings = serde_json::from_value(json)
            .map_err(|e| invalid(key, &e.to_string()))?;
        updated.validate()?;
        Ok(updated)
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_values() {
        let s = Settings::default();
        assert_eq!(s.pomodoro_minutes, 25);
        assert_eq!(s.short_break_minutes, 5);
        assert_eq!(s.long_break_minutes, 15);
        assert_eq!(s.long_break_interval, 4);
        assert!(s.sound_enabled);
        assert!(s.notification_enabled);
        assert_eq!(s.daily_goal_hours, 8.0);
        assert_eq!(s.pomodoro_goal_count, 8);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_long_break_interval_is_rejected() {
        let s = Settings {
            long_break_interval: 0,
            ..Settings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "longBreakInterval"
        ));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"pomodoroMinutes": 50}"#).unwrap();
        assert_eq!(s.pomodoro_minutes, 50);
        assert_eq!(s.long_break_interval, 4);
        assert_eq!(s.daily_goal_hours, 8.0);
    }

    #[test]
    fn legacy_keys_are_accepted() {
        let s: Settings = serde_json::from_str(
            r#"{"pomodoroTime": 30, "shortBreakTime": 6, "longBreakTime": 20,
                "longBreakInterval": 3, "dailyGoal": 6, "pomodoroGoal": 10}"#,
        )
        .unwrap();
        assert_eq!(s.pomodoro_minutes, 30);
        assert_eq!(s.short_break_minutes, 6);
        assert_eq!(s.long_break_minutes, 20);
        assert_eq!(s.daily_goal_hours, 6.0);
        assert_eq!(s.pomodoro_goal_count, 10);
    }

    #[test]
    fn get_renders_values() {
        let s = Settings::default();
        assert_eq!(s.get("pomodoroMinutes").as_deref(), Some("25"));
        assert_eq!(s.get("soundEnabled").as_deref(), Some("true"));
        assert_eq!(s.get("dailyGoalHours").as_deref(), Some("8.0"));
        assert!(s.get("missing").is_none());
    }

    #[test]
    fn with_value_updates_typed_fields() {
        let s = Settings::default()
            .with_value("pomodoroMinutes", "50")
            .unwrap()
            .with_value("soundEnabled", "false")
            .unwrap()
            .with_value("dailyGoalHours", "6.5")
            .unwrap();
        assert_eq!(s.pomodoro_minutes, 50);
        assert!(!s.sound_enabled);
        assert_eq!(s.daily_goal_hours, 6.5);
    }

    #[test]
    fn with_value_rejects_unknown_key_and_bad_values() {
        let s = Settings::default();
        assert_eq!(
            s.with_value("theme", "dark"),
            Err(ConfigError::UnknownKey("theme".into()))
        );
        assert!(s.with_value("soundEnabled", "loud").is_err());
        assert!(s.with_value("pomodoroMinutes", "-3").is_err());
        assert!(s.with_value("longBreakInterval", "0").is_err());
    }

    #[test]
    fn phase_lengths_follow_settings() {
        let s = Settings::default();
        assert_eq!(s.phase_secs(Phase::Work), 25 * 60);
        assert_eq!(s.phase_secs(Phase::ShortBreak), 5 * 60);
        assert_eq!(s.phase_secs(Phase::LongBreak), 15 * 60);
    }
}
