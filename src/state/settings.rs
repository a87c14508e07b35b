//! User settings: workout durations plus feedback preferences, and their sanitizer

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::WorkoutConfig;

pub const COUNTDOWN_LIMITS: RangeInclusive<u32> = 0..=60;
pub const WORK_LIMITS: RangeInclusive<u32> = 5..=3600;
pub const REST_LIMITS: RangeInclusive<u32> = 0..=3600;
pub const ROUNDS_LIMITS: RangeInclusive<u32> = 1..=50;
pub const COOLDOWN_LIMITS: RangeInclusive<u32> = 0..=3600;

/// Which cues the orchestration layer is allowed to actuate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPrefs {
    pub audio_enabled: bool,
    pub final_10_beeps: bool,
    pub transition_sounds: bool,
    pub haptics_enabled: bool,
}

impl Default for FeedbackPrefs {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            final_10_beeps: true,
            transition_sounds: true,
            haptics_enabled: true,
        }
    }
}

/// Complete settings record as edited by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub workout: WorkoutConfig,
    #[serde(flatten)]
    pub feedback: FeedbackPrefs,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workout: WorkoutConfig {
                countdown_sec: 10,
                work_sec: 120,
                rest_sec: 30,
                cooldown_sec: 0,
                rounds: 8,
            },
            feedback: FeedbackPrefs::default(),
        }
    }
}

/// A settings field that fell outside its allowed range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl Settings {
    /// Clamp every numeric field into its allowed range
    pub fn sanitize(self) -> Self {
        let w = self.workout;
        Self {
            workout: WorkoutConfig {
                countdown_sec: clamp(w.countdown_sec, &COUNTDOWN_LIMITS),
                work_sec: clamp(w.work_sec, &WORK_LIMITS),
                rest_sec: clamp(w.rest_sec, &REST_LIMITS),
                cooldown_sec: clamp(w.cooldown_sec, &COOLDOWN_LIMITS),
                rounds: clamp(w.rounds, &ROUNDS_LIMITS),
            },
            feedback: self.feedback,
        }
    }

    /// Report every out-of-range field instead of clamping it
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let w = &self.workout;
        let errors: Vec<FieldError> = [
            ("countdown_sec", w.countdown_sec, &COUNTDOWN_LIMITS),
            ("work_sec", w.work_sec, &WORK_LIMITS),
            ("rest_sec", w.rest_sec, &REST_LIMITS),
            ("rounds", w.rounds, &ROUNDS_LIMITS),
            ("cooldown_sec", w.cooldown_sec, &COOLDOWN_LIMITS),
        ]
        .into_iter()
        .filter(|(_, value, limits)| !limits.contains(value))
        .map(|(field, _, limits)| FieldError {
            field: field.to_string(),
            message: format!("Must be between {} and {}", limits.start(), limits.end()),
        })
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn clamp(value: u32, limits: &RangeInclusive<u32>) -> u32 {
    value.clamp(*limits.start(), *limits.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_into_limits() {
        let mut settings = Settings::default();
        settings.workout.countdown_sec = 600;
        settings.workout.work_sec = 1;
        settings.workout.rounds = 0;
        let clean = settings.sanitize();
        assert_eq!(clean.workout.countdown_sec, 60);
        assert_eq!(clean.workout.work_sec, 5);
        assert_eq!(clean.workout.rounds, 1);
        assert_eq!(clean.workout.rest_sec, 30);
    }

    #[test]
    fn validate_names_each_bad_field() {
        let mut settings = Settings::default();
        settings.workout.rounds = 51;
        settings.workout.work_sec = 0;
        let errors = settings.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["work_sec", "rounds"]);
        assert_eq!(errors[1].message, "Must be between 1 and 50");
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn settings_serialize_flat() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["work_sec"], 120);
        assert_eq!(json["haptics_enabled"], true);
    }
}
