//! Actor tuning table and its optional JSON override file.
//!
//! [`ActorSettings::default`] is the authoritative tuning data. A settings
//! file only needs to name the fields it changes; everything else falls back
//! to the defaults in [`crate::constants`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AERIAL_CONTROL_RATE, IDLE_ACCELERATION_RATE, IDLE_TO_ROLL_GRIP_TARGET_SPEED,
    IDLE_TO_ROLL_TARGET_SPEED, JUMP_ACCELERATION_RATE, JUMP_TARGET_SPEED, JUMP_TIMER_MAX,
    ROLL_ACCELERATION_GRIP_RATE, ROLL_ACCELERATION_RATE, RUN_ACCELERATION_RATE,
    RUN_TARGET_SPEED, RUN_TO_ROLL_TARGET_SPEED, SPRINT_TARGET_SPEED,
    SPRINT_TO_ROLL_TARGET_SPEED, WALK_ACCELERATION_RATE, WALK_TARGET_SPEED,
    WALK_TO_ROLL_TARGET_SPEED,
};

/// Errors raised while loading an [`ActorSettings`] override file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid settings JSON.
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A tuning value is non-finite or non-positive.
    #[error("setting `{field}` must be finite and positive, got {value}")]
    Invalid {
        /// Name of the rejected field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}

/// Per-state acceleration rates and target speeds for one actor.
///
/// Immutable once the actor is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSettings {
    /// Approach rate while standing or braking to rest.
    pub idle_acceleration_rate: f32,
    /// Approach rate while walking.
    pub walk_acceleration_rate: f32,
    /// Approach rate while running or sprinting.
    pub run_acceleration_rate: f32,
    /// Roll approach rate with the stick held.
    pub roll_acceleration_rate: f32,
    /// Roll approach rate with the stick released.
    pub roll_acceleration_grip_rate: f32,
    /// Vertical approach rate while a jump is held.
    pub jump_acceleration_rate: f32,
    /// Approach rate for steering in the air and for falling.
    pub aerial_control_rate: f32,

    /// Walking speed.
    pub walk_target_speed: f32,
    /// Running speed.
    pub run_target_speed: f32,
    /// Sprinting speed.
    pub sprint_target_speed: f32,
    /// Roll speed out of idle with the stick held.
    pub idle_to_roll_target_speed: f32,
    /// Roll speed out of idle with the stick released.
    pub idle_to_roll_grip_target_speed: f32,
    /// Roll speed out of walking.
    pub walk_to_roll_target_speed: f32,
    /// Roll speed out of running.
    pub run_to_roll_target_speed: f32,
    /// Roll speed out of sprinting.
    pub sprint_to_roll_target_speed: f32,
    /// Vertical speed of a held jump; falling uses its negation.
    pub jump_target_speed: f32,

    /// Seconds a held jump keeps steering upwards.
    pub jump_timer_max: f32,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            idle_acceleration_rate: IDLE_ACCELERATION_RATE,
            walk_acceleration_rate: WALK_ACCELERATION_RATE,
            run_acceleration_rate: RUN_ACCELERATION_RATE,
            roll_acceleration_rate: ROLL_ACCELERATION_RATE,
            roll_acceleration_grip_rate: ROLL_ACCELERATION_GRIP_RATE,
            jump_acceleration_rate: JUMP_ACCELERATION_RATE,
            aerial_control_rate: AERIAL_CONTROL_RATE,
            walk_target_speed: WALK_TARGET_SPEED,
            run_target_speed: RUN_TARGET_SPEED,
            sprint_target_speed: SPRINT_TARGET_SPEED,
            idle_to_roll_target_speed: IDLE_TO_ROLL_TARGET_SPEED,
            idle_to_roll_grip_target_speed: IDLE_TO_ROLL_GRIP_TARGET_SPEED,
            walk_to_roll_target_speed: WALK_TO_ROLL_TARGET_SPEED,
            run_to_roll_target_speed: RUN_TO_ROLL_TARGET_SPEED,
            sprint_to_roll_target_speed: SPRINT_TO_ROLL_TARGET_SPEED,
            jump_target_speed: JUMP_TARGET_SPEED,
            jump_timer_max: JUMP_TIMER_MAX,
        }
    }
}

impl ActorSettings {
    /// Loads settings from a JSON file, filling absent fields with defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, is not valid
    /// JSON, or contains a non-positive value.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded actor settings from {}", path.display());
        Ok(settings)
    }

    /// Checks that every rate, speed and timer is finite and positive.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }

    const fn fields(&self) -> [(&'static str, f32); 17] {
        [
            ("idle_acceleration_rate", self.idle_acceleration_rate),
            ("walk_acceleration_rate", self.walk_acceleration_rate),
            ("run_acceleration_rate", self.run_acceleration_rate),
            ("roll_acceleration_rate", self.roll_acceleration_rate),
            ("roll_acceleration_grip_rate", self.roll_acceleration_grip_rate),
            ("jump_acceleration_rate", self.jump_acceleration_rate),
            ("aerial_control_rate", self.aerial_control_rate),
            ("walk_target_speed", self.walk_target_speed),
            ("run_target_speed", self.run_target_speed),
            ("sprint_target_speed", self.sprint_target_speed),
            ("idle_to_roll_target_speed", self.idle_to_roll_target_speed),
            (
                "idle_to_roll_grip_target_speed",
                self.idle_to_roll_grip_target_speed,
            ),
            ("walk_to_roll_target_speed", self.walk_to_roll_target_speed),
            ("run_to_roll_target_speed", self.run_to_roll_target_speed),
            ("sprint_to_roll_target_speed", self.sprint_to_roll_target_speed),
            ("jump_target_speed", self.jump_target_speed),
            ("jump_timer_max", self.jump_timer_max),
        ]
    }
}
