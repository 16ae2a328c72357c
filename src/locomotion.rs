//! Discrete locomotion states and the tuning lookups keyed by them.
//!
//! Steering and animation blending both read speeds and rates through these
//! lookups so the two never disagree about what a state means.

use serde::{Deserialize, Serialize};

use crate::config::ActorSettings;

/// Classification of what the actor is currently doing.
///
/// [`LocomotionState::Empty`] is the zero value. It marks an uninitialised
/// slot and is never the steady state of an active actor.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum LocomotionState {
    /// No state assigned yet.
    #[default]
    Empty,
    /// Standing still.
    StandIdle,
    /// Grounded at walking pace.
    Walking,
    /// Grounded at running pace.
    Running,
    /// Grounded at full stick deflection.
    Sprinting,
    /// Inertial roll along the body heading.
    Roll,
    /// Rising after leaving the ground.
    Jump,
    /// Airborne and not rising.
    Falling,
}

impl LocomotionState {
    /// Whether the state is one of the airborne states.
    #[must_use]
    pub const fn is_airborne(self) -> bool {
        matches!(self, Self::Jump | Self::Falling)
    }

    /// Planar speed the actor steers towards in this state.
    ///
    /// Idle targets rest. Roll depends on the state rolled out of, see
    /// [`Self::roll_target_speed`]; airborne states have no planar target.
    #[must_use]
    pub const fn target_speed(self, settings: &ActorSettings) -> Option<f32> {
        match self {
            Self::StandIdle => Some(0.0),
            Self::Walking => Some(settings.walk_target_speed),
            Self::Running => Some(settings.run_target_speed),
            Self::Sprinting => Some(settings.sprint_target_speed),
            Self::Empty | Self::Roll | Self::Jump | Self::Falling => None,
        }
    }

    /// Approach rate used when steering in this state.
    ///
    /// Sprinting shares the run rate; airborne states use aerial control.
    #[must_use]
    pub const fn acceleration_rate(self, settings: &ActorSettings) -> Option<f32> {
        match self {
            Self::StandIdle => Some(settings.idle_acceleration_rate),
            Self::Walking => Some(settings.walk_acceleration_rate),
            Self::Running | Self::Sprinting => Some(settings.run_acceleration_rate),
            Self::Roll => Some(settings.roll_acceleration_rate),
            Self::Jump | Self::Falling => Some(settings.aerial_control_rate),
            Self::Empty => None,
        }
    }

    /// Planar target speed of a roll started from `self`.
    ///
    /// `grip` selects the slower variant used once the stick is released
    /// mid-roll. Only idle rolls have a dedicated grip speed; the others keep
    /// their roll speed and only switch to the grip rate.
    #[must_use]
    pub const fn roll_target_speed(self, grip: bool, settings: &ActorSettings) -> f32 {
        match self {
            Self::Walking => settings.walk_to_roll_target_speed,
            Self::Running => settings.run_to_roll_target_speed,
            Self::Sprinting => settings.sprint_to_roll_target_speed,
            _ if grip => settings.idle_to_roll_grip_target_speed,
            _ => settings.idle_to_roll_target_speed,
        }
    }
}
