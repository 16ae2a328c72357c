//! Locomotion state classification.
use crate::actor::Actor;
use crate::constants::{STICK_DEAD_ZONE, STICK_RUN_THRESHOLD, STICK_SPRINT_THRESHOLD};
use crate::locomotion::LocomotionState;

/// Decides the actor's next locomotion state from its physical state and
/// input. Must never return [`LocomotionState::Empty`].
pub trait StateClassifier {
    /// Picks the state `actor` should be in this frame.
    fn classify(&mut self, actor: &Actor) -> LocomotionState;
}

/// Reference classifier driven by stick intent.
///
/// Airborne actors jump while rising and fall otherwise. A grounded actor
/// starts a jump while the button is held within the jump timer; else the
/// stick magnitude picks idle, walking, running or sprinting. It never
/// emits [`LocomotionState::Roll`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl StateClassifier for IntentClassifier {
    fn classify(&mut self, actor: &Actor) -> LocomotionState {
        let input = &actor.input;
        if !actor.grounded {
            return if actor.body.velocity.z > 0.0 {
                LocomotionState::Jump
            } else {
                LocomotionState::Falling
            };
        }
        if input.jump_hold && input.jump_time_held < actor.settings.jump_timer_max {
            return LocomotionState::Jump;
        }
        match input.stick_magnitude {
            m if m < STICK_DEAD_ZONE => LocomotionState::StandIdle,
            m if m < STICK_RUN_THRESHOLD => LocomotionState::Walking,
            m if m < STICK_SPRINT_THRESHOLD => LocomotionState::Running,
            _ => LocomotionState::Sprinting,
        }
    }
}
