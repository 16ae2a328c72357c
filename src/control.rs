//! Input-to-steering translation.
//!
//! The core only integrates whatever acceleration steering requested, so a
//! [`SteeringController`] must set every axis each frame. [`InputSteering`]
//! is the reference controller: it reads the actor's input snapshot and the
//! locomotion table and issues one request per axis group.

use crate::actor::Actor;
use crate::constants::STICK_DEAD_ZONE;
use crate::locomotion::LocomotionState;
use crate::physics::{decelerate_to_rest, steer_toward_planar_target, steer_vertical, HeadingSource};
use crate::vector_math::deg;

/// Turns the actor's current input into steering requests.
pub trait SteeringController {
    /// Issues this frame's steering requests for `actor`.
    fn steer(&mut self, actor: &mut Actor, frame_time: f32);
}

/// Camera-relative stick steering.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSteering {
    /// Camera yaw in degrees; stick directions are relative to it.
    pub camera_yaw: f32,
}

impl InputSteering {
    /// Steering relative to a camera facing `camera_yaw` degrees.
    #[must_use]
    pub const fn new(camera_yaw: f32) -> Self {
        Self { camera_yaw }
    }

    fn steer_planar(&self, actor: &mut Actor) {
        let input = actor.input;
        let settings = actor.settings;
        let stick_held = input.stick_magnitude >= STICK_DEAD_ZONE;
        if stick_held {
            actor.target_yaw = self.camera_yaw + deg(input.stick_x.atan2(input.stick_y));
        }

        match actor.state {
            LocomotionState::Roll => {
                let grip = !stick_held;
                let speed = actor.previous_state.roll_target_speed(grip, &settings);
                let rate = if grip {
                    settings.roll_acceleration_grip_rate
                } else {
                    settings.roll_acceleration_rate
                };
                steer_toward_planar_target(actor, speed, HeadingSource::BodyHeading, rate);
            }
            state if state.is_airborne() => {
                if stick_held {
                    let speed = settings.run_target_speed * input.stick_magnitude;
                    steer_toward_planar_target(
                        actor,
                        speed,
                        HeadingSource::TargetYaw,
                        settings.aerial_control_rate,
                    );
                } else {
                    // Keep momentum through the air.
                    actor.body.acceleration.x = 0.0;
                    actor.body.acceleration.y = 0.0;
                }
            }
            state => {
                let target = state
                    .target_speed(&settings)
                    .filter(|speed| *speed > 0.0)
                    .zip(state.acceleration_rate(&settings));
                match target {
                    Some((speed, rate)) if stick_held => {
                        steer_toward_planar_target(actor, speed, HeadingSource::TargetYaw, rate);
                    }
                    _ => decelerate_to_rest(actor),
                }
            }
        }
    }

    fn steer_height(actor: &mut Actor) {
        let input = actor.input;
        let settings = actor.settings;
        match actor.state {
            LocomotionState::Jump
                if input.jump_hold && input.jump_time_held < settings.jump_timer_max =>
            {
                steer_vertical(actor, settings.jump_target_speed, settings.jump_acceleration_rate);
            }
            state if actor.grounded && !state.is_airborne() => {
                steer_vertical(actor, 0.0, settings.idle_acceleration_rate);
            }
            _ => {
                steer_vertical(actor, -settings.jump_target_speed, settings.aerial_control_rate);
            }
        }
    }
}

impl SteeringController for InputSteering {
    fn steer(&mut self, actor: &mut Actor, _frame_time: f32) {
        self.steer_planar(actor);
        Self::steer_height(actor);
    }
}
