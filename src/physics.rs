//! Rigid body state and the per-frame integrator.
//!
//! Steering uses a first-order approach law: acceleration is proportional to
//! the velocity error, never to a position error. The integrator is a
//! semi-implicit Euler step with a snap-to-zero guard that removes the
//! residual creep the approach law leaves behind as it decays.

use glam::{Vec2, Vec3};

use crate::actor::Actor;
use crate::constants::SNAP_TO_ZERO_SPEED;
use crate::vector_math::{heading_direction, heading_of, planar};

/// Kinematic state of one body. Rotation is in degrees; `rotation.z` is the
/// heading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidBody {
    /// World position.
    pub position: Vec3,
    /// Units per second.
    pub velocity: Vec3,
    /// Requested by steering each frame; the integrator only consumes it.
    pub acceleration: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
}

/// Where a planar steering request takes its heading from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingSource {
    /// The externally supplied target yaw (camera-relative steering).
    TargetYaw,
    /// The body's own current heading (inertial steering, e.g. rolling).
    BodyHeading,
}

/// Outcome of one [`RigidBody::integrate`] step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanarMotion {
    /// Horizontal velocity is zero; heading and speed were left alone.
    AtRest,
    /// The body moves on the ground plane at `speed`.
    Moving {
        /// Length of the horizontal velocity.
        speed: f32,
    },
}

impl RigidBody {
    /// Body at rest at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Current heading in degrees.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        self.rotation.z
    }

    /// Sets horizontal acceleration so velocity approaches `target`.
    pub fn approach_planar(&mut self, target: Vec2, rate: f32) {
        let error = target - planar(self.velocity);
        self.acceleration.x = rate * error.x;
        self.acceleration.y = rate * error.y;
    }

    /// Sets vertical acceleration so `velocity.z` approaches `target_speed`.
    pub fn approach_vertical(&mut self, target_speed: f32, rate: f32) {
        self.acceleration.z = rate * (target_speed - self.velocity.z);
    }

    /// Advances the body by `dt` seconds.
    ///
    /// Heading is recomputed only while the body moves horizontally, so a body
    /// at rest keeps facing where it last went.
    pub fn integrate(&mut self, dt: f32) -> PlanarMotion {
        if self.acceleration != Vec3::ZERO {
            self.velocity += self.acceleration * dt;
        }

        if self.velocity.x.abs() < SNAP_TO_ZERO_SPEED
            && self.velocity.y.abs() < SNAP_TO_ZERO_SPEED
        {
            self.velocity.x = 0.0;
            self.velocity.y = 0.0;
        }

        if self.velocity != Vec3::ZERO {
            self.position += self.velocity * dt;
        }

        let horizontal = planar(self.velocity);
        if horizontal == Vec2::ZERO {
            return PlanarMotion::AtRest;
        }
        self.rotation.z = heading_of(horizontal);
        PlanarMotion::Moving {
            speed: horizontal.length(),
        }
    }
}

/// Steers the actor's planar velocity towards `target_speed` along a heading.
///
/// Stores the resulting target velocity on the actor and leaves its vertical
/// component untouched.
pub fn steer_toward_planar_target(
    actor: &mut Actor,
    target_speed: f32,
    source: HeadingSource,
    approach_rate: f32,
) {
    let heading = match source {
        HeadingSource::TargetYaw => actor.target_yaw,
        HeadingSource::BodyHeading => actor.body.heading(),
    };
    let target = heading_direction(heading) * target_speed;
    actor.target_velocity.x = target.x;
    actor.target_velocity.y = target.y;
    actor.body.approach_planar(target, approach_rate);
}

/// Brings the actor's planar velocity to rest at the idle approach rate.
pub fn decelerate_to_rest(actor: &mut Actor) {
    let rate = actor.settings.idle_acceleration_rate;
    actor.body.approach_planar(Vec2::ZERO, rate);
}

/// Steers vertical velocity towards `target_speed` (jumping, falling).
pub fn steer_vertical(actor: &mut Actor, target_speed: f32, approach_rate: f32) {
    actor.body.approach_vertical(target_speed, approach_rate);
}

/// Integrates the actor's body one frame and refreshes the cached
/// horizontal speed while it moves.
pub fn integrate(actor: &mut Actor, dt: f32) {
    match actor.body.integrate(dt) {
        PlanarMotion::Moving { speed } => {
            actor.horizontal_speed = speed;
            log::trace!(
                "actor {} moving at {speed:.2}, heading {:.1}",
                actor.id,
                actor.body.heading()
            );
        }
        PlanarMotion::AtRest => {}
    }
}

/// Snaps the actor onto its grounding height when it reaches or passes it.
///
/// Downward vertical velocity is cancelled on contact; the grounded flag is
/// cleared whenever the body is above the ground.
pub fn resolve_grounding(actor: &mut Actor) {
    let floor = actor.grounding_height;
    if actor.body.position.z > floor {
        actor.grounded = false;
        return;
    }
    if !actor.grounded {
        log::debug!("actor {} landed at height {floor}", actor.id);
    }
    actor.body.position.z = floor;
    actor.body.velocity.z = actor.body.velocity.z.max(0.0);
    actor.grounded = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn body_at_rest_skips_everything() {
        let mut body = RigidBody::at(Vec3::new(1.0, 2.0, 0.0));
        body.rotation.z = 42.0;
        assert_eq!(body.integrate(1.0 / 60.0), PlanarMotion::AtRest);
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 0.0));
        assert!((body.heading() - 42.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn slow_drift_snaps_but_vertical_motion_survives() {
        let mut body = RigidBody {
            velocity: Vec3::new(9.0, -9.5, 30.0),
            ..RigidBody::default()
        };
        body.integrate(0.5);
        assert_eq!(body.velocity, Vec3::new(0.0, 0.0, 30.0));
        assert!((body.position.z - 15.0).abs() < 1e-5);
    }

    #[rstest]
    fn vertical_approach_only_touches_z() {
        let mut body = RigidBody {
            velocity: Vec3::new(100.0, 50.0, 0.0),
            ..RigidBody::default()
        };
        body.approach_vertical(800.0, 50.0);
        assert_eq!(body.acceleration, Vec3::new(0.0, 0.0, 40_000.0));
    }
}
