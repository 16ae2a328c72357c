//! Tuning constants shared by the integrator, the blend engine and the
//! reference collaborators.
//!
//! Speeds are in world units per second, rates in 1/s.

/// Horizontal velocity components below this magnitude are snapped to zero
/// after each integration step.
pub const SNAP_TO_ZERO_SPEED: f32 = 10.0;

/// Default for [`crate::ActorSettings::idle_acceleration_rate`].
pub const IDLE_ACCELERATION_RATE: f32 = 9.0;
/// Default for [`crate::ActorSettings::walk_acceleration_rate`].
pub const WALK_ACCELERATION_RATE: f32 = 4.0;
/// Default for [`crate::ActorSettings::run_acceleration_rate`].
pub const RUN_ACCELERATION_RATE: f32 = 6.0;
/// Default for [`crate::ActorSettings::roll_acceleration_rate`].
pub const ROLL_ACCELERATION_RATE: f32 = 20.0;
/// Default for [`crate::ActorSettings::roll_acceleration_grip_rate`].
pub const ROLL_ACCELERATION_GRIP_RATE: f32 = 2.0;
/// Default for [`crate::ActorSettings::jump_acceleration_rate`].
pub const JUMP_ACCELERATION_RATE: f32 = 50.0;
/// Default for [`crate::ActorSettings::aerial_control_rate`].
pub const AERIAL_CONTROL_RATE: f32 = 2.5;

/// Default walking speed.
pub const WALK_TARGET_SPEED: f32 = 200.0;
/// Default running speed.
pub const RUN_TARGET_SPEED: f32 = 650.0;
/// Default sprinting speed.
pub const SPRINT_TARGET_SPEED: f32 = 900.0;
/// Default roll speed out of idle.
pub const IDLE_TO_ROLL_TARGET_SPEED: f32 = 300.0;
/// Default roll speed out of idle with the stick released.
pub const IDLE_TO_ROLL_GRIP_TARGET_SPEED: f32 = 50.0;
/// Default roll speed out of walking.
pub const WALK_TO_ROLL_TARGET_SPEED: f32 = 400.0;
/// Default roll speed out of running.
pub const RUN_TO_ROLL_TARGET_SPEED: f32 = 780.0;
/// Default roll speed out of sprinting.
pub const SPRINT_TO_ROLL_TARGET_SPEED: f32 = 980.0;
/// Default vertical speed of a held jump.
pub const JUMP_TARGET_SPEED: f32 = 800.0;

/// Seconds a held jump keeps adding upward velocity.
pub const JUMP_TIMER_MAX: f32 = 0.13;

/// Stick magnitude under which input counts as released.
pub const STICK_DEAD_ZONE: f32 = 0.1;
/// Stick magnitude at which the reference classifier switches to running.
pub const STICK_RUN_THRESHOLD: f32 = 0.6;
/// Stick magnitude at which the reference classifier switches to sprinting.
pub const STICK_SPRINT_THRESHOLD: f32 = 0.95;

/// Default frame time used by the headless runner (60 Hz).
pub const DEFAULT_FRAME_TIME: f32 = 1.0 / 60.0;

// Clip names the actor binds.

/// Standing loop.
pub const CLIP_IDLE: &str = "idle-breathing-left";
/// Idle to walk step.
pub const CLIP_TRANSITION: &str = "transition-left";
/// Walking loop.
pub const CLIP_WALK: &str = "walking-left";
/// Slow run overlaid on walking; shares the running clip.
pub const CLIP_JOG: &str = "running-10-left";
/// Running loop.
pub const CLIP_RUN: &str = "running-10-left";
/// Sprinting loop.
pub const CLIP_SPRINT: &str = "running-60-left";
/// Optional roll clip.
pub const CLIP_ROLL: &str = "roll-left";
/// Optional jump clip.
pub const CLIP_JUMP: &str = "jump-left";
/// Optional falling clip.
pub const CLIP_FALL: &str = "falling-left";
/// Optional landing clip.
pub const CLIP_LAND: &str = "landing-left";
