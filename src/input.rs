//! Per-frame controller snapshot handed to the core.
use serde::{Deserialize, Serialize};

/// Decoded controller state for one frame. Read-only to the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorInput {
    /// Stick deflection in `[0, 1]`.
    pub stick_magnitude: f32,
    /// Stick deflection to the right.
    pub stick_x: f32,
    /// Stick deflection forwards.
    pub stick_y: f32,
    /// Seconds the jump button has been held.
    pub jump_time_held: f32,
    /// Whether the jump button is down this frame.
    pub jump_hold: bool,
    /// Whether the jump button came up this frame.
    pub jump_released: bool,
}

impl ActorInput {
    /// Snapshot with the stick pushed along `(x, y)`.
    ///
    /// The magnitude is clamped to `1.0`.
    #[must_use]
    pub fn stick(stick_x: f32, stick_y: f32) -> Self {
        Self {
            stick_magnitude: stick_x.hypot(stick_y).min(1.0),
            stick_x,
            stick_y,
            ..Self::default()
        }
    }

    /// Returns the same snapshot with the jump button held for `held` seconds.
    #[must_use]
    pub const fn with_jump_held(mut self, held: f32) -> Self {
        self.jump_hold = true;
        self.jump_time_held = held;
        self
    }
}
