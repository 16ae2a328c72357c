//! Basic vector math helper functions.
//! Angle conversions and ground-plane helpers shared by steering and the
//! integrator. The ground plane is x/y; z points up.
use glam::{Vec2, Vec3};

/// Converts degrees to radians.
#[must_use]
pub const fn rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Converts radians to degrees.
#[must_use]
pub const fn deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Returns the horizontal (x/y) part of a vector.
#[must_use]
pub const fn planar(vector: Vec3) -> Vec2 {
    Vec2::new(vector.x, vector.y)
}

/// Unit direction on the ground plane for a heading in degrees.
///
/// A heading of zero faces `-y`; positive headings turn towards `+x`.
///
/// # Examples
/// ```
/// use stride::vector_math::heading_direction;
/// let dir = heading_direction(90.0);
/// assert!((dir.x - 1.0).abs() < 1e-6);
/// assert!(dir.y.abs() < 1e-6);
/// ```
#[must_use]
pub fn heading_direction(heading_degrees: f32) -> Vec2 {
    let heading = rad(heading_degrees);
    Vec2::new(heading.sin(), -heading.cos())
}

/// Heading in degrees a body moving with `velocity` faces.
///
/// Mirrors [`heading_direction`]: a body moving along
/// `heading_direction(h)` reports a heading of `-h`.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use stride::vector_math::heading_of;
/// assert!(heading_of(Vec2::new(0.0, -13.0)).abs() < 1e-6);
/// assert!((heading_of(Vec2::new(5.0, 0.0)) + 90.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn heading_of(velocity: Vec2) -> f32 {
    deg((-velocity.x).atan2(-velocity.y))
}
