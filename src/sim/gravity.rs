//! Rotating gravity field
//!
//! The container mesh and its collision shell never move in world space.
//! Spinning the tumbler is simulated by rotating the gravity vector by the
//! container angle instead - rotating a constant-direction force is far
//! cheaper and numerically better behaved than re-transforming a concave
//! trimesh and its contact manifolds every frame.
//!
//! The field is a pure function of the angle: no state, no drift.

use glam::Vec3;

use crate::consts::GRAVITY_SCALE;

/// Base gravity before container rotation: straight down
#[inline]
pub fn base_gravity() -> Vec3 {
    Vec3::new(0.0, -GRAVITY_SCALE, 0.0)
}

/// Rotate a vector about the vertical axis. The single rotation law every
/// spun element (gravity field, stud ring) goes through; anything that
/// rotates with the container must use this function so all of them agree
/// bit-for-bit.
#[inline]
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

/// Rotate a gravity vector by the container angle about the vertical axis.
///
/// The y component is untouched; the x/z components counter-rotate so that
/// contact physics inside the static shell matches what a spun container
/// would produce. With a purely vertical base vector this is the identity;
/// the rotation matters once lateral perturbation (arm impulses, gravity
/// tilt) is introduced.
#[inline]
pub fn rotated_gravity(base: Vec3, angle: f32) -> Vec3 {
    rotate_about_y(base, angle)
}
