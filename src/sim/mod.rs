//! Deterministic simulation module
//!
//! All tumbler logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod boundary;
pub mod gravity;
pub mod population;
pub mod spin;
pub mod state;
pub mod stepper;
pub mod tick;

pub use boundary::{BoundaryContact, CollisionBoundary};
pub use gravity::{base_gravity, rotate_about_y, rotated_gravity};
pub use population::CHUTE_POSITION;
pub use state::{
    Ball, BallTransform, PickCandidate, RenderFrame, SimEvent, SpinPhase, SpinState, Stud, Tumbler,
};

use std::fmt;

/// Simulation error taxonomy
///
/// Configuration errors are caught at the boundary (`TumblerConfig::validate`,
/// `start_spin`) so they never reach the solver as NaN positions. Geometry
/// errors are fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    /// Spin power must be finite and > 0
    InvalidSpinPower(f32),
    /// Target rotations must be finite and > 0
    InvalidTargetRotations(f32),
    /// Jitter amplitude must be finite and >= 0
    InvalidSpinJitter(f32),
    /// Sphere tessellation produced no triangles
    DegenerateBoundary { segments: u32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidSpinPower(v) => {
                write!(f, "spin power must be finite and positive, got {v}")
            }
            SimError::InvalidTargetRotations(v) => {
                write!(f, "target rotations must be finite and positive, got {v}")
            }
            SimError::InvalidSpinJitter(v) => {
                write!(f, "spin jitter must be finite and non-negative, got {v}")
            }
            SimError::DegenerateBoundary { segments } => {
                write!(
                    f,
                    "sphere tessellation with {segments} segments produced no triangles"
                )
            }
        }
    }
}

impl std::error::Error for SimError {}
