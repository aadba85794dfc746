//! Lotto Tumbler - deterministic physics core for a spherical lottery tumbler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boundary, gravity field, spin machine, stepper)
//! - `config`: Data-driven tuning and validation
//!
//! Rendering, UI, and asset setup are external collaborators: they read ball
//! transforms and stud positions from the [`sim::Tumbler`] each frame and react
//! to the events it emits.

pub mod config;
pub mod sim;

pub use config::TumblerConfig;
pub use sim::{SimError, SimEvent, Tumbler};

/// Simulation constants
pub mod consts {
    /// Fixed physics sub-step (60 Hz, matching the solver the tumbler was tuned against)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Frame deltas are clamped to this before stepping (tab-backgrounding spikes)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Maximum sub-steps consumed in one frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Contact/friction solver iterations per sub-step
    pub const SOLVER_ITERATIONS: u32 = 10;

    /// Interior radius of the glass tumbler sphere
    pub const TUMBLER_RADIUS: f32 = 220.0;
    /// UV-sphere tessellation segments (both latitude and longitude)
    pub const SPHERE_SEGMENTS: u32 = 48;

    /// Base gravity magnitude (world units / s²)
    pub const GRAVITY_SCALE: f32 = 80.0;

    /// Ball radius range sampled at populate time
    pub const BALL_RADIUS_MIN: f32 = 14.0;
    pub const BALL_RADIUS_MAX: f32 = 20.0;
    /// mass = radius² · MASS_PER_RADIUS_SQ
    pub const MASS_PER_RADIUS_SQ: f32 = 0.01;
    /// Linear and angular damping applied to every ball
    pub const BALL_DAMPING: f32 = 0.01;
    /// Contact restitution (carried over from the reference solver's default material)
    pub const RESTITUTION: f32 = 0.3;
    /// Contact friction coefficient
    pub const FRICTION: f32 = 0.3;

    /// Studs sit this far inside the tumbler surface
    pub const STUD_INSET: f32 = 8.0;
    /// Stud ring size created at startup
    pub const STARTUP_STUD_COUNT: u32 = 8;
    /// Stud ring size created lazily when a spin starts with no studs
    pub const SPIN_STUD_COUNT: u32 = 10;

    /// Arm spins this much faster than the container
    pub const ARM_RATE_FACTOR: f32 = 1.6;
    /// Studs advance at half the arm rate (they visually lag the arm)
    pub const STUD_RATE_FACTOR: f32 = 0.5;
    /// Per-frame multiplicative decay of residual angles while not spinning
    pub const IDLE_ANGLE_DECAY: f32 = 0.995;
    /// Residual angle below which Settling hands back to Idle
    pub const REST_EPSILON: f32 = 1e-3;

    /// Chute opening height below the top of the sphere
    pub const CHUTE_INSET: f32 = 10.0;
}

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
