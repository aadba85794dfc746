//! Tumbler state and core simulation types
//!
//! All state the simulation owns lives here. The [`Tumbler`] is the single
//! owner of every ball, stud, and the spin state machine; nothing outside the
//! tick path mutates it (single-threaded, no locks).

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boundary::CollisionBoundary;
use super::gravity::rotate_about_y;
use super::SimError;
use crate::config::TumblerConfig;
use crate::consts::*;
use crate::normalize_angle;

/// Current phase of the spin cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    /// At rest, waiting for a spin trigger
    Idle,
    /// Container and arm rotating, accumulating toward the target
    Spinning,
    /// Spin stopped, residual rotation decaying toward rest
    Settling,
}

/// A dynamic ball body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Printed label; equals `id` in the default population
    pub number: u32,
    pub radius: f32,
    pub mass: f32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub orientation: Quat,
    pub angular_vel: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Ball {
    pub fn new(id: u32, radius: f32, pos: Vec3) -> Self {
        Self {
            id,
            number: id,
            radius,
            mass: radius * radius * MASS_PER_RADIUS_SQ,
            pos,
            vel: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            angular_vel: Vec3::ZERO,
            linear_damping: BALL_DAMPING,
            angular_damping: BALL_DAMPING,
        }
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        1.0 / self.mass
    }
}

/// A decorative stud on the inside of the sphere
///
/// Studs are kinematic: their base position is fixed at generation time and
/// the whole ring rotates with `SpinState::stud_angle`. They are not dynamic
/// bodies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stud {
    /// Position on the sphere interior (radius R - STUD_INSET) before ring rotation
    pub base: Vec3,
}

impl Stud {
    /// World position for the current stud ring angle (rotation about +Y)
    pub fn world_position(&self, stud_angle: f32) -> Vec3 {
        rotate_about_y(self.base, stud_angle)
    }
}

/// Spin state machine data
///
/// `rotation_angle` is the unbounded accumulator the gravity field is derived
/// from; renderers wanting a mod-2π value use
/// [`Tumbler::rotation_angle_wrapped`]. Spin rates carry no meaning while
/// `phase` is not `Spinning`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpinState {
    pub phase: SpinPhase,
    /// Container orientation about +Y (radians, unbounded)
    pub rotation_angle: f32,
    /// Mechanical arm orientation about +Y (radians, unbounded)
    pub arm_angle: f32,
    /// Stud ring orientation about +Y (radians, unbounded)
    pub stud_angle: f32,
    /// Total |rotation| accumulated since the spin started
    pub accumulated_rotation: f32,
    pub container_spin_rate: f32,
    pub arm_spin_rate: f32,
    pub target_rotations: f32,
}

impl Default for SpinState {
    fn default() -> Self {
        Self {
            phase: SpinPhase::Idle,
            rotation_angle: 0.0,
            arm_angle: 0.0,
            stud_angle: 0.0,
            accumulated_rotation: 0.0,
            container_spin_rate: 0.0,
            arm_spin_rate: 0.0,
            target_rotations: 0.0,
        }
    }
}

/// A ball's standing relative to the chute opening when spinning stopped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickCandidate {
    pub id: u32,
    pub number: u32,
    pub position: Vec3,
    /// Distance from ball center to the chute opening
    pub chute_distance: f32,
}

/// Events emitted by the simulation for external collaborators (UI, chute logic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimEvent {
    SpinStarted,
    /// The spin reached its rotation target and stopped. Candidates are
    /// sorted by chute distance, closest first; picking the definitive
    /// winner is the chute collaborator's job.
    SpinComplete { candidates: Vec<PickCandidate> },
    /// The spin was aborted externally; no pick happened.
    SpinCancelled,
}

/// Per-ball transform snapshot for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallTransform {
    pub id: u32,
    pub number: u32,
    pub position: Vec3,
    pub orientation: Quat,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Container rotation wrapped to [-π, π)
    pub rotation_angle: f32,
    pub arm_angle: f32,
    pub balls: Vec<BallTransform>,
}

/// The whole tumbler simulation: boundary, bodies, spin machine, RNG
pub struct Tumbler {
    pub(crate) config: TumblerConfig,
    pub(crate) boundary: CollisionBoundary,
    pub(crate) balls: Vec<Ball>,
    pub(crate) studs: Vec<Stud>,
    pub(crate) spin: SpinState,
    /// Frame counter (diagnostics only, not physics time)
    pub(crate) frame: u64,
    pub(crate) rng: Pcg32,
    /// Fixed-timestep accumulator for the stepper
    pub(crate) accumulator: f32,
    pub(crate) events: Vec<SimEvent>,
}

impl Tumbler {
    /// Build a tumbler, tessellate the boundary, and populate it per config.
    pub fn new(config: TumblerConfig) -> Result<Self, SimError> {
        config.validate()?;
        let boundary = CollisionBoundary::uv_sphere(TUMBLER_RADIUS, SPHERE_SEGMENTS)?;

        let mut tumbler = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            boundary,
            balls: Vec::new(),
            studs: Vec::new(),
            spin: SpinState::default(),
            frame: 0,
            accumulator: 0.0,
            events: Vec::new(),
            config,
        };
        tumbler.populate(tumbler.config.ball_count);
        tumbler.create_studs(tumbler.config.stud_count);
        Ok(tumbler)
    }

    pub fn config(&self) -> &TumblerConfig {
        &self.config
    }

    pub fn phase(&self) -> SpinPhase {
        self.spin.phase
    }

    /// Frames ticked since construction (diagnostics)
    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn spin_state(&self) -> &SpinState {
        &self.spin
    }

    /// Raw (unbounded) container rotation angle
    pub fn rotation_angle(&self) -> f32 {
        self.spin.rotation_angle
    }

    /// Container rotation wrapped to [-π, π) for rendering
    pub fn rotation_angle_wrapped(&self) -> f32 {
        normalize_angle(self.spin.rotation_angle)
    }

    pub fn arm_angle(&self) -> f32 {
        self.spin.arm_angle
    }

    /// All dynamic balls, in stable id order
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Current world positions of the stud ring
    pub fn stud_positions(&self) -> Vec<Vec3> {
        self.studs
            .iter()
            .map(|s| s.world_position(self.spin.stud_angle))
            .collect()
    }

    pub fn boundary(&self) -> &CollisionBoundary {
        &self.boundary
    }

    /// Snapshot of everything the renderer consumes this frame
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            rotation_angle: self.rotation_angle_wrapped(),
            arm_angle: self.spin.arm_angle,
            balls: self
                .balls
                .iter()
                .map(|b| BallTransform {
                    id: b.id,
                    number: b.number,
                    position: b.pos,
                    orientation: b.orientation,
                })
                .collect(),
        }
    }
}
