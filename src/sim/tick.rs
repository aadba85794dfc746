//! Per-frame simulation advance
//!
//! One `tick` per display refresh: clamp the wall-clock delta, advance the
//! spin state machine, derive the rotated gravity vector, then consume the
//! delta in fixed 1/60 s physics sub-steps. Events raised during the frame are
//! returned to the caller (UI, chute selection).

use super::gravity::{base_gravity, rotated_gravity};
use super::state::{SimEvent, Tumbler};
use crate::consts::*;

impl Tumbler {
    /// Advance the simulation by one frame of `dt` seconds (wall clock).
    ///
    /// The delta is clamped to [`MAX_FRAME_DT`] so a backgrounded tab cannot
    /// explode the sub-step count or destabilize the solver. Runs to
    /// completion before the next tick can start; all state is exclusively
    /// owned here, so there is no data-race surface.
    pub fn tick(&mut self, dt: f32) -> Vec<SimEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.frame += 1;

        self.update_spin(dt);

        let gravity = rotated_gravity(base_gravity(), self.spin.rotation_angle);

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= PHYSICS_DT && substeps < MAX_SUBSTEPS {
            self.step_physics(gravity, PHYSICS_DT);
            self.accumulator -= PHYSICS_DT;
            substeps += 1;
        }

        std::mem::take(&mut self.events)
    }
}
