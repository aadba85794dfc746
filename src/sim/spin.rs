//! Spin state machine
//!
//! Owns the Idle → Spinning → Settling cycle, the rotation accumulators, and
//! the stop-and-pick transition. Settling is Idle with residual rotation still
//! decaying; a new spin can start from either.
//!
//! While not spinning the decay is applied to the absolute angles
//! (`*= IDLE_ANGLE_DECAY` per frame), matching the machine's observable
//! behavior. Decaying the rate instead would hold the final resting angle but
//! changes what the renderer sees, so it is deliberately not done here.

use rand::Rng;

use super::population::CHUTE_POSITION;
use super::state::{PickCandidate, SimEvent, SpinPhase, Tumbler};
use super::SimError;
use crate::config::TumblerConfig;
use crate::consts::*;

impl Tumbler {
    /// Begin a spin. Valid from Idle or Settling; a duplicate trigger while
    /// already Spinning is a tolerated no-op (returns `Ok(false)`) and does
    /// not advance the RNG.
    ///
    /// An empty tumbler is populated first (configured count, or the stock
    /// default if the config asks for zero); a missing stud ring is created
    /// with [`SPIN_STUD_COUNT`] studs.
    pub fn start_spin(&mut self, target_rotations: f32, spin_power: f32) -> Result<bool, SimError> {
        if !spin_power.is_finite() || spin_power <= 0.0 {
            return Err(SimError::InvalidSpinPower(spin_power));
        }
        if !target_rotations.is_finite() || target_rotations <= 0.0 {
            return Err(SimError::InvalidTargetRotations(target_rotations));
        }
        if self.spin.phase == SpinPhase::Spinning {
            log::debug!("start_spin ignored: already spinning");
            return Ok(false);
        }

        if self.balls.is_empty() {
            let count = if self.config.ball_count > 0 {
                self.config.ball_count
            } else {
                TumblerConfig::default().ball_count
            };
            self.populate(count);
        }
        if self.studs.is_empty() {
            self.create_studs(SPIN_STUD_COUNT);
        }

        self.spin.container_spin_rate = spin_power + self.rate_jitter();
        self.spin.arm_spin_rate = self.spin.container_spin_rate * ARM_RATE_FACTOR + self.rate_jitter();
        self.spin.target_rotations = target_rotations;
        self.spin.accumulated_rotation = 0.0;
        self.spin.phase = SpinPhase::Spinning;

        log::info!(
            "spin started: {:.2} rotations at container rate {:.3} rad/s, arm {:.3} rad/s",
            target_rotations,
            self.spin.container_spin_rate,
            self.spin.arm_spin_rate,
        );
        self.events.push(SimEvent::SpinStarted);
        Ok(true)
    }

    /// Abort a running spin without picking. Distinct from the natural
    /// completion path so callers can tell "finished" from "cancelled".
    pub fn cancel_spin(&mut self) -> bool {
        if self.spin.phase != SpinPhase::Spinning {
            return false;
        }
        self.spin.phase = SpinPhase::Settling;
        self.spin.accumulated_rotation = 0.0;
        self.spin.container_spin_rate = 0.0;
        self.spin.arm_spin_rate = 0.0;
        log::info!("spin cancelled");
        self.events.push(SimEvent::SpinCancelled);
        true
    }

    fn rate_jitter(&mut self) -> f32 {
        let j = self.config.spin_jitter;
        if j > 0.0 {
            self.rng.random_range(-j..j)
        } else {
            0.0
        }
    }

    /// Advance the rotation accumulators by one frame.
    pub(crate) fn update_spin(&mut self, dt: f32) {
        match self.spin.phase {
            SpinPhase::Spinning => {
                self.spin.rotation_angle += self.spin.container_spin_rate * dt;
                self.spin.arm_angle += self.spin.arm_spin_rate * dt;
                self.spin.stud_angle += self.spin.arm_spin_rate * dt * STUD_RATE_FACTOR;
                self.spin.accumulated_rotation += (self.spin.container_spin_rate * dt).abs();

                if self.spin.accumulated_rotation
                    >= std::f32::consts::TAU * self.spin.target_rotations
                {
                    self.stop_and_pick();
                }
            }
            SpinPhase::Idle | SpinPhase::Settling => {
                self.spin.rotation_angle *= IDLE_ANGLE_DECAY;
                self.spin.arm_angle *= IDLE_ANGLE_DECAY;

                if self.spin.phase == SpinPhase::Settling
                    && self.spin.rotation_angle.abs() < REST_EPSILON
                    && self.spin.arm_angle.abs() < REST_EPSILON
                {
                    self.spin.phase = SpinPhase::Idle;
                }
            }
        }
    }

    /// Freeze the spin and report every ball's standing relative to the chute
    /// opening. The external chute collaborator picks the winner; this core
    /// only reports candidates, closest first.
    fn stop_and_pick(&mut self) {
        let mut candidates: Vec<PickCandidate> = self
            .balls
            .iter()
            .map(|b| PickCandidate {
                id: b.id,
                number: b.number,
                position: b.pos,
                chute_distance: (b.pos - CHUTE_POSITION).length(),
            })
            .collect();
        candidates.sort_by(|a, b| a.chute_distance.total_cmp(&b.chute_distance));

        self.spin.phase = SpinPhase::Settling;
        self.spin.accumulated_rotation = 0.0;
        self.spin.container_spin_rate = 0.0;
        self.spin.arm_spin_rate = 0.0;

        if let Some(front) = candidates.first() {
            log::info!(
                "spin complete: ball #{} nearest the chute ({:.1} away)",
                front.number,
                front.chute_distance
            );
        } else {
            log::warn!("spin complete with no balls in the tumbler");
        }
        self.events.push(SimEvent::SpinComplete { candidates });
    }
}
