//! Tumbler tuning parameters
//!
//! Everything the UI exposes as a knob lives here. Values are validated at the
//! boundary so out-of-range input never reaches the physics solver.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::SimError;

/// Simulation configuration (UI-facing knobs plus the run seed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TumblerConfig {
    /// Number of balls created by a default populate
    pub ball_count: u32,
    /// Base container spin rate multiplier (rad/s before jitter)
    pub spin_power: f32,
    /// Full container rotations before the spin auto-stops
    pub auto_rotations: f32,
    /// Studs created at startup
    pub stud_count: u32,
    /// Amplitude of the uniform jitter added to spin rates (0 = reproducible)
    pub spin_jitter: f32,
    /// Run seed for the deterministic RNG
    pub seed: u64,
}

impl Default for TumblerConfig {
    fn default() -> Self {
        Self {
            ball_count: 24,
            spin_power: 1.0,
            auto_rotations: 3.0,
            stud_count: STARTUP_STUD_COUNT,
            spin_jitter: 0.2,
            seed: 0,
        }
    }
}

impl TumblerConfig {
    /// Check every knob before the simulation is built.
    ///
    /// `ball_count = 0` is allowed (an empty tumbler is valid and gets
    /// auto-populated when a spin starts).
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.spin_power.is_finite() || self.spin_power <= 0.0 {
            return Err(SimError::InvalidSpinPower(self.spin_power));
        }
        if !self.auto_rotations.is_finite() || self.auto_rotations <= 0.0 {
            return Err(SimError::InvalidTargetRotations(self.auto_rotations));
        }
        if !self.spin_jitter.is_finite() || self.spin_jitter < 0.0 {
            return Err(SimError::InvalidSpinJitter(self.spin_jitter));
        }
        Ok(())
    }

    /// Config with jitter disabled, for reproducible runs
    pub fn deterministic(seed: u64) -> Self {
        Self {
            spin_jitter: 0.0,
            seed,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TumblerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_spin_power() {
        let cfg = TumblerConfig {
            spin_power: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::InvalidSpinPower(_))
        ));

        let cfg = TumblerConfig {
            spin_power: -1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_nonfinite_rotations() {
        let cfg = TumblerConfig {
            auto_rotations: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::InvalidTargetRotations(_))
        ));
    }

    #[test]
    fn test_zero_ball_count_allowed() {
        let cfg = TumblerConfig {
            ball_count: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
