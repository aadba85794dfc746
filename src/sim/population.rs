//! Ball and stud population lifecycle
//!
//! The tumbler owns every dynamic body; this module creates and destroys them.
//! Spawn parameters follow the machine's loading procedure: balls are dropped
//! in a loose disk near the bottom of the sphere so they rest under normal
//! (unrotated) gravity before the first spin.

use glam::Vec3;
use rand::Rng;

use super::state::{Ball, Stud, Tumbler};
use crate::consts::*;

/// Where the chute opening sits: just below the top of the sphere
pub const CHUTE_POSITION: Vec3 = Vec3::new(0.0, TUMBLER_RADIUS - CHUTE_INSET, 0.0);

impl Tumbler {
    /// Destroy all existing balls and create `count` fresh ones.
    ///
    /// Ids are assigned sequentially from 1 and double as the printed number.
    /// `count = 0` leaves the tumbler empty - valid, and auto-filled when a
    /// spin starts. Negative counts are unrepresentable by construction.
    pub fn populate(&mut self, count: u32) {
        self.balls.clear();

        for i in 0..count {
            let radius = self
                .rng
                .random_range(BALL_RADIUS_MIN..BALL_RADIUS_MAX)
                .round();
            let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
            let disk_r = self.rng.random_range(0.0..TUMBLER_RADIUS * 0.4);
            let pos = Vec3::new(
                theta.cos() * disk_r,
                -TUMBLER_RADIUS + radius + 10.0 + self.rng.random_range(0.0..6.0),
                theta.sin() * disk_r,
            );
            self.balls.push(Ball::new(i + 1, radius, pos));
        }

        log::info!("populated {} balls", self.balls.len());
    }

    /// Regenerate the stud ring: `count` random points on the sphere interior
    /// at radius R - STUD_INSET. Called only when the stud count changes.
    pub fn create_studs(&mut self, count: u32) {
        self.studs.clear();

        let r = TUMBLER_RADIUS - STUD_INSET;
        for _ in 0..count {
            let phi = self.rng.random_range(0.0..std::f32::consts::PI);
            let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
            self.studs.push(Stud {
                base: Vec3::new(
                    phi.sin() * theta.cos() * r,
                    phi.cos() * r,
                    phi.sin() * theta.sin() * r,
                ),
            });
        }

        log::debug!("created {} studs", self.studs.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TumblerConfig;

    fn empty_tumbler() -> Tumbler {
        let cfg = TumblerConfig {
            ball_count: 0,
            stud_count: 0,
            ..TumblerConfig::deterministic(42)
        };
        Tumbler::new(cfg).unwrap()
    }

    #[test]
    fn test_populate_exact_count_and_ranges() {
        let mut t = empty_tumbler();
        t.populate(24);
        assert_eq!(t.balls().len(), 24);

        for (i, ball) in t.balls().iter().enumerate() {
            assert_eq!(ball.id, i as u32 + 1);
            assert_eq!(ball.number, ball.id);
            assert!(ball.radius >= BALL_RADIUS_MIN && ball.radius <= BALL_RADIUS_MAX);
            // Rounded to a whole radius
            assert_eq!(ball.radius, ball.radius.round());
            assert!((ball.mass - ball.radius * ball.radius * MASS_PER_RADIUS_SQ).abs() < 1e-6);
            assert!((ball.linear_damping - BALL_DAMPING).abs() < 1e-6);
        }
    }

    #[test]
    fn test_populate_spawns_near_bottom_in_disk() {
        let mut t = empty_tumbler();
        t.populate(50);
        for ball in t.balls() {
            let lateral = (ball.pos.x * ball.pos.x + ball.pos.z * ball.pos.z).sqrt();
            assert!(lateral <= TUMBLER_RADIUS * 0.4 + 1e-3);
            let y_min = -TUMBLER_RADIUS + ball.radius + 10.0;
            assert!(ball.pos.y >= y_min - 1e-3 && ball.pos.y <= y_min + 6.0 + 1e-3);
        }
    }

    #[test]
    fn test_repopulate_leaves_no_stale_bodies() {
        let mut t = empty_tumbler();
        t.populate(24);
        t.populate(5);
        assert_eq!(t.balls().len(), 5);
        let ids: Vec<u32> = t.balls().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_populate_zero_is_empty_not_error() {
        let mut t = empty_tumbler();
        t.populate(24);
        t.populate(0);
        assert!(t.balls().is_empty());
    }

    #[test]
    fn test_studs_sit_inside_the_shell() {
        let mut t = empty_tumbler();
        t.create_studs(10);
        assert_eq!(t.studs.len(), 10);
        for s in &t.studs {
            assert!((s.base.length() - (TUMBLER_RADIUS - STUD_INSET)).abs() < 1e-2);
        }
        let positions = t.stud_positions();
        assert_eq!(positions.len(), 10);
    }

    #[test]
    fn test_stud_ring_regenerates_on_count_change() {
        let mut t = empty_tumbler();
        t.create_studs(8);
        let before = t.studs[0].base;
        t.create_studs(10);
        assert_eq!(t.studs.len(), 10);
        // Fresh ring, not an extension of the old one
        assert_ne!(t.studs[0].base, before);
    }
}
