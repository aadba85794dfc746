//! Fixed-substep rigid-body stepper
//!
//! Advances every ball under the rotated gravity field, then relaxes ball-ball
//! and ball-boundary contacts with a fixed-iteration impulse solver. All
//! integration happens in 1/60 s sub-steps regardless of frame rate; the frame
//! tick owns the accumulator that feeds this module.

use glam::{Quat, Vec3};

use super::state::Tumbler;
use crate::consts::*;

/// Below this approach speed contacts are treated as resting (no bounce),
/// which keeps settled balls from jittering under gravity.
const RESTING_SPEED: f32 = 3.0;

impl Tumbler {
    /// One fixed physics sub-step under the given gravity vector.
    pub(crate) fn step_physics(&mut self, gravity: Vec3, dt: f32) {
        self.integrate(gravity, dt);

        for _ in 0..SOLVER_ITERATIONS {
            self.solve_ball_pairs();
            self.solve_boundary_contacts();
        }

        self.enforce_containment();
    }

    /// Semi-implicit Euler with exponential damping and quaternion update.
    fn integrate(&mut self, gravity: Vec3, dt: f32) {
        for ball in &mut self.balls {
            ball.vel += gravity * dt;
            ball.vel *= (1.0 - ball.linear_damping).powf(dt);
            ball.angular_vel *= (1.0 - ball.angular_damping).powf(dt);
            ball.pos += ball.vel * dt;

            let w = ball.angular_vel;
            if w.length_squared() > 1e-12 {
                let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * ball.orientation;
                ball.orientation = (ball.orientation + dq * (0.5 * dt)).normalize();
            }
        }
    }

    /// Sphere-sphere contacts: positional correction split by inverse mass,
    /// normal impulse with restitution, Coulomb-clamped tangential friction.
    fn solve_ball_pairs(&mut self) {
        let count = self.balls.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.balls.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                let delta = b.pos - a.pos;
                let dist = delta.length();
                let min_dist = a.radius + b.radius;
                if dist >= min_dist || dist < 1e-6 {
                    continue;
                }
                let normal = delta / dist;
                let inv_a = a.inv_mass();
                let inv_b = b.inv_mass();
                let inv_sum = inv_a + inv_b;

                // Separate the pair
                let push = (min_dist - dist) / inv_sum;
                a.pos -= normal * (push * inv_a);
                b.pos += normal * (push * inv_b);

                let rel_vel = b.vel - a.vel;
                let vn = rel_vel.dot(normal);
                if vn >= 0.0 {
                    continue; // already separating
                }

                let e = if -vn > RESTING_SPEED { RESTITUTION } else { 0.0 };
                let jn = -(1.0 + e) * vn / inv_sum;
                let impulse = normal * jn;
                a.vel -= impulse * inv_a;
                b.vel += impulse * inv_b;

                // Friction along the tangential relative velocity
                let tangential = rel_vel - vn * normal;
                let vt = tangential.length();
                if vt > 1e-6 {
                    let jt = (vt / inv_sum).min(FRICTION * jn);
                    let friction = tangential / vt * jt;
                    a.vel += friction * inv_a;
                    b.vel -= friction * inv_b;
                }
            }
        }
    }

    /// Ball-boundary contacts against the tessellated shell.
    fn solve_boundary_contacts(&mut self) {
        for ball in &mut self.balls {
            let Some(contact) = self.boundary.contact(ball.pos, ball.radius) else {
                continue;
            };

            // Push back inside along the inward normal
            ball.pos += contact.normal * contact.penetration;

            let vn = ball.vel.dot(contact.normal);
            if vn < 0.0 {
                // Moving outward into the shell
                let e = if -vn > RESTING_SPEED { RESTITUTION } else { 0.0 };
                ball.vel -= (1.0 + e) * vn * contact.normal;

                // Tangential friction, clamped Coulomb-style
                let tangential = ball.vel - ball.vel.dot(contact.normal) * contact.normal;
                let vt = tangential.length();
                if vt > 1e-6 {
                    let drop = vt.min(FRICTION * (1.0 + e) * -vn);
                    ball.vel -= tangential / vt * drop;
                }
            }

            // Roll without slipping on the shell interior
            if ball.radius > 0.0 {
                ball.angular_vel = ball.vel.cross(contact.normal) / ball.radius;
            }
        }
    }

    /// Hard containment invariant: no ball center ever ends a step outside
    /// the shell, whatever the solver did. Tunneling cannot propagate.
    fn enforce_containment(&mut self) {
        for ball in &mut self.balls {
            let limit = self.boundary.containment_radius(ball.radius);
            let dist = ball.pos.length();
            if dist > limit && dist > 1e-6 {
                ball.pos *= limit / dist;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TumblerConfig;
    use crate::sim::gravity::base_gravity;
    use crate::sim::state::Ball;

    fn tumbler_with(balls: Vec<Ball>) -> Tumbler {
        let cfg = TumblerConfig {
            ball_count: 0,
            stud_count: 0,
            ..TumblerConfig::deterministic(5)
        };
        let mut t = Tumbler::new(cfg).unwrap();
        t.balls = balls;
        t
    }

    #[test]
    fn test_free_fall_accelerates_downward() {
        let mut t = tumbler_with(vec![Ball::new(1, 16.0, Vec3::ZERO)]);
        for _ in 0..10 {
            t.step_physics(base_gravity(), PHYSICS_DT);
        }
        let ball = &t.balls()[0];
        assert!(ball.vel.y < -10.0);
        assert!(ball.pos.y < 0.0);
        assert!(ball.vel.x.abs() < 1e-4 && ball.vel.z.abs() < 1e-4);
    }

    #[test]
    fn test_boundary_stops_outward_motion() {
        let limit = {
            let t = tumbler_with(vec![]);
            t.boundary.containment_radius(16.0)
        };
        let mut ball = Ball::new(1, 16.0, Vec3::new(0.0, -(limit - 1.0), 0.0));
        ball.vel = Vec3::new(0.0, -120.0, 0.0); // heading into the shell, fast
        let mut t = tumbler_with(vec![ball]);

        t.step_physics(base_gravity(), PHYSICS_DT);

        let ball = &t.balls()[0];
        assert!(ball.pos.length() <= limit + 1e-3);
        // Fast impact bounces back inward
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_resting_contact_does_not_bounce() {
        let limit = {
            let t = tumbler_with(vec![]);
            t.boundary.containment_radius(16.0)
        };
        let mut ball = Ball::new(1, 16.0, Vec3::new(0.0, -limit, 0.0));
        ball.vel = Vec3::new(0.0, -0.5, 0.0); // gentle settle
        let mut t = tumbler_with(vec![ball]);

        for _ in 0..30 {
            t.step_physics(base_gravity(), PHYSICS_DT);
        }
        let ball = &t.balls()[0];
        // Ball stays seated at the bottom instead of jittering
        assert!(ball.vel.length() < 2.0 * GRAVITY_SCALE * PHYSICS_DT + 1e-2);
        assert!((ball.pos.length() - limit).abs() < 1.0);
    }

    #[test]
    fn test_overlapping_pair_separates() {
        let a = Ball::new(1, 16.0, Vec3::new(-10.0, 0.0, 0.0));
        let b = Ball::new(2, 16.0, Vec3::new(10.0, 0.0, 0.0));
        let mut t = tumbler_with(vec![a, b]);

        t.step_physics(Vec3::ZERO, PHYSICS_DT);

        let [a, b] = t.balls() else { unreachable!() };
        let gap = (b.pos - a.pos).length();
        assert!(gap >= a.radius + b.radius - 1e-3);
    }

    #[test]
    fn test_head_on_collision_conserves_momentum() {
        // Slightly overlapping so the contact resolves this step
        let mut a = Ball::new(1, 16.0, Vec3::new(-15.5, 0.0, 0.0));
        let mut b = Ball::new(2, 16.0, Vec3::new(15.5, 0.0, 0.0));
        a.vel = Vec3::new(50.0, 0.0, 0.0);
        b.vel = Vec3::new(-50.0, 0.0, 0.0);
        let before = a.mass * a.vel + b.mass * b.vel;
        let mut t = tumbler_with(vec![a, b]);

        t.step_physics(Vec3::ZERO, PHYSICS_DT);

        let [a, b] = t.balls() else { unreachable!() };
        let after = a.mass * a.vel + b.mass * b.vel;
        assert!((after - before).length() < 1e-2);
        // Equal masses head-on: both reverse
        assert!(a.vel.x < 0.0);
        assert!(b.vel.x > 0.0);
    }

    #[test]
    fn test_containment_clamp_catches_escapees() {
        let limit = {
            let t = tumbler_with(vec![]);
            t.boundary.containment_radius(14.0)
        };
        // Teleported far outside the shell, e.g. after a solver blowup
        let mut ball = Ball::new(1, 14.0, Vec3::new(500.0, 500.0, 0.0));
        ball.vel = Vec3::splat(1000.0);
        let mut t = tumbler_with(vec![ball]);

        t.step_physics(base_gravity(), PHYSICS_DT);

        assert!(t.balls()[0].pos.length() <= limit + 1e-3);
    }

    #[test]
    fn test_damping_decays_velocity_without_gravity() {
        let mut ball = Ball::new(1, 16.0, Vec3::ZERO);
        ball.vel = Vec3::new(100.0, 0.0, 0.0);
        let mut t = tumbler_with(vec![ball]);

        // One simulated second of drift
        for _ in 0..60 {
            t.step_physics(Vec3::ZERO, PHYSICS_DT);
        }
        let speed = t.balls()[0].vel.length();
        // (1 - 0.01)^1s of damping
        assert!(speed < 100.0);
        assert!((speed - 99.0).abs() < 0.5);
    }
}
