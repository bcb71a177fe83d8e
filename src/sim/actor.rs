//! Actor physics
//!
//! Gravity is integrated with the frame delta, but position advances by the
//! velocity once per tick: velocity is already a per-tick displacement.

use glam::Vec2;

use super::bounds::Aabb;
use super::state::{Actor, ActorPhase};
use crate::tuning::Tuning;

impl Actor {
    /// Advance one tick
    pub fn step(&mut self, dt: f32, tuning: &Tuning) {
        self.vel.y -= tuning.gravity * self.mass * dt;
        self.pos += self.vel;

        if self.is_alive() {
            // Nose follows the vertical direction, unclamped
            if self.vel.y < 0.0 {
                self.tilt += tuning.tilt_rate;
            } else if self.vel.y > 0.0 {
                self.tilt -= tuning.tilt_rate;
            }
        } else {
            self.tilt -= tuning.death_spin_rate;
        }

        self.wrap(tuning.tile_width);
        self.refresh_bounds();
    }

    /// Upward impulse. Ignored unless alive; returns whether it applied.
    pub fn thrust(&mut self, tuning: &Tuning) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.vel.y = tuning.thrust_impulse;
        true
    }

    /// Past the right edge of the tile pair, jump back to the left edge
    pub fn wrap(&mut self, tile_width: f32) -> bool {
        if self.pos.x > tile_width {
            self.pos.x = -tile_width;
            true
        } else {
            false
        }
    }

    /// Recompute the collision box from the current transform
    pub fn refresh_bounds(&mut self) {
        self.bounds = Aabb::of_rotated_square(self.pos, self.size, self.tilt);
    }

    /// Struck something: stop, kick upward
    pub(crate) fn kill(&mut self, tuning: &Tuning) {
        self.phase = ActorPhase::Dead;
        self.vel = Vec2::new(0.0, tuning.death_kick);
    }

    /// Start a fresh run. High score is kept.
    pub(crate) fn reset(&mut self) {
        self.phase = ActorPhase::Alive;
        self.pos = Vec2::ZERO;
        self.tilt = 0.0;
        self.vel = Vec2::new(self.speed, 0.0);
        self.score = 0;
        self.refresh_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive_actor(tuning: &Tuning) -> Actor {
        let mut actor = Actor::new(tuning);
        actor.reset();
        actor
    }

    #[test]
    fn test_gravity_one_second_tick() {
        let tuning = Tuning::default();
        let mut actor = alive_actor(&tuning);
        actor.vel = Vec2::ZERO;

        actor.step(1.0, &tuning);
        assert!((actor.vel.y - (-9.81 * tuning.mass)).abs() < 1e-4);
        // Position moves by the whole (already per-tick) velocity
        assert!((actor.pos.y - actor.vel.y).abs() < 1e-4);
    }

    #[test]
    fn test_thrust_then_tick() {
        let tuning = Tuning::default();
        let mut actor = alive_actor(&tuning);
        actor.vel.y = -42.0;
        let dt = 1.0 / 60.0;

        assert!(actor.thrust(&tuning));
        assert_eq!(actor.vel.y, 10.0);
        actor.step(dt, &tuning);
        assert!((actor.vel.y - (10.0 - 9.81 * tuning.mass * dt)).abs() < 1e-4);
    }

    #[test]
    fn test_thrust_ignored_when_not_alive() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(&tuning);
        actor.vel.y = -3.0;
        assert!(!actor.thrust(&tuning));
        assert_eq!(actor.vel.y, -3.0);
    }

    #[test]
    fn test_tilt_follows_direction_while_alive() {
        let tuning = Tuning::default();
        let mut actor = alive_actor(&tuning);

        actor.step(1.0 / 60.0, &tuning);
        assert!(actor.vel.y < 0.0);
        assert!((actor.tilt - tuning.tilt_rate).abs() < 1e-6);

        actor.thrust(&tuning);
        actor.step(1.0 / 60.0, &tuning);
        assert!(actor.tilt.abs() < 1e-6);
    }

    #[test]
    fn test_dead_actor_spins() {
        let tuning = Tuning::default();
        let mut actor = alive_actor(&tuning);
        actor.kill(&tuning);
        assert_eq!(actor.vel, Vec2::new(0.0, tuning.death_kick));

        actor.step(1.0 / 60.0, &tuning);
        actor.step(1.0 / 60.0, &tuning);
        assert!((actor.tilt + 2.0 * tuning.death_spin_rate).abs() < 1e-5);
        assert_eq!(actor.pos.x, 0.0);
    }

    #[test]
    fn test_wraps_past_tile_width() {
        let tuning = Tuning::default();
        let mut actor = alive_actor(&tuning);
        actor.pos.x = tuning.tile_width - 1.0;

        actor.step(1.0 / 60.0, &tuning);
        assert_eq!(actor.pos.x, -tuning.tile_width);
        assert!((actor.bounds.center().x + tuning.tile_width).abs() < 1e-3);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let tuning = Tuning::default();
        let mut actor = alive_actor(&tuning);
        actor.score = 12;
        actor.high_score = 30;
        actor.pos = Vec2::new(50.0, 50.0);
        actor.tilt = 1.0;
        actor.kill(&tuning);

        actor.reset();
        assert!(actor.is_alive());
        assert_eq!(actor.pos, Vec2::ZERO);
        assert_eq!(actor.tilt, 0.0);
        assert_eq!(actor.vel, Vec2::new(tuning.speed, 0.0));
        assert_eq!(actor.score, 0);
        assert_eq!(actor.high_score, 30);
    }
}
