//! The player-controlled flyer
//!
//! Gravity pulls it down; each activate replaces its vertical velocity with a
//! fixed upward kick. Its tilt follows vertical velocity, nose-down faster
//! than nose-up.

use glam::Vec2;

use super::collision::Body;
use super::timeline::{Effect, Sequence, Step};
use super::world::{Frame, Updatable};
use crate::clamp;
use crate::config::SceneConfig;

#[derive(Debug, Clone)]
pub struct Flyer {
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    pub radius: f32,
    pub body: Body,
    rotation: f32,
    frame: u8,
    /// Wing animation; attached to the flyer, so it ignores world speed
    animation: Sequence<u8>,
    effects: Vec<Effect<u8>>,
    flap_impulse: Vec2,
    points_per_unit: f32,
    rotation_min: f32,
    rotation_max: f32,
    gain_descending: f32,
    gain_ascending: f32,
}

impl Flyer {
    /// `sprite_size` is the scaled sprite; the hitbox radius is half its height
    pub fn new(config: &SceneConfig, position: Vec2, sprite_size: Vec2) -> Self {
        let radius = sprite_size.y / 2.0;
        let hold = config.flyer_frame_time;
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            body: Body::flyer(radius),
            rotation: 0.0,
            frame: 0,
            animation: Sequence::forever(vec![
                Step::Emit(0),
                Step::Wait(hold),
                Step::Emit(1),
                Step::Wait(hold),
            ]),
            effects: Vec::new(),
            flap_impulse: config.flap_impulse,
            points_per_unit: config.points_per_unit,
            rotation_min: config.rotation_min,
            rotation_max: config.rotation_max,
            gain_descending: config.rotation_gain_descending,
            gain_ascending: config.rotation_gain_ascending,
        }
    }

    /// Flap: zero the velocity, then apply the impulse. Never additive.
    pub fn activate(&mut self) {
        self.velocity = Vec2::ZERO;
        self.velocity += self.flap_impulse;
    }

    /// Tilt for a given vertical velocity
    pub fn tilt_for(&self, vertical_velocity: f32) -> f32 {
        let gain = if vertical_velocity < 0.0 {
            self.gain_descending
        } else {
            self.gain_ascending
        };
        clamp(self.rotation_min, self.rotation_max, vertical_velocity * gain)
    }

    /// Radians, counter-clockwise
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current wing texture frame
    pub fn frame(&self) -> u8 {
        self.frame
    }
}

impl Updatable for Flyer {
    fn update(&mut self, frame: &mut Frame<'_>) {
        self.animation.advance(frame.dt, &mut self.effects);
        for effect in self.effects.drain(..) {
            if let Effect::Emit(index) = effect {
                self.frame = index;
            }
        }

        let dt = frame.dt * frame.world.speed();
        if dt > 0.0 {
            self.velocity += frame.world.gravity * dt;
            self.position += self.velocity * self.points_per_unit * dt;
        }

        // Frozen: keep the angle it had on impact
        if frame.world.is_active() {
            self.rotation = self.tilt_for(self.velocity.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::graph::SceneGraph;
    use crate::sim::world::WorldState;
    use proptest::prelude::*;

    fn flyer() -> Flyer {
        Flyer::new(
            &SceneConfig::default(),
            Vec2::new(80.0, 284.0),
            Vec2::new(34.0, 24.0),
        )
    }

    fn step(flyer: &mut Flyer, world: &WorldState, dt: f32) {
        let mut graph = SceneGraph::new();
        let mut frame = Frame {
            world,
            graph: &mut graph,
            dt,
            cues: &[],
        };
        flyer.update(&mut frame);
    }

    #[test]
    fn test_hitbox_is_half_sprite_height() {
        let flyer = flyer();
        assert_eq!(flyer.radius, 12.0);
    }

    #[test]
    fn test_activate_replaces_velocity() {
        let mut flyer = flyer();
        for before in [Vec2::ZERO, Vec2::new(0.0, -40.0), Vec2::new(3.0, 25.0)] {
            flyer.velocity = before;
            flyer.activate();
            assert_eq!(flyer.velocity, Vec2::new(0.0, 6.0));
        }
    }

    #[test]
    fn test_gravity_after_flap() {
        let mut flyer = flyer();
        let world = WorldState::new(Vec2::new(0.0, -5.0));
        flyer.activate();
        assert_eq!(flyer.velocity, Vec2::new(0.0, 6.0));

        let dt = 1.0 / 120.0;
        let y0 = flyer.position.y;
        step(&mut flyer, &world, dt);
        assert!((flyer.velocity.y - (6.0 - 5.0 * dt)).abs() < 1e-6);
        assert!(flyer.position.y > y0);
    }

    #[test]
    fn test_tilt_gains() {
        let flyer = flyer();
        assert!((flyer.tilt_for(-100.0) - (-0.3)).abs() < 1e-6);
        assert!((flyer.tilt_for(100.0) - 0.1).abs() < 1e-6);
        assert_eq!(flyer.tilt_for(0.0), 0.0);
        assert_eq!(flyer.tilt_for(-1000.0), -1.0);
        assert_eq!(flyer.tilt_for(800.0), 0.8);
        assert_eq!(flyer.tilt_for(5000.0), 0.8);
        assert_eq!(flyer.tilt_for(-5000.0), -1.0);
    }

    #[test]
    fn test_frozen_flyer_keeps_state() {
        let mut flyer = flyer();
        let mut world = WorldState::new(Vec2::new(0.0, -5.0));
        flyer.velocity = Vec2::new(0.0, -200.0);
        step(&mut flyer, &world, 0.01);
        let rotation = flyer.rotation();
        assert!(rotation < 0.0);

        world.freeze();
        let (pos, vel) = (flyer.position, flyer.velocity);
        flyer.velocity.y = 300.0;
        step(&mut flyer, &world, 0.5);
        assert_eq!(flyer.rotation(), rotation);
        assert_eq!(flyer.position, pos);
        assert_ne!(flyer.velocity, vel);
        assert_eq!(flyer.velocity.y, 300.0);
    }

    #[test]
    fn test_wing_animation_runs_while_frozen() {
        let mut flyer = flyer();
        let mut world = WorldState::new(Vec2::ZERO);
        world.freeze();
        step(&mut flyer, &world, 0.125);
        assert_eq!(flyer.frame(), 0);
        step(&mut flyer, &world, 0.125);
        assert_eq!(flyer.frame(), 1);
        step(&mut flyer, &world, 0.25);
        assert_eq!(flyer.frame(), 0);
    }

    proptest! {
        #[test]
        fn tilt_always_in_range(vy in -1.0e6f32..1.0e6) {
            let tilt = flyer().tilt_for(vy);
            prop_assert!((-1.0..=0.8).contains(&tilt));
        }
    }
}
