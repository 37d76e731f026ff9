//! Shared world state and the per-frame update contract
//!
//! `WorldState` is handed by reference to every component. Only the game
//! state machine writes `speed`; everything else reads it.

use glam::Vec2;
use serde::Serialize;

use super::graph::{Fired, SceneGraph};

/// Global simulation state
#[derive(Debug, Clone, Serialize)]
pub struct WorldState {
    /// 1.0 while running, 0.0 once frozen. Never anything else.
    speed: f32,
    pub gravity: Vec2,
    /// Seconds since the scene started, monotonic
    elapsed: f64,
}

impl WorldState {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            speed: 1.0,
            gravity,
            elapsed: 0.0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.speed > 0.0
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Stop the world. Only the game state machine calls this.
    pub(crate) fn freeze(&mut self) {
        self.speed = 0.0;
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt as f64;
        }
    }
}

/// What a component sees during its update
pub struct Frame<'a> {
    pub world: &'a WorldState,
    pub graph: &'a mut SceneGraph,
    /// Unscaled step length
    pub dt: f32,
    /// Cues fired by scheduled actions this step
    pub cues: &'a [Fired],
}

/// A component driven once per simulation step by the loop
pub trait Updatable {
    fn update(&mut self, frame: &mut Frame<'_>);
}
