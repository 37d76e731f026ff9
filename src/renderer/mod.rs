//! Render output
//!
//! The core does not draw. Each frame it hands out the background color and a
//! list of sprites with their transforms; a renderer turns that into pixels.

pub mod instance;

pub use instance::{DrawInstance, instance_bytes};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Color;

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Sprite {
    /// Two frames: `Bird1`, `Bird2`
    Flyer = 0,
    Ground = 1,
    Skyline = 2,
    PipeLower = 3,
    PipeUpper = 4,
}

/// One sprite placed in scene space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub sprite: Sprite,
    /// Center, scene space
    pub position: Vec2,
    /// Scaled size
    pub size: Vec2,
    pub rotation: f32,
    pub frame: u8,
    pub z: f32,
}

/// Everything needed to draw one frame, back to front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub background: Color,
    pub drawables: Vec<Drawable>,
}

impl RenderFrame {
    pub fn new(background: Color, mut drawables: Vec<Drawable>) -> Self {
        drawables.sort_by(|a, b| a.z.total_cmp(&b.z));
        Self {
            background,
            drawables,
        }
    }

    pub fn count(&self, sprite: Sprite) -> usize {
        self.drawables.iter().filter(|d| d.sprite == sprite).count()
    }

    pub fn instances(&self) -> Vec<DrawInstance> {
        self.drawables.iter().map(DrawInstance::from).collect()
    }
}
