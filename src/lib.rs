//! Skyflap - simulation core for a side-scrolling gap-flying game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (scroll bands, obstacles, flyer, collisions, game state)
//! - `renderer`: Drawable output handed to whatever draws the frame
//! - `config`: Construction-time scene tuning
//! - `assets`: Texture metrics the scene is built from

pub mod assets;
pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use assets::{AssetManifest, TextureId, TextureSource};
pub use config::SceneConfig;
pub use error::{ConfigError, SceneError};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap a single frame may account for
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport (points)
    pub const VIEWPORT_WIDTH: f32 = 320.0;
    pub const VIEWPORT_HEIGHT: f32 = 568.0;

    /// World gravity (units/s²)
    pub const GRAVITY: [f32; 2] = [0.0, -5.0];
    /// Velocity the flyer is set to on activate
    pub const FLAP_IMPULSE: [f32; 2] = [0.0, 6.0];
    /// Points travelled per unit of velocity per second
    pub const POINTS_PER_UNIT: f32 = 25.0;

    /// Vertical opening between the two members of an obstacle pair
    pub const VERTICAL_PIPE_GAP: f32 = 100.0;
    /// Seconds between obstacle spawns
    pub const SPAWN_INTERVAL: f32 = 2.0;

    /// Flash feedback: repetitions of {alert, hold, sky, hold}
    pub const FLASH_REPEATS: u32 = 4;
    pub const FLASH_HOLD: f32 = 0.05;

    /// Flyer tilt bounds (radians)
    pub const ROTATION_MIN: f32 = -1.0;
    pub const ROTATION_MAX: f32 = 0.8;
    /// Tilt gain while descending (nose-down faster)
    pub const ROTATION_GAIN_DESCENDING: f32 = 0.003;
    /// Tilt gain while ascending
    pub const ROTATION_GAIN_ASCENDING: f32 = 0.001;

    /// All sprites are drawn at this scale
    pub const SPRITE_SCALE: f32 = 2.0;
    /// Scroll durations, seconds per point travelled
    pub const GROUND_SECONDS_PER_POINT: f32 = 0.02;
    pub const SKYLINE_SECONDS_PER_POINT: f32 = 0.1;
    pub const OBSTACLE_SECONDS_PER_POINT: f32 = 0.01;
    /// Flyer wing animation frame time
    pub const FLYER_FRAME_TIME: f32 = 0.2;

    /// Draw order
    pub const SKYLINE_Z: f32 = -20.0;
    pub const OBSTACLE_Z: f32 = -10.0;
}

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Default sky background
    pub const SKY: Color = Color::rgb(135.0 / 255.0, 206.0 / 255.0, 250.0 / 255.0);
    /// Collision alert background
    pub const ALERT: Color = Color::rgb(1.0, 0.0, 0.0);

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Three-way bound: `max` above the range, `min` below it, otherwise `value`
#[inline]
pub fn clamp(min: f32, max: f32, value: f32) -> f32 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_boundaries() {
        assert_eq!(clamp(-1.0, 0.8, -1.0), -1.0);
        assert_eq!(clamp(-1.0, 0.8, 0.0), 0.0);
        assert_eq!(clamp(-1.0, 0.8, 0.8), 0.8);
        assert_eq!(clamp(-1.0, 0.8, 0.81), 0.8);
        assert_eq!(clamp(-1.0, 0.8, -1.01), -1.0);
    }

    #[test]
    fn test_sky_color() {
        let [r, g, b, a] = Color::SKY.to_array();
        assert!((r - 0.529).abs() < 0.001);
        assert!((g - 0.808).abs() < 0.001);
        assert!((b - 0.980).abs() < 0.001);
        assert_eq!(a, 1.0);
    }

    proptest! {
        #[test]
        fn clamp_stays_in_range(v in -1.0e6f32..1.0e6) {
            let c = clamp(-1.0, 0.8, v);
            prop_assert!((-1.0..=0.8).contains(&c));
            if (-1.0..=0.8).contains(&v) {
                prop_assert_eq!(c, v);
            }
        }
    }
}
