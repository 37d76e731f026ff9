//! Scene tuning
//!
//! Fixed when a scene is built. Defaults are the stock gameplay constants.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Color;
use crate::consts::*;
use crate::error::ConfigError;

/// Everything a scene reads at construction time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Physics ===
    pub gravity: Vec2,
    /// Velocity the flyer takes on activate (replaces, never adds)
    pub flap_impulse: Vec2,
    /// Points travelled per unit of velocity per second
    pub points_per_unit: f32,

    // === Obstacles ===
    pub vertical_pipe_gap: f32,
    pub spawn_interval: f32,
    pub obstacle_seconds_per_point: f32,

    // === Background ===
    pub ground_seconds_per_point: f32,
    pub skyline_seconds_per_point: f32,
    pub sky_color: Color,

    // === Failure feedback ===
    pub alert_color: Color,
    pub flash_repeats: u32,
    pub flash_hold: f32,

    // === Flyer ===
    pub rotation_min: f32,
    pub rotation_max: f32,
    pub rotation_gain_descending: f32,
    pub rotation_gain_ascending: f32,
    pub flyer_frame_time: f32,

    /// Uniform sprite scale applied to every texture
    pub sprite_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            gravity: Vec2::from(GRAVITY),
            flap_impulse: Vec2::from(FLAP_IMPULSE),
            points_per_unit: POINTS_PER_UNIT,

            vertical_pipe_gap: VERTICAL_PIPE_GAP,
            spawn_interval: SPAWN_INTERVAL,
            obstacle_seconds_per_point: OBSTACLE_SECONDS_PER_POINT,

            ground_seconds_per_point: GROUND_SECONDS_PER_POINT,
            skyline_seconds_per_point: SKYLINE_SECONDS_PER_POINT,
            sky_color: Color::SKY,

            alert_color: Color::ALERT,
            flash_repeats: FLASH_REPEATS,
            flash_hold: FLASH_HOLD,

            rotation_min: ROTATION_MIN,
            rotation_max: ROTATION_MAX,
            rotation_gain_descending: ROTATION_GAIN_DESCENDING,
            rotation_gain_ascending: ROTATION_GAIN_ASCENDING,
            flyer_frame_time: FLYER_FRAME_TIME,

            sprite_scale: SPRITE_SCALE,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Exclusive upper bound of the lower obstacle's placement
    pub fn spawn_range(&self) -> u32 {
        (self.viewport_height / 3.0) as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if self.spawn_range() == 0 {
            return Err(ConfigError::EmptySpawnRange(self.viewport_height));
        }

        let positives = [
            ("points_per_unit", self.points_per_unit),
            ("spawn_interval", self.spawn_interval),
            ("obstacle_seconds_per_point", self.obstacle_seconds_per_point),
            ("ground_seconds_per_point", self.ground_seconds_per_point),
            ("skyline_seconds_per_point", self.skyline_seconds_per_point),
            ("flash_hold", self.flash_hold),
            ("flyer_frame_time", self.flyer_frame_time),
            ("sprite_scale", self.sprite_scale),
        ];
        for (name, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        for (name, value) in [
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
        }

        if !(self.vertical_pipe_gap >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "vertical_pipe_gap",
                value: self.vertical_pipe_gap,
            });
        }
        if !(self.rotation_min <= self.rotation_max) {
            return Err(ConfigError::InvertedRotationClamp {
                min: self.rotation_min,
                max: self.rotation_max,
            });
        }
        if self.flash_repeats == 0 {
            return Err(ConfigError::NoFlashRepeats);
        }
        Ok(())
    }
}
