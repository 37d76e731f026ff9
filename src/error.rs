//! Construction errors
//!
//! The running simulation never fails; only building a scene can.

use thiserror::Error;

use crate::assets::TextureId;

/// Rejected scene configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("viewport height {0} leaves no room for obstacle placement (needs >= 3)")]
    EmptySpawnRange(f32),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },
    #[error("rotation clamp is inverted: min {min} > max {max}")]
    InvertedRotationClamp { min: f32, max: f32 },
    #[error("flash feedback needs at least one repetition")]
    NoFlashRepeats,
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scene could not be assembled
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("required texture {0:?} is missing")]
    MissingTexture(TextureId),
    #[error("texture {id:?} has unusable size {width}x{height}")]
    InvalidTexture { id: TextureId, width: f32, height: f32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
