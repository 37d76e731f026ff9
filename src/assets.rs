//! Texture metrics
//!
//! The core never touches pixels. It only needs each texture's size to lay out
//! sprites and size physics bodies; loading the images is someone else's job.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Every texture a scene needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureId {
    Bird1,
    Bird2,
    Ground,
    Skyline,
    Pipe1,
    Pipe2,
}

impl TextureId {
    pub const ALL: [TextureId; 6] = [
        TextureId::Bird1,
        TextureId::Bird2,
        TextureId::Ground,
        TextureId::Skyline,
        TextureId::Pipe1,
        TextureId::Pipe2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextureId::Bird1 => "Bird1",
            TextureId::Bird2 => "Bird2",
            TextureId::Ground => "Ground",
            TextureId::Skyline => "Skyline",
            TextureId::Pipe1 => "Pipe1",
            TextureId::Pipe2 => "Pipe2",
        }
    }
}

/// Anything that can report the unscaled size of a texture
pub trait TextureSource {
    fn texture_size(&self, id: TextureId) -> Option<Vec2>;

    /// Size of a texture that must exist and be drawable
    fn require(&self, id: TextureId) -> Result<Vec2, SceneError> {
        let size = self
            .texture_size(id)
            .ok_or(SceneError::MissingTexture(id))?;
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(SceneError::InvalidTexture {
                id,
                width: size.x,
                height: size.y,
            });
        }
        Ok(size)
    }
}

/// Texture sizes keyed by texture name, loadable from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    pub textures: HashMap<String, [f32; 2]>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: TextureId, width: f32, height: f32) -> Self {
        self.textures.insert(id.name().to_string(), [width, height]);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sizes of the stock pixel-art sprite sheet
    pub fn stock() -> Self {
        Self::new()
            .with(TextureId::Bird1, 17.0, 12.0)
            .with(TextureId::Bird2, 17.0, 12.0)
            .with(TextureId::Ground, 168.0, 56.0)
            .with(TextureId::Skyline, 144.0, 43.0)
            .with(TextureId::Pipe1, 26.0, 160.0)
            .with(TextureId::Pipe2, 26.0, 160.0)
    }
}

impl TextureSource for AssetManifest {
    fn texture_size(&self, id: TextureId) -> Option<Vec2> {
        self.textures.get(id.name()).map(|&[w, h]| Vec2::new(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_manifest_has_everything() {
        let manifest = AssetManifest::stock();
        for id in TextureId::ALL {
            assert!(manifest.require(id).is_ok(), "{:?} missing", id);
        }
    }

    #[test]
    fn test_require_missing() {
        let manifest = AssetManifest::new().with(TextureId::Bird1, 17.0, 12.0);
        assert!(matches!(
            manifest.require(TextureId::Pipe1),
            Err(SceneError::MissingTexture(TextureId::Pipe1))
        ));
    }

    #[test]
    fn test_require_rejects_degenerate_size() {
        let manifest = AssetManifest::new().with(TextureId::Ground, 0.0, 56.0);
        assert!(matches!(
            manifest.require(TextureId::Ground),
            Err(SceneError::InvalidTexture { .. })
        ));
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest =
            AssetManifest::from_json(r#"{ "textures": { "Pipe1": [26.0, 160.0] } }"#).unwrap();
        assert_eq!(
            manifest.texture_size(TextureId::Pipe1),
            Some(Vec2::new(26.0, 160.0))
        );
        assert_eq!(manifest.texture_size(TextureId::Pipe2), None);
    }
}
