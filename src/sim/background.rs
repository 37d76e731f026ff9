//! Endless parallax scroll bands
//!
//! A band lays `ceil(viewport / tile) + 1` tiles side by side on a strip node.
//! The strip runs forever: slide left one tile width, then snap back to its
//! home offset with zero duration. Tiles never move relative to each other,
//! so the seams stay closed however long the session runs. Strips hang off
//! the moving root, so freezing the world stops them.

use glam::Vec2;

use super::graph::{NodeId, NodeKind, SceneGraph, SpeedScale};
use super::timeline::{Sequence, Step};
use crate::renderer::Sprite;

/// How to build one band
#[derive(Debug, Clone)]
pub struct BandSpec {
    pub sprite: Sprite,
    /// Scaled tile size
    pub tile_size: Vec2,
    /// Vertical center of the tiles
    pub y: f32,
    pub z: f32,
    /// Slide duration per point; larger is slower (further away)
    pub seconds_per_point: f32,
}

#[derive(Debug, Clone)]
pub struct ScrollBand {
    pub sprite: Sprite,
    pub tile_size: Vec2,
    strip: NodeId,
    tiles: Vec<NodeId>,
}

impl ScrollBand {
    /// Tiles needed to cover `viewport_width` with one to spare
    pub fn tile_count(viewport_width: f32, tile_width: f32) -> usize {
        (viewport_width / tile_width).ceil() as usize + 1
    }

    /// Lay out the band's tiles under `parent` and start them scrolling
    pub fn build(
        band: usize,
        spec: &BandSpec,
        viewport_width: f32,
        graph: &mut SceneGraph,
        parent: NodeId,
    ) -> Self {
        let width = spec.tile_size.x;
        let count = Self::tile_count(viewport_width, width);
        let home = Vec2::new(0.0, spec.y);

        let strip = graph.add(
            parent,
            NodeKind::Strip { band },
            home,
            spec.z,
            SpeedScale::Fixed(1.0),
        );
        graph.run_action(
            strip,
            None,
            Sequence::forever(vec![
                Step::MoveBy {
                    delta: Vec2::new(-width, 0.0),
                    duration: spec.seconds_per_point * width,
                },
                Step::Place(home),
            ]),
        );

        let tiles = (0..count)
            .map(|i| {
                graph.add(
                    strip,
                    NodeKind::Tile { band },
                    Vec2::new(i as f32 * width, 0.0),
                    spec.z,
                    SpeedScale::Fixed(1.0),
                )
            })
            .collect();

        Self {
            sprite: spec.sprite,
            tile_size: spec.tile_size,
            strip,
            tiles,
        }
    }

    /// Node carrying the tiles
    pub fn strip(&self) -> NodeId {
        self.strip
    }

    pub fn tiles(&self) -> &[NodeId] {
        &self.tiles
    }
}
