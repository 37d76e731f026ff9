//! Scene composition
//!
//! Builds the whole world from a config and texture metrics, then runs one
//! simulation step at a time in a fixed order:
//! input -> scheduled actions -> component updates -> collisions.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::background::{BandSpec, ScrollBand};
use super::collision::{Body, CollisionListener, CollisionSystem, StaticBody};
use super::flyer::Flyer;
use super::game::{GamePhase, GameStateMachine};
use super::graph::{NodeId, NodeKind, SceneGraph, SpeedScale};
use super::spawner::{ObstaclePair, ObstacleSpawner};
use super::world::{Frame, Updatable, WorldState};
use crate::Color;
use crate::assets::{TextureId, TextureSource};
use crate::config::SceneConfig;
use crate::consts::SKYLINE_Z;
use crate::error::SceneError;
use crate::renderer::{Drawable, RenderFrame, Sprite};

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Tap / click / key press
    pub activate: bool,
}

pub struct GameScene {
    config: SceneConfig,
    world: WorldState,
    graph: SceneGraph,
    /// Parent of everything that scrolls; bound to world speed
    moving: NodeId,
    bands: Vec<ScrollBand>,
    flyer: Flyer,
    flyer_size: Vec2,
    bounds: Vec<StaticBody>,
    spawner: ObstacleSpawner,
    collisions: CollisionSystem,
    state: GameStateMachine,
    pipe_sizes: [Vec2; 2],
}

impl GameScene {
    /// Build a scene. Fails if the config is invalid or a texture is missing.
    pub fn new(config: SceneConfig, textures: &impl TextureSource) -> Result<Self, SceneError> {
        Self::build(config, textures, None)
    }

    /// Build a scene with a caller-supplied obstacle RNG
    pub fn with_rng(
        config: SceneConfig,
        textures: &impl TextureSource,
        rng: Pcg32,
    ) -> Result<Self, SceneError> {
        Self::build(config, textures, Some(rng))
    }

    fn build(
        config: SceneConfig,
        textures: &impl TextureSource,
        rng: Option<Pcg32>,
    ) -> Result<Self, SceneError> {
        config.validate()?;

        let scale = config.sprite_scale;
        let flyer_size = textures.require(TextureId::Bird1)? * scale;
        textures.require(TextureId::Bird2)?;
        let ground = textures.require(TextureId::Ground)? * scale;
        let skyline = textures.require(TextureId::Skyline)? * scale;
        let lower = textures.require(TextureId::Pipe1)? * scale;
        let upper = textures.require(TextureId::Pipe2)? * scale;

        let viewport = config.viewport();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let moving = graph.add(root, NodeKind::Moving, Vec2::ZERO, 0.0, SpeedScale::World);

        let bands = vec![
            ScrollBand::build(
                0,
                &BandSpec {
                    sprite: Sprite::Ground,
                    tile_size: ground,
                    y: ground.y / 2.0,
                    z: 0.0,
                    seconds_per_point: config.ground_seconds_per_point,
                },
                viewport.x,
                &mut graph,
                moving,
            ),
            ScrollBand::build(
                1,
                &BandSpec {
                    sprite: Sprite::Skyline,
                    tile_size: skyline,
                    y: skyline.y / 2.0 + ground.y,
                    z: SKYLINE_Z,
                    seconds_per_point: config.skyline_seconds_per_point,
                },
                viewport.x,
                &mut graph,
                moving,
            ),
        ];

        // Ground strip across the whole viewport
        let bounds = vec![StaticBody {
            position: Vec2::new(viewport.x / 2.0, ground.y / 2.0),
            body: Body::world_bound(Vec2::new(viewport.x, ground.y)),
        }];

        let flyer = Flyer::new(
            &config,
            Vec2::new(viewport.x / 4.0, viewport.y / 2.0),
            flyer_size,
        );

        let spawner = match rng {
            Some(rng) => ObstacleSpawner::with_rng(&config, lower, upper, moving, rng),
            None => ObstacleSpawner::new(&config, lower, upper, moving),
        };
        spawner.start(&mut graph);

        log::info!(
            "scene ready: {}x{} viewport, {} ground / {} skyline tiles",
            viewport.x,
            viewport.y,
            bands[0].tiles().len(),
            bands[1].tiles().len()
        );

        Ok(Self {
            world: WorldState::new(config.gravity),
            state: GameStateMachine::new(&config),
            config,
            graph,
            moving,
            bands,
            flyer,
            flyer_size,
            bounds,
            spawner,
            collisions: CollisionSystem::new(),
            pipe_sizes: [lower, upper],
        })
    }

    /// Advance the simulation by one step of `dt` seconds
    pub fn step(&mut self, input: &FrameInput, dt: f32) {
        if input.activate {
            self.flyer.activate();
        }

        self.world.advance(dt);
        let cues = self.graph.advance(&self.world, dt);

        let mut frame = Frame {
            world: &self.world,
            graph: &mut self.graph,
            dt,
            cues: &cues,
        };
        self.flyer.update(&mut frame);
        self.spawner.update(&mut frame);
        self.state.update(&mut frame);

        let contacts = self.collisions.detect(
            self.flyer.position,
            &self.flyer.body,
            &self.bounds,
            &self.graph,
        );
        for contact in &contacts {
            self.state.on_contact(contact, &mut self.world, &mut self.graph);
        }
    }

    /// Snapshot of everything drawable, back to front
    pub fn render(&self) -> RenderFrame {
        let mut drawables = Vec::new();

        for band in &self.bands {
            for &tile in band.tiles() {
                drawables.push(Drawable {
                    sprite: band.sprite,
                    position: self.graph.world_position(tile),
                    size: band.tile_size,
                    rotation: 0.0,
                    frame: 0,
                    z: self.graph.get(tile).map_or(0.0, |n| n.z),
                });
            }
        }

        for (id, pair) in self.obstacle_pairs() {
            let origin = self.graph.world_position(id);
            let z = self.graph.get(id).map_or(0.0, |n| n.z);
            for (segment, sprite) in pair.segments.iter().zip([Sprite::PipeLower, Sprite::PipeUpper]) {
                drawables.push(Drawable {
                    sprite,
                    position: origin + segment.offset,
                    size: segment.size,
                    rotation: 0.0,
                    frame: 0,
                    z,
                });
            }
        }

        drawables.push(Drawable {
            sprite: Sprite::Flyer,
            position: self.flyer.position,
            size: self.flyer_size,
            rotation: self.flyer.rotation(),
            frame: self.flyer.frame(),
            z: 0.0,
        });

        RenderFrame::new(self.state.background(), drawables)
    }

    /// Live obstacle pairs in spawn order
    pub fn obstacle_pairs(&self) -> impl Iterator<Item = (NodeId, &ObstaclePair)> {
        self.graph.iter().filter_map(|n| match &n.kind {
            NodeKind::Obstacles(pair) => Some((n.id, pair)),
            _ => None,
        })
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn flyer(&self) -> &Flyer {
        &self.flyer
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn background(&self) -> Color {
        self.state.background()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn moving_root(&self) -> NodeId {
        self.moving
    }

    /// Scaled sizes of the lower and upper obstacle sprites
    pub fn pipe_sizes(&self) -> [Vec2; 2] {
        self.pipe_sizes
    }
}
