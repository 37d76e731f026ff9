//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only, driven by [`LoopDriver`]
//! - Scheduled motion through node actions in a [`SceneGraph`]
//! - No rendering or platform dependencies
//!
//! The only nondeterminism is the obstacle RNG, which callers can replace
//! with a seeded one through [`GameScene::with_rng`].

pub mod background;
pub mod clock;
pub mod collision;
pub mod flyer;
pub mod game;
pub mod graph;
pub mod scene;
pub mod spawner;
pub mod timeline;
pub mod world;

pub use background::{BandSpec, ScrollBand};
pub use clock::LoopDriver;
pub use collision::{
    Body, Category, CollisionListener, CollisionSystem, ContactEvent, Shape, StaticBody,
    circle_rect_overlap, shapes_overlap,
};
pub use flyer::Flyer;
pub use game::{GamePhase, GameStateMachine};
pub use graph::{Cue, Fired, NodeId, NodeKind, SceneGraph, SpeedScale};
pub use scene::{FrameInput, GameScene};
pub use spawner::{ObstaclePair, ObstacleSegment, ObstacleSpawner, SegmentSlot};
pub use timeline::{Repeat, Sequence, Step};
pub use world::{Frame, Updatable, WorldState};
