//! Procedural obstacle pairs
//!
//! On a fixed timer the spawner drops a pair of segments just past the right
//! edge with a random vertical offset and a fixed opening between them. Each
//! pair carries its own move-then-remove action, so the spawner keeps no list
//! of what it created.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Body;
use super::graph::{Cue, NodeId, NodeKind, SceneGraph, SpeedScale};
use super::timeline::{Sequence, Step};
use super::world::{Frame, Updatable};
use crate::config::SceneConfig;
use crate::consts::OBSTACLE_Z;

/// Key of the spawn timer on the root timeline
pub const SPAWN_ACTION: &str = "spawn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentSlot {
    Lower,
    Upper,
}

/// One static rectangular member of a pair
#[derive(Debug, Clone)]
pub struct ObstacleSegment {
    pub slot: SegmentSlot,
    /// Center, relative to the pair
    pub offset: Vec2,
    pub size: Vec2,
    pub body: Body,
}

impl ObstacleSegment {
    pub fn bottom(&self) -> f32 {
        self.offset.y - self.size.y / 2.0
    }

    pub fn top(&self) -> f32 {
        self.offset.y + self.size.y / 2.0
    }
}

/// Two segments sharing an x position and a gap origin
#[derive(Debug, Clone)]
pub struct ObstaclePair {
    /// World time at spawn
    pub spawned_at: f64,
    /// Random placement of the lower segment's center
    pub y: f32,
    pub segments: [ObstacleSegment; 2],
}

impl ObstaclePair {
    pub fn lower(&self) -> &ObstacleSegment {
        &self.segments[0]
    }

    pub fn upper(&self) -> &ObstacleSegment {
        &self.segments[1]
    }

    /// Opening between the two segments' bodies
    pub fn gap(&self) -> f32 {
        self.upper().bottom() - self.lower().top()
    }

    /// Widest member, used for off-screen tests
    pub fn width(&self) -> f32 {
        self.lower().size.x.max(self.upper().size.x)
    }
}

pub struct ObstacleSpawner {
    rng: Pcg32,
    lower_size: Vec2,
    upper_size: Vec2,
    gap: f32,
    spawn_range: u32,
    viewport_width: f32,
    seconds_per_point: f32,
    interval: f32,
    /// Scrolling parent new pairs are attached to
    parent: NodeId,
    spawned: u64,
    suppressed: u64,
}

impl ObstacleSpawner {
    /// Spawner with an entropy-seeded RNG
    pub fn new(config: &SceneConfig, lower_size: Vec2, upper_size: Vec2, parent: NodeId) -> Self {
        Self::with_rng(config, lower_size, upper_size, parent, Pcg32::from_os_rng())
    }

    /// Spawner with a caller-supplied RNG
    pub fn with_rng(
        config: &SceneConfig,
        lower_size: Vec2,
        upper_size: Vec2,
        parent: NodeId,
        rng: Pcg32,
    ) -> Self {
        Self {
            rng,
            lower_size,
            upper_size,
            gap: config.vertical_pipe_gap,
            spawn_range: config.spawn_range().max(1),
            viewport_width: config.viewport_width,
            seconds_per_point: config.obstacle_seconds_per_point,
            interval: config.spawn_interval,
            parent,
            spawned: 0,
            suppressed: 0,
        }
    }

    /// Spawn first, then wait, forever
    pub fn timer(&self) -> Sequence<Cue> {
        Sequence::forever(vec![Step::Emit(Cue::SpawnObstacles), Step::Wait(self.interval)])
    }

    /// Install the spawn timer on the scene root
    pub fn start(&self, graph: &mut SceneGraph) {
        let root = graph.root();
        graph.run_action(root, Some(SPAWN_ACTION), self.timer());
    }

    /// Distance a pair travels from entry to removal
    pub fn travel_distance(&self) -> f32 {
        self.viewport_width + 2.0 * self.lower_size.x
    }

    /// Where pairs enter
    pub fn entry_x(&self) -> f32 {
        self.viewport_width + self.lower_size.x
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Uniform draw from `[0, viewport_height / 3)`
    pub fn roll_offset(&mut self) -> f32 {
        self.rng.random_range(0..self.spawn_range) as f32
    }

    /// Lay out a pair around a lower-segment center `y`
    pub fn build_pair(&self, y: f32, now: f64) -> ObstaclePair {
        let lower = ObstacleSegment {
            slot: SegmentSlot::Lower,
            offset: Vec2::new(0.0, y),
            size: self.lower_size,
            body: Body::obstacle(self.lower_size),
        };
        let upper_y = lower.top() + self.gap + self.upper_size.y / 2.0;
        let upper = ObstacleSegment {
            slot: SegmentSlot::Upper,
            offset: Vec2::new(0.0, upper_y),
            size: self.upper_size,
            body: Body::obstacle(self.upper_size),
        };
        ObstaclePair {
            spawned_at: now,
            y,
            segments: [lower, upper],
        }
    }

    /// Create a pair, attach it to the scroll stream and send it on its way
    pub fn spawn(&mut self, graph: &mut SceneGraph, now: f64) -> NodeId {
        let y = self.roll_offset();
        let pair = self.build_pair(y, now);
        let id = graph.add(
            self.parent,
            NodeKind::Obstacles(pair),
            Vec2::new(self.entry_x(), 0.0),
            OBSTACLE_Z,
            SpeedScale::Fixed(1.0),
        );

        let distance = self.travel_distance();
        graph.run_action(
            id,
            None,
            Sequence::once(vec![
                Step::MoveBy {
                    delta: Vec2::new(-distance, 0.0),
                    duration: self.seconds_per_point * distance,
                },
                Step::Remove,
            ]),
        );

        self.spawned += 1;
        log::debug!("spawned obstacle pair {:?} at y={} (t={:.2})", id, y, now);
        id
    }
}

impl Updatable for ObstacleSpawner {
    fn update(&mut self, frame: &mut Frame<'_>) {
        for fired in frame.cues {
            if fired.cue != Cue::SpawnObstacles {
                continue;
            }
            // The timer lives on the root timeline and keeps firing while
            // frozen; nothing may spawn then.
            if frame.world.is_active() {
                self.spawn(frame.graph, frame.world.elapsed());
            } else {
                self.suppressed += 1;
                log::debug!("spawn suppressed, world frozen");
            }
        }
    }
}
