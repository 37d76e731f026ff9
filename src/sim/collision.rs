//! Collision detection and category filtering
//!
//! Every body declares the category it belongs to and a mask of categories it
//! wants to hear about. A contact is reported only when both sides select each
//! other. The flyer is a circle; obstacles and the world bound are axis-aligned
//! rectangles.

use std::collections::HashSet;
use std::ops::BitOr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::graph::{NodeId, NodeKind, SceneGraph};
use super::spawner::SegmentSlot;
use super::world::WorldState;

/// Collision category bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(pub u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const FLYER: Category = Category(1 << 0);
    pub const WORLD: Category = Category(1 << 1);
    pub const OBSTACLE: Category = Category(1 << 2);

    #[inline]
    pub fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

/// Hitbox geometry, centered on the owner's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// A physics body's filtering data and shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub category: Category,
    pub contact_mask: Category,
    pub shape: Shape,
}

impl Body {
    pub fn flyer(radius: f32) -> Self {
        Self {
            category: Category::FLYER,
            contact_mask: Category::OBSTACLE | Category::WORLD,
            shape: Shape::Circle { radius },
        }
    }

    pub fn obstacle(size: Vec2) -> Self {
        Self {
            category: Category::OBSTACLE,
            contact_mask: Category::FLYER,
            shape: Shape::Rect {
                half_extents: size / 2.0,
            },
        }
    }

    pub fn world_bound(size: Vec2) -> Self {
        Self {
            category: Category::WORLD,
            contact_mask: Category::FLYER,
            shape: Shape::Rect {
                half_extents: size / 2.0,
            },
        }
    }

    /// Both bodies want to hear about each other
    pub fn selects(&self, other: &Body) -> bool {
        self.contact_mask.intersects(other.category) && other.contact_mask.intersects(self.category)
    }
}

/// A body that never moves on its own
#[derive(Debug, Clone, Copy)]
pub struct StaticBody {
    pub position: Vec2,
    pub body: Body,
}

/// Reported once when two selecting bodies start touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: Category,
    pub b: Category,
}

impl ContactEvent {
    pub fn involves(&self, category: Category) -> bool {
        self.a == category || self.b == category
    }
}

/// Something that reacts to contacts
pub trait CollisionListener {
    fn on_contact(&mut self, event: &ContactEvent, world: &mut WorldState, graph: &mut SceneGraph);
}

/// Check overlap between a circle and an axis-aligned rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = center.clamp(rect_center - half_extents, rect_center + half_extents);
    center.distance_squared(closest) < radius * radius
}

/// Check overlap between two shapes at the given positions
pub fn shapes_overlap(a_pos: Vec2, a: &Shape, b_pos: Vec2, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            let r = ra + rb;
            a_pos.distance_squared(b_pos) < r * r
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_overlap(a_pos, *radius, b_pos, *half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            circle_rect_overlap(b_pos, *radius, a_pos, *half_extents)
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            let d = (a_pos - b_pos).abs();
            d.x < ha.x + hb.x && d.y < ha.y + hb.y
        }
    }
}

/// Identity of whatever the flyer is touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKey {
    Bound(usize),
    Segment(NodeId, SegmentSlot),
}

/// Tracks which bodies the flyer overlaps so each contact begins only once
#[derive(Debug, Default)]
pub struct CollisionSystem {
    touching: HashSet<BodyKey>,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bodies currently overlapping the flyer
    pub fn touching(&self) -> usize {
        self.touching.len()
    }

    /// Test the flyer against every bound and obstacle segment. Returns the
    /// contacts that began this step.
    pub fn detect(
        &mut self,
        flyer_pos: Vec2,
        flyer: &Body,
        bounds: &[StaticBody],
        graph: &SceneGraph,
    ) -> Vec<ContactEvent> {
        let mut now_touching = HashSet::new();
        let mut began = Vec::new();

        let mut test = |key: BodyKey, pos: Vec2, body: &Body| {
            if !flyer.selects(body) || !shapes_overlap(flyer_pos, &flyer.shape, pos, &body.shape) {
                return;
            }
            now_touching.insert(key);
            if !self.touching.contains(&key) {
                began.push(ContactEvent {
                    a: flyer.category,
                    b: body.category,
                });
            }
        };

        for (i, bound) in bounds.iter().enumerate() {
            test(BodyKey::Bound(i), bound.position, &bound.body);
        }

        for node in graph.iter() {
            let NodeKind::Obstacles(pair) = &node.kind else {
                continue;
            };
            let origin = graph.world_position(node.id);
            for segment in &pair.segments {
                test(
                    BodyKey::Segment(node.id, segment.slot),
                    origin + segment.offset,
                    &segment.body,
                );
            }
        }

        self.touching = now_touching;
        began
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::graph::SpeedScale;
    use crate::sim::spawner::{ObstaclePair, ObstacleSegment};

    fn ground() -> StaticBody {
        StaticBody {
            position: Vec2::new(160.0, 56.0),
            body: Body::world_bound(Vec2::new(320.0, 112.0)),
        }
    }

    fn pair_at(y: f32) -> ObstaclePair {
        let size = Vec2::new(52.0, 320.0);
        let segment = |slot, offset| ObstacleSegment {
            slot,
            offset,
            size,
            body: Body::obstacle(size),
        };
        ObstaclePair {
            spawned_at: 0.0,
            y,
            segments: [
                segment(SegmentSlot::Lower, Vec2::new(0.0, y)),
                segment(SegmentSlot::Upper, Vec2::new(0.0, y + 420.0)),
            ],
        }
    }

    #[test]
    fn test_category_bits_are_disjoint() {
        let all = [Category::FLYER, Category::WORLD, Category::OBSTACLE];
        for (i, a) in all.iter().enumerate() {
            assert_eq!(a.0.count_ones(), 1);
            for b in &all[i + 1..] {
                assert!(!a.intersects(*b));
            }
        }
    }

    #[test]
    fn test_selection_is_mutual() {
        let flyer = Body::flyer(12.0);
        let pipe = Body::obstacle(Vec2::new(52.0, 320.0));
        let bound = Body::world_bound(Vec2::new(320.0, 112.0));

        assert!(flyer.selects(&pipe));
        assert!(flyer.selects(&bound));
        assert!(!pipe.selects(&bound));
        assert!(!bound.selects(&pipe));

        let deaf = Body {
            contact_mask: Category::NONE,
            ..flyer
        };
        assert!(!deaf.selects(&pipe));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let half = Vec2::new(10.0, 10.0);
        assert!(circle_rect_overlap(Vec2::new(15.0, 0.0), 6.0, Vec2::ZERO, half));
        assert!(!circle_rect_overlap(Vec2::new(17.0, 0.0), 6.0, Vec2::ZERO, half));
        // Corner: distance sqrt(2)*5 ~ 7.07
        assert!(!circle_rect_overlap(Vec2::new(15.0, 15.0), 7.0, Vec2::ZERO, half));
        assert!(circle_rect_overlap(Vec2::new(15.0, 15.0), 7.1, Vec2::ZERO, half));
        // Center inside
        assert!(circle_rect_overlap(Vec2::ZERO, 1.0, Vec2::ZERO, half));
    }

    #[test]
    fn test_rect_rect_overlap() {
        let a = Shape::Rect {
            half_extents: Vec2::new(5.0, 5.0),
        };
        assert!(shapes_overlap(Vec2::ZERO, &a, Vec2::new(9.0, 0.0), &a));
        assert!(!shapes_overlap(Vec2::ZERO, &a, Vec2::new(11.0, 0.0), &a));
    }

    #[test]
    fn test_ground_contact_begins_once() {
        let mut system = CollisionSystem::new();
        let graph = SceneGraph::new();
        let flyer = Body::flyer(12.0);
        let bounds = [ground()];

        let events = system.detect(Vec2::new(80.0, 120.0), &flyer, &bounds, &graph);
        assert_eq!(
            events,
            vec![ContactEvent {
                a: Category::FLYER,
                b: Category::WORLD
            }]
        );

        // Still resting on the ground: no new contact
        let events = system.detect(Vec2::new(80.0, 118.0), &flyer, &bounds, &graph);
        assert!(events.is_empty());
        assert_eq!(system.touching(), 1);

        // Leave and come back: contact begins again
        assert!(system.detect(Vec2::new(80.0, 300.0), &flyer, &bounds, &graph).is_empty());
        assert_eq!(system.detect(Vec2::new(80.0, 110.0), &flyer, &bounds, &graph).len(), 1);
    }

    #[test]
    fn test_obstacle_contact_uses_scrolled_position() {
        let mut system = CollisionSystem::new();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let id = graph.add(
            root,
            NodeKind::Obstacles(pair_at(100.0)),
            Vec2::new(80.0, 0.0),
            0.0,
            SpeedScale::Fixed(1.0),
        );
        let flyer = Body::flyer(12.0);

        // In the gap: lower top at 260, upper bottom at 360
        assert!(system.detect(Vec2::new(80.0, 310.0), &flyer, &[], &graph).is_empty());

        // Touching the lower segment
        let events = system.detect(Vec2::new(80.0, 265.0), &flyer, &[], &graph);
        assert_eq!(events.len(), 1);
        assert!(events[0].involves(Category::OBSTACLE));

        // Scroll the pair away
        graph.get_mut(id).unwrap().position.x = 300.0;
        assert!(system.detect(Vec2::new(80.0, 265.0), &flyer, &[], &graph).is_empty());
        assert_eq!(system.touching(), 0);
    }
}
