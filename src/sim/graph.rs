//! Scene graph arena
//!
//! Nodes live in a flat `Vec` sorted by `NodeId`; parents are referenced by
//! id, never by pointer. A node's effective speed is the product of its own
//! `SpeedScale` and every ancestor's, so freezing the world stops exactly the
//! subtrees whose scale is bound to it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawner::ObstaclePair;
use super::timeline::{Effect, Sequence};
use super::world::WorldState;
use crate::Color;

/// Stable handle to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// How a node scales the time flowing into its actions (and its children's)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedScale {
    Fixed(f32),
    /// Follows `WorldState::speed`
    World,
}

/// Instant side effects scheduled actions can request
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    SpawnObstacles,
    Background(Color),
}

/// A cue together with the node whose action fired it
#[derive(Debug, Clone, PartialEq)]
pub struct Fired {
    pub node: NodeId,
    pub cue: Cue,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Scene root; its timeline ignores world speed
    Root,
    /// Container for everything that scrolls
    Moving,
    /// Carrier that slides one scroll band's tiles
    Strip { band: usize },
    /// One tile of a scroll band
    Tile { band: usize },
    Obstacles(ObstaclePair),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub scale: SpeedScale,
    /// Offset from the parent
    pub position: Vec2,
    pub z: f32,
    pub kind: NodeKind,
    actions: Vec<(Option<&'static str>, Sequence<Cue>)>,
}

impl Node {
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    next_id: u32,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![Node {
                id: root,
                parent: None,
                scale: SpeedScale::Fixed(1.0),
                position: Vec2::ZERO,
                z: 0.0,
                kind: NodeKind::Root,
                actions: Vec::new(),
            }],
            next_id: 1,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Attach a new node under `parent`
    pub fn add(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        position: Vec2,
        z: f32,
        scale: SpeedScale,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        // Ids only grow, so pushing keeps the vec sorted
        self.nodes.push(Node {
            id,
            parent: Some(parent),
            scale,
            position,
            z,
            kind,
            actions: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index_of(id).map(move |i| &mut self.nodes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.parent == Some(parent))
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.binary_search_by_key(&id, |n| n.id).ok()
    }

    /// Speed factor after composing every ancestor's scale
    pub fn effective_speed(&self, id: NodeId, world: &WorldState) -> f32 {
        let mut speed = 1.0;
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            speed *= match node.scale {
                SpeedScale::Fixed(s) => s,
                SpeedScale::World => world.speed(),
            };
            cursor = node.parent.and_then(|p| self.get(p));
        }
        speed
    }

    /// Scene-space position (sum of offsets up to the root)
    pub fn world_position(&self, id: NodeId) -> Vec2 {
        let mut pos = Vec2::ZERO;
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            pos += node.position;
            cursor = node.parent.and_then(|p| self.get(p));
        }
        pos
    }

    /// Run an action on a node. A keyed action replaces any running action
    /// with the same key.
    pub fn run_action(&mut self, id: NodeId, key: Option<&'static str>, action: Sequence<Cue>) {
        let Some(node) = self.get_mut(id) else {
            log::warn!("run_action on missing node {:?}", id);
            return;
        };
        if key.is_some() {
            node.actions.retain(|(k, _)| *k != key);
        }
        if !action.is_finished() {
            node.actions.push((key, action));
        }
    }

    /// Cancel a keyed action. Returns whether one was running.
    pub fn remove_action(&mut self, id: NodeId, key: &'static str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let before = node.actions.len();
        node.actions.retain(|(k, _)| *k != Some(key));
        let cancelled = node.actions.len() != before;
        if cancelled {
            log::trace!("cancelled action {:?} on {:?}", key, id);
        }
        cancelled
    }

    pub fn has_action(&self, id: NodeId, key: &'static str) -> bool {
        self.get(id)
            .is_some_and(|n| n.actions.iter().any(|(k, _)| *k == Some(key)))
    }

    /// Detach a node and everything below it
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(self.children(parent).map(|n| n.id));
            i += 1;
        }
        self.nodes.retain(|n| !doomed.contains(&n.id));
        log::trace!("removed {} node(s) under {:?}", doomed.len(), id);
    }

    /// Advance every running action by `dt` scaled by its node's effective
    /// speed. Translations are applied in place; removals happen after all
    /// actions ran. Returns cues in node order.
    pub fn advance(&mut self, world: &WorldState, dt: f32) -> Vec<Fired> {
        let scales: Vec<f32> = self
            .nodes
            .iter()
            .map(|n| self.effective_speed(n.id, world))
            .collect();

        let mut fired = Vec::new();
        let mut doomed = Vec::new();
        let mut effects = Vec::new();

        for (node, scale) in self.nodes.iter_mut().zip(scales) {
            let local_dt = dt * scale;
            if node.actions.is_empty() || local_dt <= 0.0 {
                continue;
            }
            for (_, action) in node.actions.iter_mut() {
                action.advance(local_dt, &mut effects);
                for effect in effects.drain(..) {
                    match effect {
                        Effect::Translate(delta) => node.position += delta,
                        Effect::Place(target) => node.position = target,
                        Effect::Emit(cue) => fired.push(Fired { node: node.id, cue }),
                        Effect::Remove => doomed.push(node.id),
                    }
                }
            }
            node.actions.retain(|(_, a)| !a.is_finished());
        }

        for id in doomed {
            self.remove(id);
        }
        fired
    }
}
