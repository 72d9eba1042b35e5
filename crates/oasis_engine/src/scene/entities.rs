//! Typed entity constructors
//!
//! Thin builders over [`Node`] that pick the right kind, behavior and
//! collision settings for each world object.

use rand::Rng;

use super::node::{Behavior, DrawBinding, LightParams, Node, NodeKey, NodeKind, SwayState};
use super::scene_graph::{SceneError, SceneGraph};
use crate::foundation::math::{constants, utils, Vec3};

/// Collectible objective
pub fn orb(name: impl Into<String>, binding: DrawBinding, radius: f32) -> Node {
    Node::new(name)
        .with_kind(NodeKind::Orb)
        .with_drawable(binding)
        .collidable(radius)
}

/// Non-interactive world dressing
pub fn decoration(name: impl Into<String>, binding: DrawBinding) -> Node {
    Node::new(name).with_kind(NodeKind::Decoration).with_drawable(binding)
}

/// Light source orbiting about `axis` through `joint` at `speed`
pub fn light(
    name: impl Into<String>,
    binding: Option<DrawBinding>,
    params: LightParams,
    axis: Vec3,
    joint: Vec3,
    speed: f32,
) -> Node {
    let mut node = Node::new(name)
        .with_kind(NodeKind::Light)
        .with_behavior(Behavior::Light(params));
    if let Some(binding) = binding {
        node = node.with_drawable(binding);
    }
    node.set_orbiting(axis, joint, speed);
    node
}

/// Max speed pickup
pub fn powerup(name: impl Into<String>, binding: DrawBinding, radius: f32) -> Node {
    Node::new(name)
        .with_kind(NodeKind::Powerup)
        .with_drawable(binding)
        .collidable(radius)
}

/// Enemy that homes in on the player
pub fn hostile(name: impl Into<String>, binding: DrawBinding, radius: f32, speed: f32) -> Node {
    Node::new(name)
        .with_kind(NodeKind::Hostile)
        .with_drawable(binding)
        .with_behavior(Behavior::Chase { speed })
        .collidable(radius)
}

/// Additively blended particle decoration
pub fn sparkle(name: impl Into<String>, binding: DrawBinding) -> Node {
    decoration(name, binding.with_blending(true))
}

/// Terrain surface node at `origin`
pub fn terrain(name: impl Into<String>, binding: DrawBinding, origin: Vec3) -> Node {
    Node::new(name)
        .with_kind(NodeKind::Terrain)
        .with_drawable(binding)
        .at(origin)
}

/// Recursive branching tree generator
///
/// Every generated branch halves the parent's length and radius and carries
/// one fewer sub-branch, so a tree with `n` branches has depth `n`. Only the
/// first level of branches sways.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    length: f32,
    radius: f32,
    branches: u32,
    thorns: u32,
    trunk: DrawBinding,
    branch: DrawBinding,
    thorn: Option<DrawBinding>,
}

impl TreeBuilder {
    /// Most first-level branches a tree may have; node count grows factorially
    pub const MAX_BRANCHES: u32 = 6;

    /// Start a tree with trunk `length` and `radius`
    pub fn new(trunk: DrawBinding, branch: DrawBinding, length: f32, radius: f32) -> Self {
        Self {
            length,
            radius,
            branches: 4,
            thorns: 3,
            trunk,
            branch,
            thorn: None,
        }
    }

    /// Number of first-level branches
    pub fn branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    /// Attach thorns to every branch
    pub fn thorns(mut self, binding: DrawBinding, per_branch: u32) -> Self {
        self.thorn = Some(binding);
        self.thorns = per_branch;
        self
    }

    /// Build the tree at `position` and add it to `graph`
    pub fn build(&self, graph: &mut SceneGraph, name: &str, position: Vec3, rng: &mut impl Rng) -> Result<NodeKey, SceneError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(SceneError::InvalidTree("trunk length must be positive"));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(SceneError::InvalidTree("trunk radius must not be negative"));
        }
        if self.branches > Self::MAX_BRANCHES {
            return Err(SceneError::InvalidTree("too many branches"));
        }

        let trunk = Node::new(name)
            .with_kind(NodeKind::Decoration)
            .with_drawable(self.trunk.clone())
            .with_behavior(Behavior::Sway(SwayState::default()))
            .at(position);
        let key = graph.add_node(trunk);

        let main_branches = self.grow(graph, key, self.length, self.radius, self.branches, rng)?;
        for branch in main_branches {
            if let Some(node) = graph.node_mut(branch) {
                node.orbit_state_mut().enabled = true;
            }
        }
        log::debug!("Grew tree \"{}\" with {} nodes in graph", name, graph.len());
        Ok(key)
    }

    fn grow(
        &self,
        graph: &mut SceneGraph,
        parent: NodeKey,
        length: f32,
        radius: f32,
        count: u32,
        rng: &mut impl Rng,
    ) -> Result<Vec<NodeKey>, SceneError> {
        let child_length = length / 2.0;
        let child_radius = radius / 2.0;
        let mut grown = Vec::with_capacity(count as usize);

        for i in 0..count {
            let angle = i as f32 * constants::TAU / count as f32 + constants::PI / 3.0;
            let y = length / 4.0 + rng.gen_range(0.0..length / 4.0);
            let reach = child_length / 2.0 + radius / 2.0;
            let position = Vec3::new(reach * angle.cos(), y, reach * angle.sin());

            let mut branch = Node::new("branch")
                .with_kind(NodeKind::Decoration)
                .with_drawable(self.branch.clone())
                .with_behavior(Behavior::Sway(SwayState::default()))
                .at(position);
            branch.set_scale(Vec3::new(0.3, length / 7.0, 0.3));
            let tilt_axis = position.normalize().cross(&Vec3::y());
            branch.set_orientation(utils::angle_axis(-constants::TAU / 5.0, tilt_axis));
            branch.orbit_state_mut().joint = Vec3::new(0.0, y, 0.0);

            let key = graph.add_child(parent, branch)?;
            self.grow(graph, key, child_length, child_radius, count.saturating_sub(1), rng)?;
            self.add_thorns(graph, key, child_length, child_radius, rng)?;
            grown.push(key);
        }
        Ok(grown)
    }

    fn add_thorns(&self, graph: &mut SceneGraph, branch: NodeKey, length: f32, radius: f32, rng: &mut impl Rng) -> Result<(), SceneError> {
        let Some(binding) = &self.thorn else {
            return Ok(());
        };
        for i in 0..self.thorns {
            let angle = i as f32 * constants::TAU / self.thorns as f32;
            let y = -length / 2.0 + rng.gen_range(0.0..length);
            let position = Vec3::new(radius / 2.0 * angle.cos(), y, radius / 2.0 * angle.sin());

            let mut thorn = decoration("thorn", binding.clone()).at(position);
            let axis = position.normalize().cross(&Vec3::z());
            thorn.set_orientation(utils::angle_axis(-constants::PI / 2.0, axis));
            graph.add_child(branch, thorn)?;
        }
        Ok(())
    }
}
