//! Scene graph ownership and traversal
//!
//! Nodes live in a slot-map arena. The graph keeps two views over it:
//!
//! ```text
//! roots        [terrain, light, orb1, tree, orb2, ...]   insertion order, owned
//!                           |
//!                           +-- children (owned by their parent)
//! collidables  [orb1, orb2, ...]                          references only
//! ```
//!
//! Children are reachable only through their parent, so a child is never
//! updated or drawn twice.

use slotmap::SlotMap;
use thiserror::Error;

use super::node::{Node, NodeKey, UpdateContext};
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::render::{Camera, DrawCall, Renderer, ShaderUniforms};

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Key does not refer to a live node
    #[error("Node {0:?} is not in the scene graph")]
    NodeNotFound(NodeKey),

    /// Requested parent link would make a node its own ancestor
    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Node being parented
        child: NodeKey,
        /// Requested parent
        parent: NodeKey,
    },

    /// Tree generator parameters out of range
    #[error("Invalid tree: {0}")]
    InvalidTree(&'static str),
}

/// Owner of every node in the world
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
    collidables: Vec<NodeKey>,
    background_color: Vec3,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(Vec3::zeros())
    }
}

impl SceneGraph {
    /// Create an empty graph cleared to `background_color` before each draw
    pub fn new(background_color: Vec3) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            collidables: Vec::new(),
            background_color,
        }
    }

    /// Take ownership of a top-level node.
    ///
    /// Collidable nodes are also indexed in the collidable subset.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let collidable = node.is_collidable();
        let key = self.nodes.insert(node);
        self.roots.push(key);
        if collidable {
            self.collidables.push(key);
        }
        log::trace!("Added node {:?} (collidable: {})", key, collidable);
        key
    }

    /// Insert `node` as an owned child of `parent`.
    ///
    /// Children are never top-level entries and are not indexed as
    /// collidables; they update and draw through their parent.
    pub fn add_child(&mut self, parent: NodeKey, mut node: Node) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(key);
        }
        Ok(key)
    }

    /// Set or clear a non-owning parent back-reference.
    ///
    /// The parent's world transform is composed into the child's, but the
    /// child stays where it is owned.
    pub fn set_parent(&mut self, child: NodeKey, parent: Option<NodeKey>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(SceneError::WouldCycle { child, parent });
                }
                cursor = self.nodes.get(ancestor).and_then(Node::parent);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = parent;
        }
        Ok(())
    }

    /// First top-level node with `name`.
    ///
    /// Duplicate names are allowed; lookup is linear and the earliest
    /// insertion wins.
    pub fn get_node(&self, name: &str) -> Option<NodeKey> {
        self.roots
            .iter()
            .copied()
            .find(|&key| self.nodes.get(key).is_some_and(|node| node.name() == name))
    }

    /// Borrow a node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Remove the first collidable named `name` and destroy its subtree.
    ///
    /// Returns `false` when no collidable matches, so repeating a removal is
    /// a no-op. Only collidables are searched: an earlier non-collidable node
    /// with the same name is left alone.
    pub fn remove_collidable(&mut self, name: &str) -> bool {
        let found = self
            .collidables
            .iter()
            .copied()
            .find(|&key| self.nodes.get(key).is_some_and(|node| node.name() == name));
        match found {
            Some(key) => self.remove_collidable_key(key),
            None => {
                log::debug!("remove_collidable: no collidable named \"{}\"", name);
                false
            }
        }
    }

    /// Remove a specific collidable and destroy its subtree.
    ///
    /// The node leaves both the collidable subset and the top-level list.
    /// Back-references held by other nodes to anything destroyed are cleared.
    pub fn remove_collidable_key(&mut self, key: NodeKey) -> bool {
        let Some(index) = self.collidables.iter().position(|&k| k == key) else {
            return false;
        };
        self.collidables.remove(index);
        if let Some(root_index) = self.roots.iter().position(|&root| root == key) {
            self.roots.remove(root_index);
        }

        let removed = self.destroy_subtree(key);
        self.collidables.retain(|k| self.nodes.contains_key(*k));
        let dangling: Vec<NodeKey> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_some_and(|p| !self.nodes.contains_key(p)))
            .map(|(k, _)| k)
            .collect();
        for k in dangling {
            if let Some(node) = self.nodes.get_mut(k) {
                node.parent = None;
            }
        }
        log::debug!("Removed collidable {:?} ({} nodes destroyed)", key, removed);
        true
    }

    fn destroy_subtree(&mut self, key: NodeKey) -> usize {
        let Some(node) = self.nodes.remove(key) else {
            return 0;
        };
        // The owner may differ from the back-reference after set_parent
        for (_, owner) in &mut self.nodes {
            owner.children.retain(|&c| c != key);
        }
        1 + node
            .children
            .iter()
            .map(|&child| self.destroy_subtree(child))
            .sum::<usize>()
    }

    /// World transform of a node, composed through its parent chain
    pub fn world_transform(&self, key: NodeKey) -> Option<Mat4> {
        let node = self.nodes.get(key)?;
        let parent_world = match node.parent() {
            Some(parent) => self.world_transform(parent)?,
            None => Mat4::identity(),
        };
        Some(parent_world * node.local_transform())
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_transform(key).map(|m| m.column(3).xyz())
    }

    /// Run one simulation tick over every top-level node, in insertion order.
    ///
    /// Each node runs its behavior and then updates its children.
    pub fn update_all(&mut self, dt: f32, ctx: &UpdateContext) {
        for index in 0..self.roots.len() {
            let key = self.roots[index];
            self.update_node(key, dt, ctx);
        }
    }

    fn update_node(&mut self, key: NodeKey, dt: f32, ctx: &UpdateContext) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        node.run_behavior(ctx, dt);

        let mut index = 0;
        while let Some(child) = self.nodes.get(key).and_then(|n| n.children.get(index).copied()) {
            self.update_node(child, dt, ctx);
            index += 1;
        }
    }

    /// Clear with the background color, then draw every drawable node.
    ///
    /// Each node is drawn with the same matrix [`Self::world_transform`]
    /// reports, so a back-reference set with [`Self::set_parent`] moves the
    /// drawn node too.
    pub fn draw_all(&self, renderer: &mut dyn Renderer, camera: &Camera, timer: f32) {
        renderer.clear(self.background_color);
        for &key in &self.roots {
            self.draw_node(key, None, renderer, camera, timer);
        }
    }

    fn draw_node(
        &self,
        key: NodeKey,
        owner: Option<(NodeKey, &Mat4)>,
        renderer: &mut dyn Renderer,
        camera: &Camera,
        timer: f32,
    ) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        // The owner's matrix is reusable only while the back-reference still points at it
        let world = match (node.parent(), owner) {
            (None, _) => node.local_transform(),
            (Some(parent), Some((owner, owner_world))) if parent == owner => owner_world * node.local_transform(),
            (Some(_), _) => match self.world_transform(key) {
                Some(world) => world,
                None => return,
            },
        };

        if let Some(binding) = node.drawable() {
            let model = world * Mat4::new_nonuniform_scaling(&node.scale());
            let call = DrawCall {
                node: node.name(),
                binding,
                uniforms: ShaderUniforms::new(&model, &utils::normal_matrix(&model), timer),
            };
            renderer.draw(camera, &call);
        }

        for &child in node.children() {
            self.draw_node(child, Some((key, &world)), renderer, camera, timer);
        }
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Collidable subset in insertion order
    pub fn collidables(&self) -> &[NodeKey] {
        &self.collidables
    }

    /// Total live nodes, children included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear color
    pub fn background_color(&self) -> Vec3 {
        self.background_color
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ResourceKind, ResourceManager};
    use crate::render::RecordingRenderer;
    use crate::scene::node::{Behavior, DrawBinding, NodeKind};
    use approx::assert_relative_eq;

    fn orb(name: &str, position: Vec3) -> Node {
        Node::new(name)
            .with_kind(NodeKind::Orb)
            .collidable(1.0)
            .at(position)
    }

    #[test]
    fn test_add_node_indexes_collidables() {
        let mut graph = SceneGraph::default();
        graph.add_node(Node::new("terrain"));
        let orb_key = graph.add_node(orb("orb", Vec3::zeros()));

        assert_eq!(graph.roots().len(), 2);
        assert_eq!(graph.collidables(), &[orb_key]);
    }

    #[test]
    fn test_children_are_not_top_level() {
        let mut graph = SceneGraph::default();
        let tree = graph.add_node(Node::new("tree"));
        let branch = graph.add_child(tree, Node::new("branch")).unwrap();

        assert_eq!(graph.roots(), &[tree]);
        assert_eq!(graph.node(tree).unwrap().children(), &[branch]);
        assert_eq!(graph.get_node("branch"), None);
    }

    #[test]
    fn test_get_node_first_match_wins() {
        let mut graph = SceneGraph::default();
        let first = graph.add_node(Node::new("Orb"));
        graph.add_node(Node::new("Orb"));
        assert_eq!(graph.get_node("Orb"), Some(first));
        assert_eq!(graph.get_node("Missing"), None);
    }

    #[test]
    fn test_remove_collidable_is_idempotent() {
        let mut graph = SceneGraph::default();
        graph.add_node(orb("orb1", Vec3::zeros()));
        let keep = graph.add_node(orb("orb2", Vec3::x()));

        assert!(graph.remove_collidable("orb1"));
        assert_eq!(graph.get_node("orb1"), None);
        assert_eq!(graph.collidables(), &[keep]);
        assert_eq!(graph.roots(), &[keep]);

        assert!(!graph.remove_collidable("orb1"));
        assert_eq!(graph.collidables(), &[keep]);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_remove_only_touches_matching_duplicate() {
        let mut graph = SceneGraph::default();
        // Non-collidable node listed first with the same name
        let decoration = graph.add_node(Node::new("orb"));
        let collidable = graph.add_node(orb("orb", Vec3::zeros()));

        assert!(graph.remove_collidable("orb"));
        assert!(graph.node(collidable).is_none());
        assert_eq!(graph.roots(), &[decoration]);
    }

    #[test]
    fn test_remove_destroys_subtree_and_clears_back_references() {
        let mut graph = SceneGraph::default();
        let holder = graph.add_node(orb("holder", Vec3::zeros()));
        let child = graph.add_child(holder, Node::new("child")).unwrap();
        let follower = graph.add_node(Node::new("follower"));
        graph.set_parent(follower, Some(holder)).unwrap();

        assert!(graph.remove_collidable("holder"));
        assert!(graph.node(child).is_none());
        assert_eq!(graph.node(follower).unwrap().parent(), None);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut graph = SceneGraph::default();
        let a = graph.add_node(Node::new("a"));
        let b = graph.add_child(a, Node::new("b")).unwrap();

        assert_eq!(
            graph.set_parent(a, Some(b)),
            Err(SceneError::WouldCycle { child: a, parent: b })
        );
        assert_eq!(
            graph.set_parent(a, Some(a)),
            Err(SceneError::WouldCycle { child: a, parent: a })
        );
    }

    #[test]
    fn test_world_transform_composes_parent() {
        let mut graph = SceneGraph::default();
        let mut parent = Node::new("parent").at(Vec3::new(10.0, 0.0, 0.0));
        parent.set_orientation(utils::angle_axis(std::f32::consts::FRAC_PI_2, Vec3::y()));
        let parent = graph.add_node(parent);
        let child = graph
            .add_child(parent, Node::new("child").at(Vec3::new(0.0, 0.0, 1.0)))
            .unwrap();

        // Child sits one unit along the parent's rotated +Z, which is world +X
        let position = graph.world_position(child).unwrap();
        assert_relative_eq!(position, Vec3::new(11.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_scale_is_not_inherited() {
        let mut graph = SceneGraph::default();
        let mut parent = Node::new("parent");
        parent.set_scale(Vec3::new(5.0, 5.0, 5.0));
        let parent = graph.add_node(parent);
        let child = graph
            .add_child(parent, Node::new("child").at(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        assert_relative_eq!(graph.world_position(child).unwrap(), Vec3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_update_all_reaches_children_once() {
        let mut graph = SceneGraph::default();
        let counter = |node: &mut Node, _: &UpdateContext, _: f32| node.translate(Vec3::x());

        let root = graph.add_node(Node::new("root").with_behavior(Behavior::Hook(Box::new(counter))));
        let child = graph
            .add_child(root, Node::new("child").with_behavior(Behavior::Hook(Box::new(counter))))
            .unwrap();

        graph.update_all(0.05, &UpdateContext::default());
        assert_eq!(graph.node(root).unwrap().position().x, 1.0);
        assert_eq!(graph.node(child).unwrap().position().x, 1.0);
    }

    #[test]
    fn test_draw_all_clears_then_draws_drawables() {
        let mut resources = ResourceManager::new();
        let mesh = resources.register_placeholder("Orb", ResourceKind::Mesh);
        let material = resources.register_placeholder("ObjectMaterial", ResourceKind::Material);
        let binding = DrawBinding::new(mesh, material, None, None).unwrap();

        let mut graph = SceneGraph::new(Vec3::new(0.3, 0.4, 0.5));
        let parent = graph.add_node(Node::new("joint").at(Vec3::new(0.0, 5.0, 0.0)));
        let mut drawn = Node::new("orb").with_drawable(binding).at(Vec3::new(1.0, 0.0, 0.0));
        drawn.set_scale(Vec3::new(2.0, 2.0, 2.0));
        graph.add_child(parent, drawn).unwrap();

        let mut renderer = RecordingRenderer::default();
        graph.draw_all(&mut renderer, &Camera::default(), 1.5);

        assert_eq!(renderer.clear_color(), Some(Vec3::new(0.3, 0.4, 0.5)));
        assert_eq!(renderer.frames(), 1);
        assert_eq!(renderer.draws().len(), 1);
        let record = &renderer.draws()[0];
        assert_eq!(record.node, "orb");
        assert_eq!(record.uniforms.timer[0], 1.5);
        let model = Mat4::from(record.uniforms.model);
        assert_relative_eq!(model.column(3).xyz(), Vec3::new(1.0, 5.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(model[(0, 0)], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_draw_follows_reassigned_parent() {
        let mut resources = ResourceManager::new();
        let mesh = resources.register_placeholder("Orb", ResourceKind::Mesh);
        let material = resources.register_placeholder("ObjectMaterial", ResourceKind::Material);
        let binding = DrawBinding::new(mesh, material, None, None).unwrap();

        let mut graph = SceneGraph::default();
        let owner = graph.add_node(Node::new("owner").at(Vec3::new(0.0, 5.0, 0.0)));
        let other = graph.add_node(Node::new("other").at(Vec3::new(100.0, 0.0, 0.0)));
        let child = graph.add_child(owner, Node::new("child").with_drawable(binding)).unwrap();
        graph.set_parent(child, Some(other)).unwrap();

        let mut renderer = RecordingRenderer::default();
        graph.draw_all(&mut renderer, &Camera::default(), 0.0);

        let world = graph.world_position(child).unwrap();
        assert_relative_eq!(world, Vec3::new(100.0, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(renderer.draws().len(), 1);
        let model = Mat4::from(renderer.draws()[0].uniforms.model);
        assert_relative_eq!(model.column(3).xyz(), world, epsilon = 1e-6);
    }

    #[test]
    fn test_removing_reparented_child_leaves_owner_clean() {
        let mut graph = SceneGraph::default();
        let owner = graph.add_node(Node::new("owner"));
        let holder = graph.add_node(orb("holder", Vec3::zeros()));
        let child = graph.add_child(owner, Node::new("child")).unwrap();
        graph.set_parent(child, Some(holder)).unwrap();

        // Owned by `owner`, so removing `holder` only clears the back-reference
        assert!(graph.remove_collidable("holder"));
        assert_eq!(graph.node(owner).unwrap().children(), &[child]);
        assert_eq!(graph.node(child).unwrap().parent(), None);
    }
}
