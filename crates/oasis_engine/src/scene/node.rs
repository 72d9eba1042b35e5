//! Transformable scene node
//!
//! A single node type covers every entity in the world. What an entity *is*
//! lives in [`NodeKind`] (a semantic tag used by collision handling) and what
//! it *does* every tick lives in [`Behavior`], so new entity kinds are added
//! without an inheritance chain.

use std::fmt;
use std::sync::Arc;

use crate::assets::{Resource, ResourceError, ResourceKind};
use crate::foundation::math::{utils, Mat4, Quat, Vec3};

slotmap::new_key_type! {
    /// Stable handle of a node inside a [`SceneGraph`](super::SceneGraph) arena
    pub struct NodeKey;
}

/// Semantic type tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Plain node with no gameplay meaning
    #[default]
    Generic,
    /// Collectible objective
    Orb,
    /// Static or animated world dressing
    Decoration,
    /// Scene light source
    Light,
    /// Heightmap terrain surface
    Terrain,
    /// Render shape of the player
    Player,
    /// Pickup that raises the player's max speed
    Powerup,
    /// Entity whose touch ends the game
    Hostile,
}

/// Orbit joint state
///
/// While enabled, the node rotates about `axis` around a pivot described by
/// the `joint` offset in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Whether the orbit rotation is applied and advanced
    pub enabled: bool,
    /// Current angle in radians; unbounded
    pub angle: f32,
    /// Rotation axis
    pub axis: Vec3,
    /// Angular speed in radians per second
    pub speed: f32,
    /// Joint offset used for the pivot composition
    pub joint: Vec3,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            enabled: false,
            angle: 0.0,
            axis: Vec3::new(1.0, 0.0, 0.0),
            speed: 1.0,
            joint: Vec3::zeros(),
        }
    }
}

impl Orbit {
    /// Advance the angle by `speed * dt` when enabled
    pub fn advance(&mut self, dt: f32) {
        if self.enabled {
            self.angle += self.speed * dt;
        }
    }

    /// `inverse(T(joint)) * R(angle, axis) * T(joint)`, or identity when disabled
    pub fn matrix(&self) -> Mat4 {
        if self.enabled {
            utils::pivot_rotation(self.joint, &utils::angle_axis(self.angle, self.axis))
        } else {
            Mat4::identity()
        }
    }
}

/// Primitive topology used to draw a node's geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    /// `GL_POINTS`-style point sprites
    Points,
    /// Indexed triangles
    Triangles,
}

impl PrimitiveMode {
    fn natural_for(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::PointSet => Some(Self::Points),
            ResourceKind::Mesh => Some(Self::Triangles),
            ResourceKind::Material | ResourceKind::Texture => None,
        }
    }
}

/// Resources a drawable node is bound to
#[derive(Debug, Clone)]
pub struct DrawBinding {
    geometry: Arc<Resource>,
    material: Arc<Resource>,
    texture: Option<Arc<Resource>>,
    normal_map: Option<Arc<Resource>>,
    mode: PrimitiveMode,
    blending: bool,
}

impl DrawBinding {
    /// Bind geometry, material and optional textures.
    ///
    /// The primitive mode follows the geometry kind. Fails with
    /// `TypeMismatch` when any handle has the wrong kind.
    pub fn new(
        geometry: Arc<Resource>,
        material: Arc<Resource>,
        texture: Option<Arc<Resource>>,
        normal_map: Option<Arc<Resource>>,
    ) -> Result<Self, ResourceError> {
        let mode = PrimitiveMode::natural_for(geometry.kind()).ok_or_else(|| {
            ResourceError::TypeMismatch {
                name: geometry.name().to_string(),
                found: geometry.kind(),
                expected: "mesh or point-set geometry",
            }
        })?;
        expect_kind(&material, ResourceKind::Material, "material")?;
        if let Some(texture) = &texture {
            expect_kind(texture, ResourceKind::Texture, "texture")?;
        }
        if let Some(normal_map) = &normal_map {
            expect_kind(normal_map, ResourceKind::Texture, "normal map texture")?;
        }

        Ok(Self {
            geometry,
            material,
            texture,
            normal_map,
            mode,
            blending: false,
        })
    }

    /// Request an explicit draw mode; it must match the geometry kind
    pub fn with_mode(mut self, mode: PrimitiveMode) -> Result<Self, ResourceError> {
        if PrimitiveMode::natural_for(self.geometry.kind()) != Some(mode) {
            return Err(ResourceError::TypeMismatch {
                name: self.geometry.name().to_string(),
                found: self.geometry.kind(),
                expected: match mode {
                    PrimitiveMode::Points => "point-set geometry",
                    PrimitiveMode::Triangles => "mesh geometry",
                },
            });
        }
        self.mode = mode;
        Ok(self)
    }

    /// Enable additive blending (particles); disables depth writes in the backend
    pub fn with_blending(mut self, blending: bool) -> Self {
        self.blending = blending;
        self
    }

    /// Geometry handle
    pub fn geometry(&self) -> &Resource {
        &self.geometry
    }

    /// Material (shader program) handle
    pub fn material(&self) -> &Resource {
        &self.material
    }

    /// Diffuse texture handle
    pub fn texture(&self) -> Option<&Resource> {
        self.texture.as_deref()
    }

    /// Normal map handle
    pub fn normal_map(&self) -> Option<&Resource> {
        self.normal_map.as_deref()
    }

    /// Primitive mode
    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    /// Whether blending is enabled
    pub fn blending(&self) -> bool {
        self.blending
    }
}

fn expect_kind(resource: &Resource, kind: ResourceKind, expected: &'static str) -> Result<(), ResourceError> {
    if resource.kind() == kind {
        Ok(())
    } else {
        Err(ResourceError::TypeMismatch {
            name: resource.name().to_string(),
            found: resource.kind(),
            expected,
        })
    }
}

/// Light emission parameters carried by light nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    /// Light color
    pub color: Vec3,
    /// Specular power
    pub spec_power: f32,
    /// Multiplier applied to the tick delta when the light advances its orbit
    pub orbit_rate: f32,
}

/// Direction of a swaying branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwayDirection {
    /// Angle decreasing
    Clockwise,
    /// Angle increasing
    Counterclockwise,
}

/// Bounded back-and-forth sway driven through the orbit angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwayState {
    /// Current direction
    pub direction: SwayDirection,
    /// Angle magnitude at which the direction flips
    pub amplitude: f32,
    /// Fraction of the tick delta applied per tick
    pub rate: f32,
}

impl SwayState {
    /// Default tree sway: flips at ±π/16, moves at an eighth of real time
    pub const TREE_AMPLITUDE: f32 = std::f32::consts::PI / 16.0;

    /// Sway starting counterclockwise
    pub fn new(amplitude: f32, rate: f32) -> Self {
        Self {
            direction: SwayDirection::Counterclockwise,
            amplitude,
            rate,
        }
    }

    fn step(&mut self, orbit: &mut Orbit, dt: f32) {
        if orbit.angle < -self.amplitude {
            self.direction = SwayDirection::Counterclockwise;
            orbit.angle = -self.amplitude;
        } else if orbit.angle > self.amplitude {
            self.direction = SwayDirection::Clockwise;
            orbit.angle = self.amplitude;
        } else {
            match self.direction {
                SwayDirection::Clockwise => orbit.advance(-dt * self.rate),
                SwayDirection::Counterclockwise => orbit.advance(dt * self.rate),
            }
        }
    }
}

impl Default for SwayState {
    fn default() -> Self {
        Self::new(Self::TREE_AMPLITUDE, 1.0 / 8.0)
    }
}

/// Per-tick information handed to node behaviors
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateContext {
    /// Player world position for this tick
    pub player_position: Vec3,
}

/// Custom update callback for one-off behaviors
pub type UpdateHook = Box<dyn FnMut(&mut Node, &UpdateContext, f32)>;

/// What a node does every simulation tick, before its children update
pub enum Behavior {
    /// Advances its orbit, if enabled
    Static,
    /// Emits light and orbits automatically at `orbit_rate`
    Light(LightParams),
    /// Bounded sway through the orbit angle
    Sway(SwayState),
    /// Moves toward the player at a constant speed
    Chase {
        /// Units per second
        speed: f32,
    },
    /// Arbitrary callback
    Hook(UpdateHook),
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("Static"),
            Self::Light(params) => f.debug_tuple("Light").field(params).finish(),
            Self::Sway(state) => f.debug_tuple("Sway").field(state).finish(),
            Self::Chase { speed } => f.debug_struct("Chase").field("speed", speed).finish(),
            Self::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

impl Behavior {
    fn apply(&mut self, node: &mut Node, ctx: &UpdateContext, dt: f32) {
        match self {
            Self::Static => node.orbit(dt),
            Self::Light(params) => node.orbit(dt * params.orbit_rate),
            Self::Sway(state) => state.step(&mut node.orbit, dt),
            Self::Chase { speed } => {
                let offset = ctx.player_position - node.position;
                if let Some(direction) = offset.try_normalize(1.0e-6) {
                    node.position += direction * (*speed * dt);
                }
            }
            Self::Hook(hook) => hook(node, ctx, dt),
        }
    }
}

/// One object in the scene
#[derive(Debug)]
pub struct Node {
    name: String,
    position: Vec3,
    orientation: Quat,
    scale: Vec3,
    pub(super) parent: Option<NodeKey>,
    pub(super) children: Vec<NodeKey>,
    collidable: bool,
    radius: f32,
    kind: NodeKind,
    orbit: Orbit,
    behavior: Behavior,
    drawable: Option<DrawBinding>,
}

impl Node {
    /// Create an invisible generic node (a pure transform joint)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            parent: None,
            children: Vec::new(),
            collidable: false,
            radius: 1.0,
            kind: NodeKind::Generic,
            orbit: Orbit::default(),
            behavior: Behavior::Static,
            drawable: None,
        }
    }

    /// Create a drawable generic node from resources
    pub fn with_resources(
        name: impl Into<String>,
        geometry: Arc<Resource>,
        material: Arc<Resource>,
        texture: Option<Arc<Resource>>,
        normal_map: Option<Arc<Resource>>,
    ) -> Result<Self, ResourceError> {
        let binding = DrawBinding::new(geometry, material, texture, normal_map)?;
        Ok(Self::new(name).with_drawable(binding))
    }

    /// Builder: attach draw resources
    pub fn with_drawable(mut self, binding: DrawBinding) -> Self {
        self.drawable = Some(binding);
        self
    }

    /// Builder: set the semantic kind
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: set the per-tick behavior
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Builder: mark collidable with a bounding radius
    pub fn collidable(mut self, radius: f32) -> Self {
        self.collidable = true;
        self.radius = radius;
        self
    }

    /// Builder: set position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Scale (applied at draw time only, not inherited)
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set local orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Set scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Move by `translation`
    pub fn translate(&mut self, translation: Vec3) {
        self.position += translation;
    }

    /// Left-multiply the orientation by `rotation`, then renormalize.
    ///
    /// Not commutative: `rotate(a); rotate(b)` yields `b * a * q`.
    pub fn rotate(&mut self, rotation: Quat) {
        self.orientation = rotation * self.orientation;
        self.orientation.renormalize();
    }

    /// Multiply the scale component-wise
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale.component_mul_assign(&factor);
    }

    /// Non-owning parent back-reference
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Owned children
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Whether the node takes part in collision sweeps
    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    /// Bounding sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Semantic kind
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Orbit state
    pub fn orbit_state(&self) -> &Orbit {
        &self.orbit
    }

    /// Mutable orbit state
    pub fn orbit_state_mut(&mut self) -> &mut Orbit {
        &mut self.orbit
    }

    /// Enable orbiting about `axis` through the `joint` pivot at `speed`
    pub fn set_orbiting(&mut self, axis: Vec3, joint: Vec3, speed: f32) {
        self.orbit.enabled = true;
        self.orbit.axis = axis;
        self.orbit.joint = joint;
        self.orbit.speed = speed;
    }

    /// Advance the orbit angle by `speed * dt` (no-op unless orbiting)
    pub fn orbit(&mut self, dt: f32) {
        self.orbit.advance(dt);
    }

    /// Current behavior
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Light parameters, for light nodes
    pub fn light(&self) -> Option<&LightParams> {
        match &self.behavior {
            Behavior::Light(params) => Some(params),
            _ => None,
        }
    }

    /// Draw resources, when drawable
    pub fn drawable(&self) -> Option<&DrawBinding> {
        self.drawable.as_ref()
    }

    /// Mutable draw resources
    pub fn drawable_mut(&mut self) -> Option<&mut DrawBinding> {
        self.drawable.as_mut()
    }

    /// Local transform: `T(position) * Orbit * R(orientation)`.
    ///
    /// Scale is excluded; it only applies to the node's own geometry.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * self.orbit.matrix() * self.orientation.to_homogeneous()
    }

    /// Run this node's own behavior for one tick (children are not visited)
    pub(super) fn run_behavior(&mut self, ctx: &UpdateContext, dt: f32) {
        let mut behavior = std::mem::replace(&mut self.behavior, Behavior::Static);
        behavior.apply(self, ctx, dt);
        self.behavior = behavior;
    }
}
