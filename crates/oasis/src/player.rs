//! Player flight model
//!
//! The player is not a scene node. It owns a key to a shape node in the graph
//! and copies its frame into it after every integration step.

use oasis_engine::foundation::math::{utils, Quat, Vec3};
use oasis_engine::physics::BoundingSphere;
use oasis_engine::scene::{NodeKey, SceneGraph};

use crate::config::{MovementMode, PlayerConfig, TravelBounds};

/// Player position, orientation and speed
#[derive(Debug, Clone)]
pub struct Player {
    position: Vec3,
    orientation: Quat,
    forward: Vec3,
    side: Vec3,
    speed: f32,
    acceleration: f32,
    max_speed: f32,
    impulse_speed: f32,
    radius: f32,
    mode: MovementMode,
    bounds: TravelBounds,
    shape: Option<NodeKey>,
}

impl Player {
    /// Create a player at rest at the origin
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            forward: Vec3::z(),
            side: Vec3::x(),
            speed: 0.0,
            acceleration: config.acceleration,
            max_speed: config.max_speed,
            impulse_speed: config.impulse_speed,
            radius: config.radius,
            mode: config.movement_mode,
            bounds: config.bounds,
            shape: None,
        }
    }

    /// Place the player and fix its local basis from a look-at frame.
    ///
    /// The basis is computed once; later turns only change the orientation.
    pub fn init(&mut self, position: Vec3, look_at: Vec3, up: Vec3) {
        self.position = position;
        self.orientation = Quat::identity();
        self.forward = -(look_at - position).try_normalize(1.0e-6).unwrap_or_else(|| -Vec3::z());
        self.side = up.cross(&self.forward).try_normalize(1.0e-6).unwrap_or_else(Vec3::x);
    }

    /// Attach the render shape node
    pub fn set_shape(&mut self, shape: NodeKey) {
        self.shape = Some(shape);
    }

    /// Render shape node
    pub fn shape(&self) -> Option<NodeKey> {
        self.shape
    }

    /// Integrate one tick, clamp to the travel box and sync the shape node
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        self.position += self.speed * dt * self.forward();
        self.position = self.bounds.clamp(self.position);
        if self.mode == MovementMode::Impulse {
            self.speed = 0.0;
        }

        if let Some(shape) = self.shape.and_then(|key| scene.node_mut(key)) {
            shape.set_position(self.position);
            shape.set_orientation(self.orientation);
        }
        log::trace!("Player at {:?}, speed {}", self.position, self.speed);
    }

    /// Increase speed by `s * acceleration` unless that would pass the max
    pub fn accelerate(&mut self, s: f32) {
        let next = self.speed + s * self.acceleration;
        if next <= self.max_speed {
            self.speed = next;
        }
    }

    /// Decrease speed by `s` unless that would go negative
    pub fn decelerate(&mut self, s: f32) {
        if self.speed - s >= 0.0 {
            self.speed -= s;
        }
    }

    /// Fly forward at the impulse speed for the next tick
    pub fn move_forward(&mut self) {
        self.speed = self.impulse_speed;
    }

    /// Fly backward at the impulse speed for the next tick
    pub fn move_backward(&mut self) {
        self.speed = -self.impulse_speed;
    }

    /// Cap the max speed at zero
    pub fn move_stop(&mut self) {
        self.max_speed = 0.0;
    }

    /// Raise the max speed
    pub fn add_max_speed(&mut self, amount: f32) {
        self.max_speed += amount;
        log::info!("Max speed increased by {} to {}", amount, self.max_speed);
    }

    /// Rotate about the current side axis
    pub fn pitch(&mut self, angle: f32) {
        self.rotate(utils::angle_axis(angle, self.side()));
    }

    /// Rotate about the initial up axis
    pub fn yaw(&mut self, angle: f32) {
        self.rotate(utils::angle_axis(angle, self.forward.cross(&self.side)));
    }

    /// Rotate about the initial forward axis
    pub fn roll(&mut self, angle: f32) {
        self.rotate(utils::angle_axis(angle, self.forward));
    }

    /// Left-multiply the orientation, then renormalize
    pub fn rotate(&mut self, rotation: Quat) {
        self.orientation = rotation * self.orientation;
        self.orientation.renormalize();
    }

    /// Flight direction in world space
    pub fn forward(&self) -> Vec3 {
        -(self.orientation * self.forward)
    }

    /// Right vector in world space
    pub fn side(&self) -> Vec3 {
        self.orientation * self.side
    }

    /// Up vector in world space
    pub fn up(&self) -> Vec3 {
        (-self.forward()).cross(&self.side())
    }

    /// Local forward basis vector (points backwards from the flight direction)
    pub fn forward_basis(&self) -> Vec3 {
        self.forward
    }

    /// Local side basis vector
    pub fn side_basis(&self) -> Vec3 {
        self.side
    }

    /// Position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current max speed
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Bounding radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Bounding sphere at the current position
    pub fn bounds(&self) -> BoundingSphere {
        BoundingSphere::new(self.position, self.radius)
    }

    /// Speed model in use
    pub fn movement_mode(&self) -> MovementMode {
        self.mode
    }
}
