//! # Follow Camera
//!
//! Camera driven by a fixed local basis rotated by an orientation
//! quaternion, the same model the player uses. In play mode it mirrors the
//! player every tick; in debug mode it flies freely.
//!
//! ## Design Principles
//! - **Library-agnostic**: No graphics API calls in camera math
//! - **Passive follower**: No independent physics; state is copied in
//! - **Light mirror**: Carries the active light's parameters to shaders

use crate::foundation::math::{utils, Mat4, Mat4Ext, Quat, Vec3};

/// Camera with a player-style basis and perspective projection
///
/// # Coordinate System
/// Right-handed, Y-up. `forward` (the stored basis vector) points from the
/// look-at target back towards the eye, so [`Camera::forward`] negates it to
/// give the viewing direction.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    orientation: Quat,
    forward: Vec3,
    side: Vec3,

    /// Field of view angle in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,

    light_position: Vec3,
    light_color: Vec3,
    spec_power: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            forward: Vec3::z(),
            side: Vec3::x(),
            fov: utils::deg_to_rad(60.0),
            aspect: 800.0 / 600.0,
            near: 0.01,
            far: 1000.0,
            light_position: Vec3::zeros(),
            light_color: Vec3::new(1.0, 1.0, 1.0),
            spec_power: 1.0,
        };
        camera.set_view(Vec3::new(0.0, 0.0, 800.0), Vec3::zeros(), Vec3::y());
        camera
    }
}

impl Camera {
    /// Reset position and basis from an eye point, a target and an up vector.
    ///
    /// Orientation returns to identity.
    pub fn set_view(&mut self, position: Vec3, look_at: Vec3, up: Vec3) {
        self.position = position;
        self.orientation = Quat::identity();
        self.forward = -(look_at - position).try_normalize(1.0e-6).unwrap_or_else(|| -Vec3::z());
        self.side = up.cross(&self.forward).try_normalize(1.0e-6).unwrap_or_else(Vec3::x);
        log::trace!("Camera view set - position: {:?}, look_at: {:?}", position, look_at);
    }

    /// Set the projection from a field of view in degrees and viewport size
    pub fn set_projection(&mut self, fov_degrees: f32, near: f32, far: f32, width: f32, height: f32) {
        self.fov = utils::deg_to_rad(fov_degrees);
        self.near = near;
        self.far = far;
        self.set_aspect_ratio(width / height.max(1.0));
    }

    /// Update the aspect ratio after a viewport change
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Mirror the player's frame: orientation, local basis and position
    pub fn follow(&mut self, orientation: Quat, forward: Vec3, side: Vec3, position: Vec3) {
        self.orientation = orientation;
        self.forward = forward;
        self.side = side;
        self.position = position;
    }

    /// Mirror the active light
    pub fn update_light_info(&mut self, position: Vec3, color: Vec3, spec_power: f32) {
        self.light_position = position;
        self.light_color = color;
        self.spec_power = spec_power;
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the camera (debug free-fly)
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Translate the camera (debug free-fly)
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Current orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Viewing direction in world space
    pub fn forward(&self) -> Vec3 {
        -(self.orientation * self.forward)
    }

    /// Right vector in world space
    pub fn side(&self) -> Vec3 {
        self.orientation * self.side
    }

    /// Up vector in world space
    pub fn up(&self) -> Vec3 {
        (self.orientation * self.forward).cross(&self.side())
    }

    /// Rotate about the current side axis
    pub fn pitch(&mut self, angle: f32) {
        self.rotate(utils::angle_axis(angle, self.side()));
    }

    /// Rotate about the current up axis
    pub fn yaw(&mut self, angle: f32) {
        self.rotate(utils::angle_axis(angle, self.up()));
    }

    /// Rotate about the current viewing axis
    pub fn roll(&mut self, angle: f32) {
        self.rotate(utils::angle_axis(angle, self.orientation * self.forward));
    }

    fn rotate(&mut self, rotation: Quat) {
        self.orientation = rotation * self.orientation;
        self.orientation.renormalize();
    }

    /// Light position mirrored from the active light
    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    /// Light color mirrored from the active light
    pub fn light_color(&self) -> Vec3 {
        self.light_color
    }

    /// Specular power mirrored from the active light
    pub fn spec_power(&self) -> f32 {
        self.spec_power
    }

    /// World-to-camera transform built from the rotated basis
    pub fn get_view_matrix(&self) -> Mat4 {
        let eye = self.position;
        Mat4::look_at(eye, eye + self.forward(), self.up())
    }

    /// Perspective projection matrix
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_view_looks_down_negative_z() {
        let camera = Camera::default();
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 800.0));
        assert_relative_eq!(camera.forward(), -Vec3::z(), epsilon = 1e-6);
        assert_relative_eq!(camera.side(), Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(camera.up(), Vec3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::default();
        let view = camera.get_view_matrix();
        let eye = view.transform_point(&Point3::new(0.0, 0.0, 800.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1e-3);

        // A point in front of the camera lands on -Z in view space
        let ahead = view.transform_point(&Point3::new(0.0, 0.0, 790.0));
        assert_relative_eq!(ahead.coords, Vec3::new(0.0, 0.0, -10.0), epsilon = 1e-3);
    }

    #[test]
    fn test_yaw_turns_forward_towards_side() {
        let mut camera = Camera::default();
        camera.yaw(-std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(camera.forward(), Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(camera.up(), Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_follow_mirrors_player_frame() {
        let mut camera = Camera::default();
        let orientation = utils::angle_axis(0.4, Vec3::y());
        camera.follow(orientation, Vec3::z(), Vec3::x(), Vec3::new(1.0, 2.0, 3.0));

        assert_relative_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(camera.forward(), -(orientation * Vec3::z()), epsilon = 1e-6);
    }

    #[test]
    fn test_set_projection_uses_viewport() {
        let mut camera = Camera::default();
        camera.set_projection(90.0, 0.1, 500.0, 1920.0, 1080.0);
        assert_relative_eq!(camera.aspect, 1920.0 / 1080.0);
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_2);
    }
}
