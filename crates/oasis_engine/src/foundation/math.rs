//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, terrain and
//! camera. Everything is a thin alias over `nalgebra` so callers can use the
//! full nalgebra API where needed.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
    UnitQuaternion,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat4, Quat, Unit, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// A degenerate (zero-length) axis yields the identity rotation instead of
    /// a NaN quaternion.
    pub fn angle_axis(angle: f32, axis: Vec3) -> Quat {
        match Unit::try_new(axis, 1.0e-6) {
            Some(axis) => Quat::from_axis_angle(&axis, angle),
            None => Quat::identity(),
        }
    }

    /// Rotation about a pivot expressed in local space.
    ///
    /// Computes `inverse(T(joint)) * R * T(joint)`, the composition used by
    /// orbiting nodes.
    pub fn pivot_rotation(joint: Vec3, rotation: &Quat) -> Mat4 {
        Mat4::new_translation(&(-joint)) * rotation.to_homogeneous() * Mat4::new_translation(&joint)
    }

    /// Inverse-transpose of a world matrix, for transforming normals.
    ///
    /// Singular matrices (zero scale) fall back to identity.
    pub fn normal_matrix(world: &Mat4) -> Mat4 {
        world
            .try_inverse()
            .map_or_else(Mat4::identity, |inverse| inverse.transpose())
    }
}

/// Extension trait for Mat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Create a right-handed perspective projection matrix (OpenGL clip space)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_axis_zero_axis_is_identity() {
        let q = utils::angle_axis(1.0, Vec3::zeros());
        assert_relative_eq!(q, Quat::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_pivot_rotation_fixes_joint() {
        let joint = Vec3::new(0.0, 0.0, 10.0);
        let rotation = utils::angle_axis(1.3, Vec3::y());
        let m = utils::pivot_rotation(joint, &rotation);

        // inverse(T(J)) * R * T(J) maps -J onto itself
        let fixed = m.transform_point(&Point3::from(-joint));
        assert_relative_eq!(fixed.coords, -joint, epsilon = 1e-4);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let rotation = utils::angle_axis(0.7, Vec3::new(1.0, 1.0, 0.0)).to_homogeneous();
        assert_relative_eq!(utils::normal_matrix(&rotation), rotation, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_matrix_singular_falls_back() {
        let singular = Mat4::new_nonuniform_scaling(&Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(utils::normal_matrix(&singular), Mat4::identity());
    }
}
