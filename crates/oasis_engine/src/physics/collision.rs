//! Collision primitives
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.4 - Collision
//! Primitives. Sphere tests only; no swept volumes, so a fast mover can
//! tunnel through a thin target between ticks.

use crate::foundation::math::Vec3;

/// Sphere for broad collision checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether the spheres overlap.
    ///
    /// Touching spheres (`radius sum == distance`) do not intersect.
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        self.radius + other.radius > self.distance_to(other)
    }

    /// Distance between centers
    pub fn distance_to(&self, other: &BoundingSphere) -> f32 {
        (self.center - other.center).magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_touching_is_not_a_collision() {
        let player = BoundingSphere::new(Vec3::zeros(), 1.0);
        let orb = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(!player.intersects(&orb));
    }

    #[test]
    fn test_just_inside_collides() {
        let player = BoundingSphere::new(Vec3::zeros(), 1.0);
        let orb = BoundingSphere::new(Vec3::new(1.999, 0.0, 0.0), 1.0);
        assert!(player.intersects(&orb));
        assert!(orb.intersects(&player));
    }

    #[test]
    fn test_distance_uses_all_axes() {
        let a = BoundingSphere::new(Vec3::new(1.0, 2.0, 2.0), 0.5);
        let b = BoundingSphere::new(Vec3::zeros(), 0.5);
        assert_relative_eq!(a.distance_to(&b), 3.0);
    }
}
