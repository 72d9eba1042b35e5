//! Physics module for collision detection
//!
//! Sphere-sphere overlap tests used by the per-tick collision sweep.

pub mod collision;

pub use collision::BoundingSphere;
