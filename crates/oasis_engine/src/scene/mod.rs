//! Scene management system
//!
//! Hierarchical scene graph of transformable, drawable game entities.
//! Following Game Engine Architecture Chapter 11.2.7 - Scene Graphs.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena owner)
//!      ↓
//! Node (transform, orbit joint, behavior, draw binding)
//!      ↓
//! Renderer (per-node world + normal matrix)
//! ```
//!
//! - World transform = parent world × T(position) × orbit × R(orientation)
//! - Scale applies to a node's own geometry only
//! - Terrain answers ground-height queries for placement and collisions

mod node;
mod scene_graph;
mod terrain;
pub mod entities;

pub use node::{
    Behavior, DrawBinding, LightParams, Node, NodeKey, NodeKind, Orbit, PrimitiveMode, SwayDirection,
    SwayState, UpdateContext, UpdateHook,
};
pub use scene_graph::{SceneError, SceneGraph};
pub use terrain::{HeightMap, Terrain, TerrainError};
pub use entities::TreeBuilder;
