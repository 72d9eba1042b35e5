//! # Oasis Engine
//!
//! Scene graph and simulation core for a real-time 3D exploration game.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed node hierarchy with orbit joints and per-node behaviors
//! - **Heightmap Terrain**: Ground height, distance and placement queries
//! - **Follow Camera**: Player-mirroring camera with debug free-fly controls
//! - **Renderer Boundary**: Backend trait fed with packed per-draw uniforms
//! - **Configuration**: Serde-backed TOML/RON settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oasis_engine::prelude::*;
//!
//! let mut resources = ResourceManager::new();
//! let mesh = resources.register_placeholder("Orb", ResourceKind::Mesh);
//! let material = resources.register_placeholder("ObjectMaterial", ResourceKind::Material);
//!
//! let mut scene = SceneGraph::new(Vec3::new(0.5, 0.5, 0.5));
//! let binding = DrawBinding::new(mesh, material, None, None)?;
//! scene.add_node(entities::orb("Orb1", binding, 1.0).at(Vec3::new(0.0, 0.0, 780.0)));
//!
//! scene.update_all(0.05, &UpdateContext::default());
//! let mut renderer = RecordingRenderer::default();
//! scene.draw_all(&mut renderer, &Camera::default(), 0.05);
//! # Ok::<(), ResourceError>(())
//! ```

#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod scene;
pub mod render;
pub mod input;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{Resource, ResourceError, ResourceKind, ResourceManager},
        config::{Config, ConfigError},
        foundation::{
            math::{Mat4, Quat, Vec2, Vec3},
            time::{DwellTimer, TickGate},
        },
        input::{HeldKeys, InputEvent, InputState, Key, KeyAction},
        physics::BoundingSphere,
        render::{Camera, RecordingRenderer, Renderer},
        scene::{
            entities, Behavior, DrawBinding, HeightMap, LightParams, Node, NodeKey, NodeKind, SceneError,
            SceneGraph, Terrain, TerrainError, TreeBuilder, UpdateContext,
        },
    };
}
