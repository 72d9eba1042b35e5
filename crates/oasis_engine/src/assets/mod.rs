//! Asset management system
//!
//! The engine never parses asset files itself. A loading collaborator
//! uploads geometry, shader programs and textures to the graphics backend and
//! registers the resulting opaque handles here by name. Handles are shared
//! read-only (`Arc`) by every node that uses them.

pub mod resource_manager;

pub use resource_manager::{
    Resource, ResourceKind, ResourceManager, ResourceError,
};
