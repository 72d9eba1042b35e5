//! Game error type

use oasis_engine::assets::ResourceError;
use oasis_engine::config::ConfigError;
use oasis_engine::scene::{SceneError, TerrainError};
use thiserror::Error;

/// Errors that abort game setup
#[derive(Error, Debug)]
pub enum GameError {
    /// Missing or mistyped resource
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Invalid scene graph operation
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Heightmap could not be built
    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
