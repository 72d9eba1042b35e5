//! # Rendering System
//!
//! Camera model and the boundary between the scene graph and a graphics
//! backend.
//!
//! ## Architecture
//!
//! - **Camera**: player-following perspective camera that also mirrors the
//!   active light for shading
//! - **Renderer**: backend trait receiving per-node world matrix, normal
//!   matrix and elapsed time
//! - **RecordingRenderer**: backend-free implementation for headless runs
//!
//! Shader compilation, buffer upload and draw submission belong to the
//! backend behind [`Renderer`].

pub mod camera;
pub mod renderer;

pub use camera::Camera;
pub use renderer::{CameraUniforms, DrawCall, DrawRecord, RecordingRenderer, Renderer, ShaderUniforms};
