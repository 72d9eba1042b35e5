//! Renderer boundary
//!
//! The scene graph hands every drawable node to a [`Renderer`] as a
//! [`DrawCall`]. A graphics backend implements the trait; the
//! [`RecordingRenderer`] keeps statistics for headless runs and tests.

use bytemuck::{Pod, Zeroable};

use super::camera::Camera;
use crate::foundation::math::{Mat4, Vec3};
use crate::scene::{DrawBinding, PrimitiveMode};

/// Per-draw shader inputs, laid out for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    /// Object to world matrix, scale included (column-major)
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`
    pub normal: [[f32; 4]; 4],
    /// Elapsed time in `x`; `yzw` pad to 16 bytes
    pub timer: [f32; 4],
}

impl ShaderUniforms {
    /// Pack matrices and the timer
    pub fn new(model: &Mat4, normal: &Mat4, timer: f32) -> Self {
        Self {
            model: (*model).into(),
            normal: (*normal).into(),
            timer: [timer, 0.0, 0.0, 0.0],
        }
    }
}

/// Per-frame camera and light inputs
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    /// World to view
    pub view: [[f32; 4]; 4],
    /// View to clip
    pub projection: [[f32; 4]; 4],
    /// Light world position, `w = 1`
    pub light_position: [f32; 4],
    /// Light color in `xyz`, specular power in `w`
    pub light_color: [f32; 4],
}

impl CameraUniforms {
    /// Collect uniforms from the camera's current state
    pub fn from_camera(camera: &Camera) -> Self {
        let light = camera.light_position();
        let color = camera.light_color();
        Self {
            view: camera.get_view_matrix().into(),
            projection: camera.get_projection_matrix().into(),
            light_position: [light.x, light.y, light.z, 1.0],
            light_color: [color.x, color.y, color.z, camera.spec_power()],
        }
    }
}

/// One node's draw request
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Node name, for diagnostics
    pub node: &'a str,
    /// Geometry, material and textures to bind
    pub binding: &'a DrawBinding,
    /// Matrices and timer
    pub uniforms: ShaderUniforms,
}

/// Graphics backend seam
pub trait Renderer {
    /// Clear color and depth for a new frame
    fn clear(&mut self, color: Vec3);

    /// Submit one node
    fn draw(&mut self, camera: &Camera, call: &DrawCall<'_>);
}

/// Draw submitted to a [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// Node name
    pub node: String,
    /// Geometry resource name
    pub geometry: String,
    /// Primitive mode
    pub mode: PrimitiveMode,
    /// Primitive count of the geometry
    pub primitives: u32,
    /// Whether blending was requested
    pub blending: bool,
    /// Per-draw uniforms
    pub uniforms: ShaderUniforms,
    /// Camera uniforms at submission
    pub camera: CameraUniforms,
}

/// Renderer that records the last frame instead of drawing
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: u64,
    total_draws: u64,
    clear_color: Option<Vec3>,
    draws: Vec<DrawRecord>,
}

impl RecordingRenderer {
    /// Frames started (one per `clear`)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws submitted across all frames
    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    /// Color of the most recent clear
    pub fn clear_color(&self) -> Option<Vec3> {
        self.clear_color
    }

    /// Draws of the current frame
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Vec3) {
        self.frames += 1;
        self.clear_color = Some(color);
        self.draws.clear();
    }

    fn draw(&mut self, camera: &Camera, call: &DrawCall<'_>) {
        self.total_draws += 1;
        let geometry = call.binding.geometry();
        log::trace!("Draw \"{}\" with {} ({:?})", call.node, geometry.name(), call.binding.mode());
        self.draws.push(DrawRecord {
            node: call.node.to_string(),
            geometry: geometry.name().to_string(),
            mode: call.binding.mode(),
            primitives: geometry.size(),
            blending: call.binding.blending(),
            uniforms: call.uniforms,
            camera: CameraUniforms::from_camera(camera),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniforms_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 36 * 4);
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 40 * 4);

        let uniforms = ShaderUniforms::new(&Mat4::identity(), &Mat4::identity(), 2.0);
        let bytes: &[u8] = bytemuck::bytes_of(&uniforms);
        assert_eq!(bytes.len(), 144);
    }

    #[test]
    fn test_model_matrix_is_column_major() {
        let model = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let uniforms = ShaderUniforms::new(&model, &utils::normal_matrix(&model), 0.0);
        assert_eq!(uniforms.model[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_camera_uniforms_carry_light() {
        let mut camera = Camera::default();
        camera.update_light_info(Vec3::new(0.0, 5.0, 800.0), Vec3::new(1.0, 0.5, 0.0), 32.0);
        let uniforms = CameraUniforms::from_camera(&camera);
        assert_eq!(uniforms.light_position, [0.0, 5.0, 800.0, 1.0]);
        assert_relative_eq!(uniforms.light_color[3], 32.0);
    }
}
