//! Heightmap terrain queries
//!
//! The terrain is a byte grid stretched over a rectangular footprint centred
//! on the terrain node's position. Heights are sampled nearest-cell, no
//! interpolation.

use std::path::Path;
use thiserror::Error;

use super::node::Node;
use crate::foundation::math::Vec3;

/// Terrain construction errors
#[derive(Error, Debug)]
pub enum TerrainError {
    /// Grid has a zero dimension
    #[error("Heightmap grid is empty ({width}x{height})")]
    EmptyGrid {
        /// Grid width in samples
        width: u32,
        /// Grid height in samples
        height: u32,
    },

    /// Sample count does not match the declared dimensions
    #[error("Heightmap has {actual} samples, expected {expected}")]
    SizeMismatch {
        /// `width * height`
        expected: usize,
        /// Samples supplied
        actual: usize,
    },

    /// Source image could not be decoded
    #[error("Failed to load heightmap image: {0}")]
    Image(#[from] image::ImageError),
}

/// Immutable row-major byte grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightMap {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl HeightMap {
    /// Wrap raw samples; `samples[row * width + col]`
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyGrid { width, height });
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(TerrainError::SizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self { width, height, samples })
    }

    /// Every cell set to `value`
    pub fn flat(width: u32, height: u32, value: u8) -> Result<Self, TerrainError> {
        Self::new(width, height, vec![value; width as usize * height as usize])
    }

    /// Generate samples from `f(col, row)`
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Result<Self, TerrainError> {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                samples.push(f(col, row));
            }
        }
        Self::new(width, height, samples)
    }

    /// Decode an image file and keep its luminance channel
    pub fn from_image(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let luma = image::open(path)?.to_luma8();
        let (width, height) = luma.dimensions();
        log::info!("Loaded heightmap {} ({}x{})", path.display(), width, height);
        Self::new(width, height, luma.into_raw())
    }

    /// Grid width in samples
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in samples
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at `(row, col)`; out-of-range indices clamp to the edge
    pub fn sample(&self, row: i64, col: i64) -> u8 {
        let row = row.clamp(0, i64::from(self.height) - 1) as usize;
        let col = col.clamp(0, i64::from(self.width) - 1) as usize;
        self.samples[row * self.width as usize + col]
    }
}

/// Height field placed in the world
#[derive(Debug, Clone)]
pub struct Terrain {
    map: HeightMap,
    origin: Vec3,
    width: f32,
    length: f32,
    max_height: f32,
}

impl Terrain {
    /// Place `map` over a `width` (x) by `length` (z) footprint centred on `origin`
    pub fn new(map: HeightMap, origin: Vec3, width: f32, length: f32, max_height: f32) -> Self {
        Self {
            map,
            origin,
            width,
            length,
            max_height,
        }
    }

    /// Absolute world Y of the ground at `(x, z)`.
    ///
    /// Points outside the footprint read the nearest edge cell.
    pub fn ground_y(&self, x: f32, z: f32) -> f32 {
        let u = (x - self.origin.x + self.width / 2.0) / self.width;
        let v = (z - self.origin.z + self.length / 2.0) / self.length;
        let col = (u * self.map.width() as f32).floor() as i64;
        let row = (v * self.map.height() as f32).floor() as i64;
        let sample = self.map.sample(row, col);
        self.origin.y + f32::from(sample) / 255.0 * self.max_height
    }

    /// Unsigned vertical distance between `position` and the ground below or above it.
    ///
    /// Cannot tell whether the point is above or below the surface.
    pub fn distance_to_ground(&self, position: Vec3) -> f32 {
        (self.ground_y(position.x, position.z) - position.y).abs()
    }

    /// Signed height of `position` above the ground; negative when below
    pub fn height_above_ground(&self, position: Vec3) -> f32 {
        position.y - self.ground_y(position.x, position.z)
    }

    /// Move `node` to `(x, ground_y(x, z) + y_offset, z)`
    pub fn place_on_surface(&self, node: &mut Node, x: f32, y_offset: f32, z: f32) {
        node.set_position(Vec3::new(x, self.ground_y(x, z) + y_offset, z));
    }

    /// Position of the terrain node
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Footprint extent along X
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Footprint extent along Z
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Height of a 255 sample above the origin
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Underlying grid
    pub fn height_map(&self) -> &HeightMap {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Terrain {
        // Column index as height: 0, 85, 170, 255
        let map = HeightMap::from_fn(4, 4, |col, _| (col * 85) as u8).unwrap();
        Terrain::new(map, Vec3::zeros(), 4.0, 4.0, 255.0)
    }

    #[test]
    fn test_flat_grid_center() {
        let map = HeightMap::flat(64, 64, 128).unwrap();
        let terrain = Terrain::new(map, Vec3::zeros(), 100.0, 100.0, 100.0);
        assert_relative_eq!(terrain.ground_y(0.0, 0.0), 128.0 / 255.0 * 100.0, epsilon = 1e-4);
        assert_relative_eq!(terrain.ground_y(0.0, 0.0), 50.2, epsilon = 0.01);
    }

    #[test]
    fn test_origin_offsets_height() {
        let map = HeightMap::flat(8, 8, 255).unwrap();
        let terrain = Terrain::new(map, Vec3::new(0.0, -30.0, 790.0), 1100.0, 1100.0, 70.0);
        assert_relative_eq!(terrain.ground_y(0.0, 790.0), 40.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sampling_picks_column() {
        let terrain = ramp();
        assert_relative_eq!(terrain.ground_y(-1.5, 0.0), 0.0);
        assert_relative_eq!(terrain.ground_y(-0.5, 0.0), 85.0, epsilon = 1e-4);
        assert_relative_eq!(terrain.ground_y(1.5, 0.0), 255.0, epsilon = 1e-4);
    }

    #[test]
    fn test_outside_footprint_clamps() {
        let terrain = ramp();
        assert_relative_eq!(terrain.ground_y(-1000.0, 0.0), 0.0);
        assert_relative_eq!(terrain.ground_y(1000.0, 1000.0), 255.0, epsilon = 1e-4);
        // Exactly on the far edge maps to index == dim
        assert_relative_eq!(terrain.ground_y(2.0, 2.0), 255.0, epsilon = 1e-4);
    }

    #[test]
    fn test_distance_is_unsigned() {
        let terrain = Terrain::new(HeightMap::flat(2, 2, 0).unwrap(), Vec3::zeros(), 10.0, 10.0, 10.0);
        assert_relative_eq!(terrain.distance_to_ground(Vec3::new(0.0, 3.0, 0.0)), 3.0);
        assert_relative_eq!(terrain.distance_to_ground(Vec3::new(0.0, -3.0, 0.0)), 3.0);
        assert_relative_eq!(terrain.height_above_ground(Vec3::new(0.0, -3.0, 0.0)), -3.0);
    }

    #[test]
    fn test_place_on_surface() {
        let terrain = ramp();
        let mut node = Node::new("orb");
        terrain.place_on_surface(&mut node, 1.5, 2.0, 0.0);
        assert_relative_eq!(node.position(), Vec3::new(1.5, 257.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_grids() {
        assert!(matches!(HeightMap::new(0, 4, vec![]), Err(TerrainError::EmptyGrid { .. })));
        assert!(matches!(
            HeightMap::new(2, 2, vec![0; 3]),
            Err(TerrainError::SizeMismatch { expected: 4, actual: 3 })
        ));
    }
}
