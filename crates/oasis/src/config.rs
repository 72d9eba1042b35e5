//! Game configuration
//!
//! Every tunable the setup and simulation read lives here. Missing fields
//! fall back to their defaults, so a config file only needs the values it
//! changes.

use oasis_engine::config::Config;
use oasis_engine::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Initial camera view and projection
    pub camera: CameraConfig,

    /// Scene settings
    pub scene: SceneConfig,

    /// Player movement
    pub player: PlayerConfig,

    /// Tick rate and end-of-game timing
    pub simulation: SimulationConfig,

    /// Terrain placement
    pub terrain: TerrainConfig,

    /// Scene light
    pub light: LightConfig,

    /// Debug free-fly camera
    pub debug_camera: DebugCameraConfig,

    /// Entity counts and placement
    pub world: WorldConfig,
}

impl Config for GameConfig {}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,

    /// Fullscreen mode
    pub full_screen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Oasis".to_string(),
            width: 800,
            height: 600,
            full_screen: false,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position, also the player's start
    pub position: Vec3,

    /// Initial look-at point
    pub look_at: Vec3,

    /// Up vector
    pub up: Vec3,

    /// Field of view (degrees)
    pub fov: f32,

    /// Near clip distance
    pub near: f32,

    /// Far clip distance
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 800.0),
            look_at: Vec3::zeros(),
            up: Vec3::y(),
            fov: 60.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Clear color
    pub background_color: Vec3,
}

/// How player speed carries between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    /// Speed resets to zero after every tick; movement input must repeat
    #[default]
    Impulse,
    /// Speed persists; accelerate and decelerate adjust it
    Momentum,
}

/// Rectangular travel box plus altitude ceiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelBounds {
    /// Lowest X
    pub min_x: f32,
    /// Highest X
    pub max_x: f32,
    /// Lowest Z
    pub min_z: f32,
    /// Highest Z
    pub max_z: f32,
    /// Altitude ceiling
    pub max_y: f32,
}

impl Default for TravelBounds {
    fn default() -> Self {
        Self {
            min_x: -530.0,
            max_x: 530.0,
            min_z: -250.0,
            max_z: 1330.0,
            max_y: 60.0,
        }
    }
}

impl TravelBounds {
    /// Clamp a position into the box
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y.min(self.max_y),
            position.z.clamp(self.min_z, self.max_z),
        )
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Speed model
    pub movement_mode: MovementMode,

    /// Bounding sphere radius
    pub radius: f32,

    /// Acceleration magnitude
    pub acceleration: f32,

    /// Initial max speed (momentum mode)
    pub max_speed: f32,

    /// Speed set by move forward/backward (impulse mode)
    pub impulse_speed: f32,

    /// Turn per key event (degrees)
    pub rotation_step: f32,

    /// Travel limits
    pub bounds: TravelBounds,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            movement_mode: MovementMode::Impulse,
            radius: 1.0,
            acceleration: 4.0,
            max_speed: 10.0,
            impulse_speed: 10.0,
            rotation_step: 3.0,
            bounds: TravelBounds::default(),
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Minimum seconds between logic ticks
    pub tick_threshold: f64,

    /// Show a death effect before the loss screen
    pub death_effect: bool,

    /// Seconds the death effect is shown
    pub death_dwell: f64,

    /// Seconds the loss screen is shown before exiting
    pub lost_dwell: f64,

    /// Headless run length (seconds of simulated time)
    pub headless_duration: f64,

    /// Headless frame interval (seconds)
    pub headless_frame_step: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_threshold: 0.05,
            death_effect: true,
            death_dwell: 5.0,
            lost_dwell: 10.0,
            headless_duration: 20.0,
            headless_frame_step: 1.0 / 60.0,
        }
    }
}

/// Terrain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grayscale heightmap image; a procedural dune field is used when absent
    pub heightmap: Option<String>,

    /// Procedural grid resolution
    pub grid_size: u32,

    /// Terrain node position
    pub origin: Vec3,

    /// Footprint along X
    pub width: f32,

    /// Footprint along Z
    pub length: f32,

    /// Height of a full-intensity sample
    pub max_height: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            heightmap: None,
            grid_size: 128,
            origin: Vec3::new(0.0, -30.0, 790.0),
            width: 1100.0,
            length: 1100.0,
            max_height: 70.0,
        }
    }
}

/// Light configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Light position
    pub position: Vec3,

    /// Orbit joint offset
    pub joint: Vec3,

    /// Orbit axis
    pub axis: Vec3,

    /// Orbit angular speed
    pub orbit_speed: f32,

    /// Fraction of each tick the light orbits for
    pub orbit_rate: f32,

    /// Light color
    pub color: Vec3,

    /// Specular power
    pub spec_power: f32,

    /// Height change per Y/H key event
    pub height_step: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 800.0),
            joint: Vec3::new(0.0, 0.0, 10.0),
            axis: Vec3::y(),
            orbit_speed: 0.5,
            orbit_rate: 0.5,
            color: Vec3::new(1.0, 0.0, 0.0),
            spec_power: 800.0,
            height_step: 2.0,
        }
    }
}

/// Debug camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugCameraConfig {
    /// Translation per tick while a movement key is held
    pub move_speed: f32,

    /// Radians per pixel of mouse travel
    pub mouse_sensitivity: f32,
}

impl Default for DebugCameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            mouse_sensitivity: 1.0 / 1000.0,
        }
    }
}

/// World configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Random seed for procedural placement
    pub seed: u64,

    /// Collectible orbs, placed along the start heading
    pub orb_count: u32,

    /// Distance between consecutive orbs
    pub orb_spacing: f32,

    /// Orb radius
    pub orb_radius: f32,

    /// Powerups
    pub powerup_count: u32,

    /// Powerup radius
    pub powerup_radius: f32,

    /// Max speed added per powerup
    pub powerup_boost: f32,

    /// Hostile chasers
    pub hostile_count: u32,

    /// Hostile radius
    pub hostile_radius: f32,

    /// Hostile speed (units per second)
    pub hostile_speed: f32,

    /// Sideways offset of hostiles from the start heading
    pub hostile_offset: f32,

    /// Tree trunk position
    pub tree_position: Vec3,

    /// First-level tree branches
    pub tree_branches: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            orb_count: 3,
            orb_spacing: 25.0,
            orb_radius: 1.0,
            powerup_count: 4,
            powerup_radius: 0.5,
            powerup_boost: 4.0,
            hostile_count: 4,
            hostile_radius: 0.5,
            hostile_speed: 1.0,
            hostile_offset: 80.0,
            tree_position: Vec3::new(0.0, -5.0, 790.0),
            tree_branches: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_movement_is_impulse() {
        let config = GameConfig::default();
        assert_eq!(config.player.movement_mode, MovementMode::Impulse);
        assert_eq!(config.simulation.tick_threshold, 0.05);
    }

    #[test]
    fn test_default_light_is_red_with_sharp_highlight() {
        let light = LightConfig::default();
        assert_eq!(light.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.spec_power, 800.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oasis.toml");
        std::fs::write(
            &path,
            "[player]\nmovement_mode = \"momentum\"\n\n[world]\norb_count = 5\n",
        )
        .unwrap();

        let config = GameConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.player.movement_mode, MovementMode::Momentum);
        assert_eq!(config.world.orb_count, 5);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.player.radius, 1.0);
    }

    #[test]
    fn test_ron_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oasis.ron");
        let path = path.to_str().unwrap();

        let mut config = GameConfig::default();
        config.simulation.death_effect = false;
        config.save_to_file(path).unwrap();

        let loaded = GameConfig::load_from_file(path).unwrap();
        assert!(!loaded.simulation.death_effect);
        assert_eq!(loaded.camera.position, Vec3::new(0.0, 0.0, 800.0));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(GameConfig::load_from_file("oasis.json").is_err());
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = TravelBounds::default();
        let clamped = bounds.clamp(Vec3::new(-600.0, 100.0, -300.0));
        assert_eq!(clamped, Vec3::new(-530.0, 60.0, -250.0));
        let inside = Vec3::new(10.0, -40.0, 800.0);
        assert_eq!(bounds.clamp(inside), inside);
    }
}
