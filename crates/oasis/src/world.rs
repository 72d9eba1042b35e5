//! World setup
//!
//! Builds the level from the configuration and the registered resources:
//! player shape, light, terrain, tree, orbs (with rings and sparkles),
//! powerups and hostiles. Any missing or mistyped resource aborts setup.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use oasis_engine::assets::{ResourceKind, ResourceManager};
use oasis_engine::foundation::math::{constants, utils, Quat, Vec3};
use oasis_engine::scene::{
    entities, DrawBinding, HeightMap, LightParams, Node, NodeKey, NodeKind, SceneGraph, Terrain, TerrainError,
    TreeBuilder,
};

use crate::config::{GameConfig, TerrainConfig};
use crate::error::GameError;

/// Geometry, material and texture names the level uses
pub const MESHES: [&str; 9] = [
    "Orb", "lightMesh", "TerrainMesh", "tree", "branch", "thorn", "Ring", "Powerup", "Enemy",
];
/// Point clouds the level uses
pub const POINT_SETS: [&str; 1] = ["Sparkles"];
/// Shader programs the level uses
pub const MATERIALS: [&str; 4] = ["ObjectMaterial", "RandomTexMaterial", "TerrainMaterial", "ParticleMaterial"];
/// Textures the level uses
pub const TEXTURES: [&str; 3] = ["Texture1", "MoonTex", "SandTexture"];

/// Populated level
#[derive(Debug)]
pub struct World {
    /// Scene graph owning every node
    pub scene: SceneGraph,
    /// Ground height field
    pub terrain: Terrain,
    /// Scene light node
    pub light: NodeKey,
    /// Node drawn at the player's position
    pub player_shape: NodeKey,
    /// Orbs to collect
    pub orb_count: u32,
}

/// Register placeholder handles for every level resource (headless runs)
pub fn register_headless_resources(resources: &mut ResourceManager) {
    for name in MESHES {
        resources.register_placeholder(name, ResourceKind::Mesh);
    }
    for name in POINT_SETS {
        resources.register_placeholder(name, ResourceKind::PointSet);
    }
    for name in MATERIALS {
        resources.register_placeholder(name, ResourceKind::Material);
    }
    for name in TEXTURES {
        resources.register_placeholder(name, ResourceKind::Texture);
    }
}

/// Look up resources by name; empty texture names mean "none"
pub fn instance(
    resources: &ResourceManager,
    geometry: &str,
    material: &str,
    texture: &str,
    normal_map: &str,
) -> Result<DrawBinding, GameError> {
    Ok(DrawBinding::new(
        resources.get(geometry)?,
        resources.get(material)?,
        resources.get_optional(texture)?,
        resources.get_optional(normal_map)?,
    )?)
}

/// Heightmap from the configured image, or a procedural dune field
pub fn height_map(config: &TerrainConfig) -> Result<HeightMap, TerrainError> {
    match &config.heightmap {
        Some(path) => HeightMap::from_image(path),
        None => {
            let grid = config.grid_size.max(1);
            HeightMap::from_fn(grid, grid, |col, row| {
                let x = col as f32 / grid as f32 * constants::TAU * 3.0;
                let z = row as f32 / grid as f32 * constants::TAU * 2.0;
                40.0_f32.mul_add(x.sin() * z.cos(), 40.0).round() as u8
            })
        }
    }
}

fn random_orientation(rng: &mut impl Rng) -> Quat {
    let axis = Vec3::new(rng.gen(), rng.gen(), rng.gen());
    utils::angle_axis(constants::PI * rng.gen::<f32>(), axis)
}

/// Build the level
pub fn build(config: &GameConfig, resources: &ResourceManager) -> Result<World, GameError> {
    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let mut scene = SceneGraph::new(config.scene.background_color);
    let start = config.camera.position;

    let player_shape = scene.add_node(
        Node::new("PlayerShape")
            .with_kind(NodeKind::Player)
            .with_drawable(instance(resources, "Orb", "ObjectMaterial", "", "")?)
            .at(start),
    );

    let light_config = &config.light;
    let light = scene.add_node(
        entities::light(
            "light",
            Some(instance(resources, "lightMesh", "RandomTexMaterial", "Texture1", "")?),
            LightParams {
                color: light_config.color,
                spec_power: light_config.spec_power,
                orbit_rate: light_config.orbit_rate,
            },
            light_config.axis,
            light_config.joint,
            light_config.orbit_speed,
        )
        .at(light_config.position),
    );

    let terrain_config = &config.terrain;
    let terrain = Terrain::new(
        height_map(terrain_config)?,
        terrain_config.origin,
        terrain_config.width,
        terrain_config.length,
        terrain_config.max_height,
    );
    scene.add_node(entities::terrain(
        "terrain",
        instance(resources, "TerrainMesh", "TerrainMaterial", "SandTexture", "")?,
        terrain_config.origin,
    ));

    TreeBuilder::new(
        instance(resources, "tree", "RandomTexMaterial", "MoonTex", "")?,
        instance(resources, "branch", "RandomTexMaterial", "", "")?,
        20.0,
        1.0,
    )
    .branches(config.world.tree_branches)
    .thorns(instance(resources, "thorn", "RandomTexMaterial", "", "")?, 3)
    .build(&mut scene, "tree", config.world.tree_position, &mut rng)?;

    let world = &config.world;
    for i in 0..world.orb_count {
        let position = start - Vec3::z() * world.orb_spacing * (i + 1) as f32;
        let orb = scene.add_node(
            entities::orb(
                format!("Orb{}", i + 1),
                instance(resources, "Orb", "ObjectMaterial", "Texture1", "")?,
                world.orb_radius,
            )
            .at(position),
        );
        let mut ring = entities::decoration(
            format!("Ring{}", i + 1),
            instance(resources, "Ring", "ObjectMaterial", "Texture1", "")?,
        );
        ring.set_orientation(utils::angle_axis(constants::PI / 2.0, Vec3::x()));
        ring.set_scale(Vec3::new(1.5, 1.5, 1.5));
        scene.add_child(orb, ring)?;
        scene.add_child(
            orb,
            entities::sparkle(
                format!("Sparkle{}", i + 1),
                instance(resources, "Sparkles", "ParticleMaterial", "", "")?,
            ),
        )?;
    }

    for i in 0..world.powerup_count {
        let (position, scale) = if i == 0 {
            (start - Vec3::z() * 5.0, 0.5)
        } else {
            (start - Vec3::z() * 40.0 * i as f32 + Vec3::x() * 3.0, 0.75)
        };
        let mut powerup = entities::powerup(
            format!("Powerup{i}"),
            instance(resources, "Powerup", "ObjectMaterial", "", "")?,
            world.powerup_radius,
        )
        .at(position);
        powerup.set_scale(Vec3::new(scale, scale, scale));
        powerup.set_orientation(random_orientation(&mut rng));
        scene.add_node(powerup);
    }

    for i in 0..world.hostile_count {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let position = start + Vec3::new(side * world.hostile_offset, 0.0, -40.0 * (i + 1) as f32);
        let mut hostile = entities::hostile(
            format!("Enemy{i}"),
            instance(resources, "Enemy", "ObjectMaterial", "", "")?,
            world.hostile_radius,
            world.hostile_speed,
        )
        .at(position);
        hostile.set_scale(Vec3::new(0.5, 0.5, 0.5));
        hostile.set_orientation(random_orientation(&mut rng));
        scene.add_node(hostile);
    }

    log::info!(
        "World ready: {} nodes, {} collidables, {} orbs",
        scene.len(),
        scene.collidables().len(),
        world.orb_count
    );

    Ok(World {
        scene,
        terrain,
        light,
        player_shape,
        orb_count: world.orb_count,
    })
}
