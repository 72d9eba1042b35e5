//! Per-tick collision sweep
//!
//! Ground contact is checked first and ends the sweep. Otherwise every
//! collidable is tested against the player's bounding sphere in index order.
//! A removal shifts the next collidable into the current index, so the index
//! only advances when nothing was removed.

use oasis_engine::physics::BoundingSphere;
use oasis_engine::scene::{NodeKind, SceneGraph, Terrain};

use crate::game_state::StateEvent;
use crate::hud::Hud;
use crate::player::Player;

/// What one sweep did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Orbs picked up
    pub orbs_collected: u32,
    /// Powerups picked up
    pub powerups_collected: u32,
    /// State change requested by the sweep
    pub event: Option<StateEvent>,
}

/// Objective counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbProgress {
    remaining: u32,
}

impl OrbProgress {
    /// Start with `total` orbs left
    pub fn new(total: u32) -> Self {
        Self { remaining: total }
    }

    /// Orbs still in the level
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Count one pickup; true when it was the last
    pub fn collect(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// Whether the player's sphere has sunk into the ground
pub fn touches_ground(terrain: &Terrain, player: &Player) -> bool {
    terrain.distance_to_ground(player.position()) - player.radius() < 0.0
}

/// Run one sweep
pub fn resolve(
    scene: &mut SceneGraph,
    terrain: &Terrain,
    player: &mut Player,
    progress: &mut OrbProgress,
    hud: &mut Hud,
    powerup_boost: f32,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    if touches_ground(terrain, player) {
        log::info!("Player hit the ground at {:?}", player.position());
        report.event = Some(StateEvent::TerrainContact);
        return report;
    }

    let mut index = 0;
    while let Some(&key) = scene.collidables().get(index) {
        let (Some(node), Some(center)) = (scene.node(key), scene.world_position(key)) else {
            index += 1;
            continue;
        };
        if !player.bounds().intersects(&BoundingSphere::new(center, node.radius())) {
            index += 1;
            continue;
        }

        match node.kind() {
            NodeKind::Orb => {
                log::info!("Collected orb \"{}\"", node.name());
                scene.remove_collidable_key(key);
                hud.increment_collected();
                report.orbs_collected += 1;
                if progress.collect() {
                    report.event = Some(StateEvent::AllOrbsCollected);
                    break;
                }
            }
            NodeKind::Powerup => {
                log::info!("Collected powerup \"{}\"", node.name());
                scene.remove_collidable_key(key);
                player.add_max_speed(powerup_boost);
                report.powerups_collected += 1;
            }
            NodeKind::Hostile => {
                log::info!("Collided with hostile \"{}\"", node.name());
                report.event = Some(StateEvent::HostileContact);
                break;
            }
            _ => index += 1,
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use approx::assert_relative_eq;
    use oasis_engine::foundation::math::Vec3;
    use oasis_engine::scene::{HeightMap, Node};

    fn low_terrain() -> Terrain {
        Terrain::new(HeightMap::flat(4, 4, 0).unwrap(), Vec3::new(0.0, -50.0, 0.0), 100.0, 100.0, 10.0)
    }

    fn player_at(position: Vec3) -> Player {
        let mut player = Player::new(&PlayerConfig::default());
        player.init(position, position - Vec3::z(), Vec3::y());
        player
    }

    fn collidable(kind: NodeKind, name: &str, position: Vec3) -> Node {
        Node::new(name).with_kind(kind).collidable(1.0).at(position)
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let terrain = low_terrain();
        let mut hud = Hud::new(2);
        let mut progress = OrbProgress::new(2);
        let mut player = player_at(Vec3::zeros());

        let mut scene = SceneGraph::default();
        scene.add_node(collidable(NodeKind::Orb, "far", Vec3::new(2.0, 0.0, 0.0)));
        let report = resolve(&mut scene, &terrain, &mut player, &mut progress, &mut hud, 4.0);
        assert_eq!(report.orbs_collected, 0);

        scene.add_node(collidable(NodeKind::Orb, "near", Vec3::new(0.0, 0.0, 1.999)));
        let report = resolve(&mut scene, &terrain, &mut player, &mut progress, &mut hud, 4.0);
        assert_eq!(report.orbs_collected, 1);
        assert_eq!(scene.get_node("near"), None);
        assert!(scene.get_node("far").is_some());
    }

    #[test]
    fn test_adjacent_removals_are_not_skipped() {
        let terrain = low_terrain();
        let mut hud = Hud::new(5);
        let mut progress = OrbProgress::new(5);
        let mut player = player_at(Vec3::zeros());

        let mut scene = SceneGraph::default();
        scene.add_node(collidable(NodeKind::Orb, "a", Vec3::new(0.5, 0.0, 0.0)));
        scene.add_node(collidable(NodeKind::Orb, "b", Vec3::new(-0.5, 0.0, 0.0)));
        scene.add_node(collidable(NodeKind::Decoration, "rock", Vec3::zeros()));
        scene.add_node(collidable(NodeKind::Orb, "c", Vec3::new(0.0, 0.5, 0.0)));

        let report = resolve(&mut scene, &terrain, &mut player, &mut progress, &mut hud, 4.0);
        assert_eq!(report.orbs_collected, 3);
        assert_eq!(progress.remaining(), 2);
        assert_eq!(scene.collidables().len(), 1);
        assert_eq!(hud.collected(), 3);
    }

    #[test]
    fn test_hostile_stops_the_sweep() {
        let terrain = low_terrain();
        let mut hud = Hud::new(1);
        let mut progress = OrbProgress::new(1);
        let mut player = player_at(Vec3::zeros());

        let mut scene = SceneGraph::default();
        scene.add_node(collidable(NodeKind::Hostile, "enemy", Vec3::x()));
        scene.add_node(collidable(NodeKind::Orb, "orb", Vec3::zeros()));

        let report = resolve(&mut scene, &terrain, &mut player, &mut progress, &mut hud, 4.0);
        assert_eq!(report.event, Some(StateEvent::HostileContact));
        assert_eq!(report.orbs_collected, 0);
        assert!(scene.get_node("orb").is_some());
    }

    #[test]
    fn test_terrain_short_circuits() {
        let terrain = Terrain::new(HeightMap::flat(4, 4, 0).unwrap(), Vec3::zeros(), 100.0, 100.0, 10.0);
        let mut hud = Hud::new(1);
        let mut progress = OrbProgress::new(1);
        let mut player = player_at(Vec3::new(0.0, 0.5, 0.0));

        let mut scene = SceneGraph::default();
        scene.add_node(collidable(NodeKind::Orb, "orb", Vec3::zeros()));

        let report = resolve(&mut scene, &terrain, &mut player, &mut progress, &mut hud, 4.0);
        assert_eq!(report.event, Some(StateEvent::TerrainContact));
        assert_eq!(progress.remaining(), 1);
        assert_eq!(scene.collidables().len(), 1);
    }

    #[test]
    fn test_powerup_raises_max_speed() {
        let terrain = low_terrain();
        let mut hud = Hud::new(1);
        let mut progress = OrbProgress::new(1);
        let mut player = player_at(Vec3::zeros());
        let before = player.max_speed();

        let mut scene = SceneGraph::default();
        scene.add_node(collidable(NodeKind::Powerup, "Powerup0", Vec3::zeros()));

        let report = resolve(&mut scene, &terrain, &mut player, &mut progress, &mut hud, 4.0);
        assert_eq!(report.powerups_collected, 1);
        assert_relative_eq!(player.max_speed(), before + 4.0);
        assert!(scene.collidables().is_empty());
        assert_eq!(report.event, None);
    }
}
