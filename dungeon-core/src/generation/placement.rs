//! Depth-scaled enemy and item placement.
//!
//! Each non-spawn room gets its share of enemies and items on free floor
//! tiles. Positions are rejection-sampled inside the room, then found by a
//! row-major scan; a room with no free tile is skipped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layout::{Dungeon, Room, RoomType, TileKind};
use crate::constants::ENTITY_PLACEMENT_ATTEMPTS;
use crate::engine::config::CountRange;
use crate::entity::Position;
use crate::error::{ConfigError, PlacementExhausted};
use crate::loot;
use crate::monster::ai::AiTuning;
use crate::monster::{Enemy, EnemyKind};
use crate::player::inventory::Item;
use crate::rng::GameRng;

/// Difficulty parameters for every depth from `min_depth` on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub min_depth: u32,
    pub enemies_per_room: CountRange,
    pub enemy_kinds: Vec<EnemyKind>,
    /// Chance of one floor item in a non-treasure room
    pub item_chance: f32,
    pub trap_chance: f32,
    pub hazard_chance: f32,
    /// Extra multiplier on enemy health and damage
    pub stat_scale: f32,
    pub rarity_bias: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub tiers: Vec<DifficultyTier>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        use EnemyKind::*;
        let tier = |min_depth, per_room: (usize, usize), kinds: &[EnemyKind], chances: (f32, f32, f32), scale, bias| {
            DifficultyTier {
                min_depth,
                enemies_per_room: CountRange {
                    min: per_room.0,
                    max: per_room.1,
                },
                enemy_kinds: kinds.to_vec(),
                item_chance: chances.0,
                trap_chance: chances.1,
                hazard_chance: chances.2,
                stat_scale: scale,
                rarity_bias: bias,
            }
        };
        Self {
            tiers: vec![
                tier(1, (0, 1), &[Goblin], (0.3, 0.10, 0.2), 1.0, 0.0),
                tier(3, (1, 2), &[Goblin, Orc], (0.3, 0.15, 0.3), 1.0, 0.2),
                tier(
                    5,
                    (1, 2),
                    &[Goblin, Orc, Skeleton, SkeletonArcher, Shaman],
                    (0.35, 0.20, 0.4),
                    1.1,
                    0.4,
                ),
                tier(
                    7,
                    (2, 3),
                    &[Orc, Skeleton, SkeletonArcher, Shaman, Dragon],
                    (0.4, 0.25, 0.5),
                    1.2,
                    0.6,
                ),
            ],
        }
    }
}

impl DifficultyTable {
    /// Deepest tier whose `min_depth` is reached; the shallowest otherwise.
    pub fn tier_for(&self, depth: u32) -> Option<&DifficultyTier> {
        self.tiers
            .iter()
            .filter(|t| t.min_depth <= depth)
            .max_by_key(|t| t.min_depth)
            .or_else(|| self.tiers.iter().min_by_key(|t| t.min_depth))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::EmptyDifficultyTable);
        }
        if let Some(tier) = self.tiers.iter().find(|t| t.enemy_kinds.is_empty()) {
            return Err(ConfigError::EmptyEnemyPool {
                depth: tier.min_depth,
            });
        }
        Ok(())
    }
}

/// An item lying on the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub position: Position,
    pub item: Item,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub enemies: Vec<Enemy>,
    pub items: Vec<PlacedItem>,
}

/// Bounded random picks inside `room`, then a row-major scan.
fn pick_free_tile(
    dungeon: &Dungeon,
    room: &Room,
    occupied: &HashSet<Position>,
    rng: &mut GameRng,
) -> Option<Position> {
    let free = |pos: Position| dungeon.kind_at(pos) == Some(TileKind::Floor) && !occupied.contains(&pos);
    for _ in 0..ENTITY_PLACEMENT_ATTEMPTS {
        let pos = room.random_tile(rng);
        if free(pos) {
            return Some(pos);
        }
    }
    room.tiles().find(|&pos| free(pos))
}

fn strongest(kinds: &[EnemyKind]) -> Option<EnemyKind> {
    kinds
        .iter()
        .copied()
        .max_by_key(|k| (k.is_boss(), k.template().max_hp))
}

/// Per-room enemy kinds to spawn
fn roster(room_type: RoomType, tier: &DifficultyTier, rng: &mut GameRng) -> Vec<EnemyKind> {
    let mut count = rng.range_inclusive(tier.enemies_per_room.min, tier.enemies_per_room.max);
    match room_type {
        RoomType::Combat => count += 1,
        RoomType::Treasure => count /= 2,
        _ => {}
    }
    let mut kinds: Vec<EnemyKind> = (0..count)
        .filter_map(|_| rng.choose(&tier.enemy_kinds).copied())
        .collect();
    if room_type == RoomType::Boss {
        kinds.extend(strongest(&tier.enemy_kinds));
    }
    kinds
}

/// Populate every non-spawn room of `dungeon` for `tier`.
pub fn place_entities(
    dungeon: &Dungeon,
    tier: &DifficultyTier,
    ai: &AiTuning,
    rng: &mut GameRng,
) -> Placement {
    let mut placement = Placement::default();
    let mut occupied: HashSet<Position> = HashSet::from([dungeon.spawn]);
    let mut next_id = 0u32;

    for (index, room) in dungeon.rooms.iter().enumerate().skip(1) {
        let kinds = roster(room.room_type, tier, rng);
        let item_count = match room.room_type {
            RoomType::Treasure => rng.range_inclusive(2, 3),
            _ => usize::from(rng.chance(tier.item_chance)),
        };
        let item_bias = match room.room_type {
            RoomType::Treasure => tier.rarity_bias + 1.0,
            _ => tier.rarity_bias,
        };

        let requested = kinds.len() + item_count;
        let mut placed = 0;
        let mut attempts = 0u32;

        for kind in kinds {
            attempts += 1;
            let Some(pos) = pick_free_tile(dungeon, room, &occupied, rng) else {
                break;
            };
            occupied.insert(pos);
            placement.enemies.push(Enemy::spawn(
                next_id,
                kind,
                dungeon.depth,
                tier.stat_scale,
                pos,
                ai,
            ));
            next_id += 1;
            placed += 1;
        }
        for _ in 0..item_count {
            attempts += 1;
            let Some(pos) = pick_free_tile(dungeon, room, &occupied, rng) else {
                break;
            };
            occupied.insert(pos);
            placement.items.push(PlacedItem {
                position: pos,
                item: loot::roll_item(rng, dungeon.depth, item_bias),
            });
            placed += 1;
        }

        if placed < requested {
            let shortfall = PlacementExhausted {
                what: "room entities",
                requested,
                placed,
                attempts,
            };
            debug!(room = index, "{shortfall}; room full, skipped the rest");
        }
    }

    debug!(
        depth = dungeon.depth,
        enemies = placement.enemies.len(),
        items = placement.items.len(),
        "entities placed"
    );
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{GameConfig, MapBounds};
    use crate::generation::layout::generate_dungeon;

    fn config() -> GameConfig {
        GameConfig {
            map: MapBounds { width: 40, height: 30 },
            rooms: CountRange { min: 6, max: 8 },
            room_size: CountRange { min: 4, max: 7 },
            ..GameConfig::default()
        }
    }

    fn populate(seed: u64, depth: u32) -> (Dungeon, Placement) {
        let cfg = config();
        let mut rng = GameRng::seeded(seed);
        let dungeon = generate_dungeon(&cfg, depth, &mut rng).unwrap();
        let tier = cfg.difficulty.tier_for(depth).unwrap();
        let placement = place_entities(&dungeon, tier, &cfg.ai, &mut rng);
        (dungeon, placement)
    }

    #[test]
    fn test_tier_lookup() {
        let table = DifficultyTable::default();
        assert_eq!(table.tier_for(1).map(|t| t.min_depth), Some(1));
        assert_eq!(table.tier_for(4).map(|t| t.min_depth), Some(3));
        assert_eq!(table.tier_for(99).map(|t| t.min_depth), Some(7));
        assert_eq!(table.tier_for(0).map(|t| t.min_depth), Some(1));
    }

    #[test]
    fn test_validate_table() {
        assert!(DifficultyTable::default().validate().is_ok());
        let empty = DifficultyTable { tiers: Vec::new() };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyDifficultyTable)));

        let mut no_kinds = DifficultyTable::default();
        no_kinds.tiers[1].enemy_kinds.clear();
        assert!(matches!(no_kinds.validate(), Err(ConfigError::EmptyEnemyPool { depth: 3 })));
    }

    #[test]
    fn test_entities_on_free_floor_outside_spawn_room() {
        for seed in 0..20 {
            let (dungeon, placement) = populate(seed, 5);
            let mut seen = HashSet::new();
            let positions = placement
                .enemies
                .iter()
                .map(|e| e.position)
                .chain(placement.items.iter().map(|i| i.position));
            for pos in positions {
                assert!(seen.insert(pos), "seed {seed}: {pos:?} used twice");
                assert_eq!(dungeon.kind_at(pos), Some(TileKind::Floor));
                let room = dungeon.room_at(pos).expect("placed inside a room");
                assert_ne!(room, 0, "spawn room stays empty");
            }
        }
    }

    #[test]
    fn test_enemy_ids_follow_creation_order() {
        let (_, placement) = populate(3, 7);
        for (i, enemy) in placement.enemies.iter().enumerate() {
            assert_eq!(enemy.id, i as u32);
            assert_eq!(enemy.level, 7);
        }
    }

    #[test]
    fn test_deeper_levels_hold_more_enemies() {
        let total = |depth| -> usize { (0..30).map(|s| populate(s, depth).1.enemies.len()).sum() };
        assert!(total(8) > total(1), "depth must raise enemy count");
    }

    #[test]
    fn test_eligible_kinds_only() {
        for seed in 0..10 {
            let (_, placement) = populate(seed, 2);
            assert!(placement.enemies.iter().all(|e| e.kind == EnemyKind::Goblin));
        }
    }

    #[test]
    fn test_full_room_is_skipped_without_failing() {
        let cfg = config();
        let mut rng = GameRng::seeded(8);
        let dungeon = generate_dungeon(&cfg, 1, &mut rng).unwrap();
        let crowded = DifficultyTier {
            enemies_per_room: CountRange { min: 200, max: 200 },
            ..cfg.difficulty.tiers[0].clone()
        };
        let placement = place_entities(&dungeon, &crowded, &cfg.ai, &mut rng);
        let room_floor: usize = dungeon
            .rooms
            .iter()
            .skip(1)
            .map(|r| r.tiles().filter(|&p| dungeon.kind_at(p) == Some(TileKind::Floor)).count())
            .sum();
        assert_eq!(placement.enemies.len() + placement.items.len(), room_floor);
    }

    #[test]
    fn test_strongest_prefers_boss() {
        assert_eq!(strongest(&[EnemyKind::Goblin, EnemyKind::Orc]), Some(EnemyKind::Orc));
        assert_eq!(
            strongest(&[EnemyKind::Dragon, EnemyKind::Orc]),
            Some(EnemyKind::Dragon)
        );
        assert_eq!(strongest(&[]), None);
    }
}
