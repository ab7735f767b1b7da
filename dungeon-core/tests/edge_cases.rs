//! Edge case tests
//!
//! Degenerate configurations, exhausted retry budgets and boundary
//! conditions that must fail cleanly or degrade gracefully.

use delver_core::engine::config::{CountRange, MapBounds};
use delver_core::entity::Position;
use delver_core::generation::floor_manager::StairDirection;
use delver_core::generation::layout::{generate_dungeon, TileKind};
use delver_core::generation::placement::{place_entities, DifficultyTable};
use delver_core::monster::ai::AiTuning;
use delver_core::player::inventory::{EquipSlot, Inventory, Item};
use delver_core::{ConfigError, GameConfig, GameEngine, GameRng, Intent, InventoryError, TurnError, TurnEvent};

// ============================================================
// Configuration
// ============================================================

#[test]
fn test_zero_room_range_rejected() {
    let config = GameConfig {
        rooms: CountRange { min: 0, max: 0 },
        ..GameConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidRoomRange { .. })));
    assert!(generate_dungeon(&config, 1, &mut GameRng::seeded(1)).is_err());
}

#[test]
fn test_inverted_room_size_rejected() {
    let config = GameConfig {
        room_size: CountRange { min: 8, max: 5 },
        ..GameConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidRoomSize { .. })));
}

#[test]
fn test_three_tile_rooms_rejected() {
    let config = GameConfig {
        rooms: CountRange { min: 1, max: 1 },
        room_size: CountRange { min: 3, max: 3 },
        spawn_safety_radius: 2,
        ..GameConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRoomSize { min: 3, max: 3, floor: 4 })
    ));
}

#[test]
fn test_map_smaller_than_one_room_rejected() {
    let config = GameConfig {
        map: MapBounds { width: 5, height: 40 },
        ..GameConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::MapTooSmall { .. })));
}

#[test]
fn test_safety_radius_must_fit_inside_a_room() {
    let config = GameConfig {
        spawn_safety_radius: 4,
        room_size: CountRange { min: 4, max: 6 },
        ..GameConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SafetyRadiusTooLarge { radius: 4, room_edge: 4 })
    ));
}

#[test]
fn test_zero_retry_budget_rejected() {
    let config = GameConfig {
        room_attempts: 0,
        ..GameConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroRetryBudget)));
}

#[test]
fn test_empty_difficulty_table_rejected() {
    let config = GameConfig {
        difficulty: DifficultyTable { tiers: Vec::new() },
        ..GameConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::EmptyDifficultyTable)));
    assert!(GameEngine::new(config).is_err());
}

#[test]
fn test_tier_without_enemies_rejected() {
    let mut difficulty = DifficultyTable::default();
    difficulty.tiers[1].enemy_kinds.clear();
    let depth = difficulty.tiers[1].min_depth;
    let config = GameConfig {
        difficulty,
        ..GameConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyEnemyPool { depth: d }) if d == depth
    ));
}

#[test]
fn test_hit_bounds_inverted_rejected() {
    let mut config = GameConfig::default();
    config.combat.hit_floor = 0.9;
    config.combat.hit_ceiling = 0.1;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidHitBounds { .. })));
}

// ============================================================
// Generation Boundaries
// ============================================================

#[test]
fn test_retry_exhaustion_keeps_level_playable() {
    let config = GameConfig {
        map: MapBounds { width: 14, height: 14 },
        rooms: CountRange { min: 8, max: 8 },
        room_size: CountRange { min: 4, max: 5 },
        room_attempts: 25,
        ..GameConfig::default()
    };
    for seed in 0..10 {
        let dungeon = generate_dungeon(&config, 1, &mut GameRng::seeded(seed)).unwrap();
        assert!(!dungeon.rooms.is_empty());
        assert!(dungeon.rooms.len() < 8, "8 rooms cannot fit on 14x14");
        assert!(dungeon.is_connected());
        assert!(dungeon.reachable_from(dungeon.spawn).contains(&dungeon.stairs_down));
    }
}

#[test]
fn test_single_room_spawn_is_not_stairs() {
    let config = GameConfig {
        rooms: CountRange { min: 1, max: 1 },
        room_size: CountRange { min: 4, max: 4 },
        ..GameConfig::default()
    };
    for depth in 1..=4 {
        let dungeon = generate_dungeon(&config, depth, &mut GameRng::seeded(8)).unwrap();
        assert_eq!(dungeon.rooms.len(), 1);
        assert!(!dungeon.kind_at(dungeon.spawn).is_some_and(TileKind::is_stairs));
        assert!(dungeon.spawn.manhattan(dungeon.stairs_down) >= config.spawn_safety_radius);
        if let Some(up) = dungeon.stairs_up {
            assert_ne!(up, dungeon.stairs_down);
        }
    }
}

#[test]
fn test_single_room_gets_no_entities() {
    let config = GameConfig {
        rooms: CountRange { min: 1, max: 1 },
        ..GameConfig::default()
    };
    let dungeon = generate_dungeon(&config, 7, &mut GameRng::seeded(2)).unwrap();
    let tier = config.difficulty.tier_for(7).unwrap();
    let placement = place_entities(&dungeon, tier, &AiTuning::default(), &mut GameRng::seeded(2));
    assert!(placement.enemies.is_empty(), "the spawn room stays empty");
    assert!(placement.items.is_empty());
}

#[test]
fn test_depth_zero_treated_as_first_level() {
    let config = GameConfig::default();
    let zero = generate_dungeon(&config, 0, &mut GameRng::seeded(5)).unwrap();
    assert_eq!(zero.depth, 1);
    assert!(zero.stairs_up.is_none());
}

#[test]
fn test_lookups_outside_map() {
    let dungeon = generate_dungeon(&GameConfig::default(), 1, &mut GameRng::seeded(5)).unwrap();
    let outside = Position::new(-3, 1000);
    assert!(!dungeon.in_bounds(outside));
    assert!(dungeon.tile(outside).is_none());
    assert!(!dungeon.is_walkable(outside));
    assert!(dungeon.room_at(outside).is_none());
}

// ============================================================
// Turn Resolution Boundaries
// ============================================================

#[test]
fn test_stairs_up_on_first_level_rejected() {
    let mut engine = GameEngine::new(GameConfig {
        seed: Some(3),
        ..GameConfig::default()
    })
    .unwrap();
    let before = engine.snapshot();
    let result = engine.resolve_turn(Intent::UseStairs(StairDirection::Up));
    assert!(matches!(result, Err(TurnError::NotOnStairs("up"))));
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_dead_player_rejects_every_intent() {
    let mut engine = GameEngine::new(GameConfig {
        seed: Some(3),
        ..GameConfig::default()
    })
    .unwrap();
    engine.player_mut().health.current = 0;
    assert!(engine.is_over());
    assert!(matches!(engine.resolve_turn(Intent::Wait), Err(TurnError::PlayerDead)));
    assert!(matches!(
        engine.resolve_turn(Intent::OpenInventory),
        Err(TurnError::PlayerDead)
    ));
}

#[test]
fn test_stunned_player_loses_the_turn() {
    use delver_core::combat::status::{StatusEffect, StatusType};

    let mut engine = GameEngine::new(GameConfig {
        seed: Some(3),
        ..GameConfig::default()
    })
    .unwrap();
    engine.enemies_mut().clear();
    engine
        .player_mut()
        .statuses
        .apply(StatusEffect::new(StatusType::Stunned, 2));
    let from = engine.player().position;

    let report = engine.resolve_turn(Intent::Wait).unwrap();
    assert!(report.consumed_turn);
    assert!(report.events.contains(&TurnEvent::PlayerIncapacitated));
    assert_eq!(engine.player().position, from);
}

// ============================================================
// Inventory Boundaries
// ============================================================

#[test]
fn test_full_inventory_rejects_new_stack() {
    let mut inventory = Inventory::with_capacity(3);
    for id in 0..3 {
        inventory.add(Item::key(id)).unwrap();
    }
    assert!(inventory.is_full());
    let before = inventory.clone();
    let err = inventory.add(Item::key(99)).unwrap_err();
    assert_eq!(err, InventoryError::Capacity { capacity: 3 });
    assert_eq!(inventory, before);
}

#[test]
fn test_full_inventory_still_merges_into_stacks() {
    let mut inventory = Inventory::with_capacity(2);
    inventory.add(Item::healing_potion()).unwrap();
    inventory.add(Item::key(1)).unwrap();
    assert!(inventory.is_full());

    inventory.add(Item::healing_potion()).unwrap();
    assert_eq!(inventory.get(0).map(|item| item.quantity), Some(2));
}

#[test]
fn test_overflowing_stack_is_all_or_nothing() {
    let mut inventory = Inventory::with_capacity(1);
    let cap = Item::healing_potion().stack_cap();
    inventory.add(Item::healing_potion().with_quantity(cap - 1)).unwrap();

    let before = inventory.clone();
    let err = inventory.add(Item::healing_potion().with_quantity(2));
    assert!(err.is_err(), "one fits, the second needs a new slot");
    assert_eq!(inventory, before);
}

#[test]
fn test_unequip_into_full_inventory_fails() {
    let mut inventory = Inventory::with_capacity(1);
    inventory.add(Item::key(1)).unwrap();
    inventory
        .equipment
        .replace(EquipSlot::Weapon, Item::weapon(delver_core::combat::weapons::Weapon::starter()));

    let before = inventory.clone();
    assert!(matches!(
        inventory.unequip(EquipSlot::Weapon),
        Err(InventoryError::Capacity { .. })
    ));
    assert_eq!(inventory, before);
}

#[test]
fn test_unequip_empty_slot() {
    let mut inventory = Inventory::default();
    assert_eq!(
        inventory.unequip(EquipSlot::Helmet),
        Err(InventoryError::NothingEquipped {
            slot: EquipSlot::Helmet
        })
    );
}

#[test]
fn test_equip_from_empty_index() {
    let mut inventory = Inventory::default();
    assert_eq!(
        inventory.equip(5, EquipSlot::Weapon),
        Err(InventoryError::EmptySlot { index: 5 })
    );
    assert!(matches!(
        inventory.equip(500, EquipSlot::Weapon),
        Err(InventoryError::EmptySlot { index: 500 })
    ));
}
