//! Centralized game constants for the dungeon core.
//!
//! Values that several modules share live here. Per-module tables (enemy
//! stats, weapon bases, loot weights) stay next to the code that reads them.

// =====================================================
// Map & generation
// =====================================================

/// Default map width in tiles
pub const DEFAULT_MAP_WIDTH: usize = 50;

/// Default map height in tiles
pub const DEFAULT_MAP_HEIGHT: usize = 35;

/// Smallest room edge the generator accepts (a lone room needs a tile outside the spawn 3x3)
pub const MIN_ROOM_EDGE: usize = 4;

/// Chebyshev distance stairs-down keeps from spawn
pub const STAIRS_MIN_SPAWN_GAP: u32 = 2;

/// Room count accepted on retry exhaustion before a shortfall is reported
pub const ROOM_FALLBACK_FLOOR: usize = 4;

/// Rejection-sampling attempts for one entity position inside a room
pub const ENTITY_PLACEMENT_ATTEMPTS: u32 = 16;

/// Rejection-sampling attempts for the stairs-down tile inside one room
pub const STAIRS_PLACEMENT_ATTEMPTS: u32 = 12;

// =====================================================
// Combat
// =====================================================

/// Base chance to hit before the dexterity/dodge adjustment
pub const BASE_HIT_CHANCE: f32 = 0.70;

/// Hit chance change per point of (attacker dexterity - defender dodge)
pub const HIT_PER_DEX_POINT: f32 = 0.02;

/// Lowest hit chance any exchange can have
pub const HIT_CHANCE_FLOOR: f32 = 0.05;

/// Highest hit chance any exchange can have
pub const HIT_CHANCE_CEILING: f32 = 0.95;

/// Critical chance for unarmed attacks
pub const BASE_CRIT_CHANCE: f32 = 0.05;

/// Critical chance added per point of attacker dexterity
pub const CRIT_PER_DEX_POINT: f32 = 0.005;

/// Upper bound on critical chance
pub const CRIT_CHANCE_CAP: f32 = 0.8;

/// Critical damage multiplier
pub const CRIT_DAMAGE_MULT: f32 = 2.0;

/// Armor value at which half of incoming damage is absorbed
pub const ARMOR_HALF_POINT: f32 = 20.0;

/// Every hit deals at least this much damage
pub const MIN_DAMAGE: u32 = 1;

/// Fraction of the rolled damage added by a non-resisted element
pub const ELEMENTAL_BONUS: f32 = 0.25;

/// Strength points per point of flat bonus damage
pub const STRENGTH_PER_BONUS_DAMAGE: i32 = 5;

// =====================================================
// Enemy abilities
// =====================================================

/// Chance a goblin's hit lands as a sneak attack
pub const SNEAK_ATTACK_CHANCE: f32 = 0.30;

/// Damage multiplier of a sneak attack
pub const SNEAK_ATTACK_MULT: f32 = 1.5;

/// Health fraction below which an orc rages
pub const BERSERK_BELOW: f32 = 0.5;

/// Damage multiplier while raging
pub const BERSERK_MULT: f32 = 1.5;

/// Chance a dragon's hit is fire breath
pub const FIRE_BREATH_CHANCE: f32 = 0.25;

/// Damage multiplier of fire breath against a target without fire resistance
pub const FIRE_BREATH_MULT: f32 = 1.5;

/// Burning turns fire breath leaves behind
pub const FIRE_BREATH_BURN_TURNS: u32 = 3;

/// Chance a skeleton shrugs off a killing blow (once per life)
pub const UNDYING_CHANCE: f32 = 0.20;

// =====================================================
// Progression
// =====================================================

/// Experience needed for level 2
pub const BASE_XP_REQUIREMENT: u32 = 100;

/// Experience requirement growth per level
pub const XP_GROWTH_RATE: f32 = 1.5;

/// Hard level cap
pub const MAX_LEVEL: u32 = 50;

/// Max health gained per level-up
pub const HEALTH_PER_LEVEL: i32 = 10;

// =====================================================
// Player start
// =====================================================

pub const PLAYER_STARTING_HP: i32 = 100;
pub const PLAYER_STARTING_STR: i32 = 10;
pub const PLAYER_STARTING_DEX: i32 = 10;
pub const PLAYER_STARTING_INT: i32 = 10;
pub const PLAYER_STARTING_DEF: i32 = 5;

// =====================================================
// Inventory
// =====================================================

/// General inventory slots (equip slots are separate)
pub const INVENTORY_CAPACITY: usize = 20;

// =====================================================
// AI
// =====================================================

/// Turns out of perception before a fleeing enemy calms down
pub const FLEE_COOLDOWN_TURNS: u32 = 3;

/// Health regenerated per turn while fleeing
pub const FLEE_REGEN_PER_TURN: i32 = 1;

/// Recover threshold = flee threshold * this factor
pub const FLEE_RECOVER_FACTOR: f32 = 1.5;
