//! Error taxonomy for the dungeon core.
//!
//! - [`ConfigError`] is the only fatal kind; it is raised before generation.
//! - [`PlacementExhausted`] never escapes the generator. It is logged and the
//!   generator falls back to a partial result.
//! - [`InventoryError`] and [`TurnError`] are per-action and leave game state
//!   untouched.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::Position;
use crate::player::inventory::EquipSlot;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid room count range: min {min}, max {max}")]
    InvalidRoomRange { min: usize, max: usize },

    #[error("invalid room size range: min {min}, max {max} (edges must be >= {floor})")]
    InvalidRoomSize { min: usize, max: usize, floor: usize },

    #[error("map {width}x{height} cannot fit a room of edge {room_edge} plus its wall border")]
    MapTooSmall {
        width: usize,
        height: usize,
        room_edge: usize,
    },

    #[error("spawn safety radius {radius} must be smaller than the minimum room edge {room_edge}")]
    SafetyRadiusTooLarge { radius: u32, room_edge: usize },

    #[error("hit chance bounds [{floor}, {ceiling}] must satisfy 0 <= floor <= ceiling <= 1")]
    InvalidHitBounds { floor: f32, ceiling: f32 },

    #[error("difficulty table has no tiers")]
    EmptyDifficultyTable,

    #[error("difficulty tier starting at depth {depth} has no eligible enemy kinds")]
    EmptyEnemyPool { depth: u32 },

    #[error("room placement retry budget must be non-zero")]
    ZeroRetryBudget,

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Rejection sampling ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{what}: placed {placed} of {requested} after {attempts} attempts")]
pub struct PlacementExhausted {
    pub what: &'static str,
    pub requested: usize,
    pub placed: usize,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("inventory is full ({capacity} slots)")]
    Capacity { capacity: usize },

    #[error("cannot equip {item} into the {target:?} slot")]
    SlotMismatch { item: String, target: EquipSlot },

    #[error("{item} cannot be equipped")]
    NotEquippable { item: String },

    #[error("{item} cannot be used")]
    NotUsable { item: String },

    #[error("inventory slot {index} is empty")]
    EmptySlot { index: usize },

    #[error("nothing equipped in the {slot:?} slot")]
    NothingEquipped { slot: EquipSlot },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("no valid target at {0:?}")]
    InvalidTarget(Position),

    #[error("path blocked at {0:?}")]
    Blocked(Position),

    #[error("no {0} stairs under the player")]
    NotOnStairs(&'static str),

    #[error("the player is dead")]
    PlayerDead,

    #[error("could not build the next level: {0}")]
    LevelGeneration(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidRoomRange { min: 8, max: 6 };
        assert_eq!(err.to_string(), "invalid room count range: min 8, max 6");

        let err = InventoryError::Capacity { capacity: 20 };
        assert_eq!(err.to_string(), "inventory is full (20 slots)");

        let err = PlacementExhausted {
            what: "rooms",
            requested: 8,
            placed: 3,
            attempts: 400,
        };
        assert_eq!(err.to_string(), "rooms: placed 3 of 8 after 400 attempts");
    }

    #[test]
    fn test_turn_error_wraps_inventory() {
        let err: TurnError = InventoryError::EmptySlot { index: 4 }.into();
        assert_eq!(err, TurnError::Inventory(InventoryError::EmptySlot { index: 4 }));
        assert_eq!(err.to_string(), "inventory slot 4 is empty");
    }
}
