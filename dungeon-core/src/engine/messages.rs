use serde::{Deserialize, Serialize};

use crate::combat::status::StatusType;
use crate::combat::CombatExchange;
use crate::entity::{Direction, Position};
use crate::generation::floor_manager::{LevelProgress, StairDirection};
use crate::generation::layout::Dungeon;
use crate::generation::placement::PlacedItem;
use crate::monster::ai::AiState;
use crate::monster::Enemy;
use crate::player::inventory::EquipSlot;
use crate::player::{ItemEffect, LevelUp, Player};

// =====================================================
// Input
// =====================================================

/// One discrete player decision per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Step, or bump-attack an enemy standing on the target tile
    Move(Direction),
    Wait,
    UseStairs(StairDirection),
    /// Free action; the enemy phase does not run
    OpenInventory,
    Equip { index: usize, slot: EquipSlot },
    Unequip(EquipSlot),
    UseItem { index: usize },
}

impl Intent {
    pub fn consumes_turn(self) -> bool {
        !matches!(self, Self::OpenInventory)
    }
}

// =====================================================
// Output
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    PlayerMoved { from: Position, to: Position },
    /// Stunned or frozen; the intent was skipped
    PlayerIncapacitated,
    PlayerAttacked(CombatExchange),
    EnemyAttacked { enemy_id: u32, exchange: CombatExchange },
    EnemyMoved { enemy_id: u32, from: Position, to: Position },
    EnemyStateChanged { enemy_id: u32, from: AiState, to: AiState },
    EnemyRegenerated { enemy_id: u32, amount: i32 },
    EnemyKilled { enemy_id: u32, name: String, xp: u32, gold: u32 },
    LootDropped { position: Position, item: String },
    ItemPickedUp { item: String, quantity: u32 },
    /// Item left on the floor because the inventory is full
    PickupFailed { item: String },
    TrapTriggered { damage: u32 },
    HazardEntered { effect: StatusType },
    StatusDamage { target: String, effect: StatusType, damage: u32 },
    LevelUp(LevelUp),
    ItemUsed(ItemEffect),
    Equipped { slot: EquipSlot },
    Unequipped { slot: EquipSlot },
    InventoryOpened { used: usize, capacity: usize },
    LevelChanged { depth: u32, direction: StairDirection },
    PlayerDied,
}

/// Everything that happened while resolving one intent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn counter after resolution
    pub turn: u64,
    pub consumed_turn: bool,
    pub events: Vec<TurnEvent>,
}

impl TurnReport {
    pub fn player_died(&self) -> bool {
        self.events.iter().any(|e| matches!(e, TurnEvent::PlayerDied))
    }

    pub fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TurnEvent::EnemyKilled { .. }))
            .count()
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub depth: u32,
    pub turn: u64,
    pub dungeon: Dungeon,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub floor_items: Vec<PlacedItem>,
    pub progress: LevelProgress,
}

impl GameSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}
