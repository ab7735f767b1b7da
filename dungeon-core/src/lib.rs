//! Dungeon Delver - Turn-Based Roguelike Core
//!
//! Deterministic game logic for a 2D dungeon crawler:
//! - Seedable random provider shared by every subsystem
//! - Procedural rooms-and-corridors levels (per-depth seeds)
//! - Depth-scaled enemy and item placement
//! - Turn-based combat (hit, crit, armor, elements, status effects)
//! - Enemy AI state machine driven by archetype profiles
//! - Inventory and equipment with stacking and slot rules
//! - Turn resolution engine consuming player intents

pub mod combat;
pub mod constants;
pub mod engine;
pub mod entity;
pub mod error;
pub mod generation;
pub mod logging;
pub mod loot;
pub mod monster;
pub mod player;
pub mod rng;

pub use engine::{GameConfig, GameEngine, Intent, TurnEvent, TurnReport};
pub use error::{ConfigError, InventoryError, TurnError};
pub use rng::GameRng;
