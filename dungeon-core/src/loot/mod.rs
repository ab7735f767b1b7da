//! Loot generation.
//!
//! Floor items and enemy drops come from one weighted category table.
//! Depth and room type shift rarity through a bias term; bosses always drop.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::weapons::{Rarity, Weapon};
use crate::monster::Enemy;
use crate::player::inventory::{EquipSlot, Gear, Item};
use crate::rng::GameRng;

/// Loot categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootCategory {
    Consumable,
    Valuable,
    Material,
    Weapon,
    Gear,
}

impl LootCategory {
    fn weight(self) -> f32 {
        match self {
            Self::Consumable => 40.0,
            Self::Valuable => 12.0,
            Self::Material => 15.0,
            Self::Weapon => 18.0,
            Self::Gear => 15.0,
        }
    }

    const TABLE: [LootCategory; 5] = [
        Self::Consumable,
        Self::Valuable,
        Self::Material,
        Self::Weapon,
        Self::Gear,
    ];
}

/// Chance that a regular enemy drops an item besides its gold
pub const ENEMY_ITEM_DROP_CHANCE: f32 = 0.3;

/// Rarity bias for a drop at `depth`; grows slowly and caps at 1.0
pub fn depth_bias(depth: u32) -> f32 {
    (depth.saturating_sub(1) as f32 * 0.1).min(1.0)
}

/// What a killed enemy leaves behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDrop {
    pub gold: u32,
    pub items: Vec<Item>,
}

/// One random item of any category.
pub fn roll_item(rng: &mut GameRng, depth: u32, rarity_bias: f32) -> Item {
    let table: Vec<(LootCategory, f32)> = LootCategory::TABLE
        .iter()
        .map(|c| (*c, c.weight()))
        .collect();
    let category = rng
        .weighted_choice(&table)
        .unwrap_or(LootCategory::Consumable);
    roll_in_category(rng, category, depth_bias(depth) + rarity_bias)
}

pub fn roll_in_category(rng: &mut GameRng, category: LootCategory, bias: f32) -> Item {
    match category {
        LootCategory::Consumable => roll_consumable(rng),
        LootCategory::Valuable => roll_gem(rng),
        LootCategory::Material => {
            let name = rng
                .choose(&["Iron Ore", "Leather Scrap", "Bone Shard", "Spider Silk"])
                .copied()
                .unwrap_or("Iron Ore");
            Item::material(name).with_quantity(rng.range_inclusive(1, 3))
        }
        LootCategory::Weapon => Item::weapon(Weapon::generate(rng, None, None, bias)),
        LootCategory::Gear => roll_gear(rng, bias),
    }
}

fn roll_consumable(rng: &mut GameRng) -> Item {
    match rng.range_inclusive(0, 9) {
        0..=3 => Item::healing_potion(),
        4 => Item::major_healing_potion(),
        5..=6 => {
            let (name, heal) = rng
                .choose(&[("Bread", 10), ("Meat", 20), ("Fruit", 8)])
                .copied()
                .unwrap_or(("Bread", 10));
            Item::food(name, heal)
        }
        7 => Item::antidote(),
        _ => Item::identify_scroll().unidentified(),
    }
}

fn roll_gem(rng: &mut GameRng) -> Item {
    let (name, value, rarity) = rng
        .choose(&[
            ("Topaz", 30, Rarity::Common),
            ("Amethyst", 40, Rarity::Uncommon),
            ("Ruby", 50, Rarity::Uncommon),
            ("Sapphire", 50, Rarity::Uncommon),
            ("Emerald", 60, Rarity::Uncommon),
            ("Diamond", 100, Rarity::Rare),
        ])
        .copied()
        .unwrap_or(("Topaz", 30, Rarity::Common));
    Item::gem(name, value, rarity).unidentified()
}

fn roll_gear(rng: &mut GameRng, bias: f32) -> Item {
    let slots = [
        EquipSlot::Armor,
        EquipSlot::Shield,
        EquipSlot::Boots,
        EquipSlot::Gloves,
        EquipSlot::Helmet,
    ];
    let slot = rng.choose(&slots).copied().unwrap_or(EquipSlot::Armor);
    let rarity = Rarity::roll(rng, bias);
    let tier = rarity as i32;

    let (name, defense, dodge) = match slot {
        EquipSlot::Armor => ("Leather Armor", 3, 0),
        EquipSlot::Shield => ("Buckler", 2, 1),
        EquipSlot::Boots => ("Soft Boots", 1, 2),
        EquipSlot::Gloves => ("Grip Gloves", 1, 1),
        _ => ("Iron Cap", 2, 0),
    };
    let gear = Gear {
        slot,
        defense: defense + tier,
        dodge: dodge + tier / 2,
    };
    Item::gear(name, gear, rarity)
}

/// Gold plus items for a killed enemy. Bosses drop two biased items.
pub fn roll_enemy_drop(enemy: &Enemy, rng: &mut GameRng) -> EnemyDrop {
    let gold = enemy.roll_gold(rng);
    let mut items = Vec::new();
    if enemy.kind.is_boss() {
        for _ in 0..2 {
            items.push(roll_item(rng, enemy.level, 1.0));
        }
    } else if rng.chance(ENEMY_ITEM_DROP_CHANCE) {
        items.push(roll_item(rng, enemy.level, 0.0));
    }
    debug!(enemy = %enemy.name, gold, items = items.len(), "enemy drop");
    EnemyDrop { gold, items }
}
