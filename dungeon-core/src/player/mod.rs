//! Player character: stats, progression and inventory.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combat::defense;
use crate::combat::status::{StatusEffects, StatusType};
use crate::combat::weapons::Weapon;
use crate::constants::{
    BASE_XP_REQUIREMENT, HEALTH_PER_LEVEL, MAX_LEVEL, PLAYER_STARTING_DEF, PLAYER_STARTING_DEX,
    PLAYER_STARTING_HP, PLAYER_STARTING_INT, PLAYER_STARTING_STR, XP_GROWTH_RATE,
};
use crate::entity::{Attributes, Combatant, Health, Position};
use crate::error::InventoryError;
use crate::rng::GameRng;

pub mod inventory;

use inventory::{Consumable, EquipSlot, Inventory, Item, ItemKind};

/// Experience needed to go from `level` to `level + 1`
pub fn xp_for_level(level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (BASE_XP_REQUIREMENT as f64 * (XP_GROWTH_RATE as f64).powi(exponent)).min(u32::MAX as f64) as u32
}

/// Stat gains from one level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub level: u32,
    pub max_health: i32,
    pub gains: Attributes,
}

/// What a consumed item did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    Healed(i32),
    Cured,
    Identified(usize),
    /// A valuable traded for this much gold
    CashedIn(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    pub attributes: Attributes,
    pub health: Health,
    pub statuses: StatusEffects,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,
    pub inventory: Inventory,
}

impl Default for Player {
    fn default() -> Self {
        Self::new("Delver", Position::new(0, 0))
    }
}

impl Player {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        let mut inventory = Inventory::default();
        inventory
            .equipment
            .replace(EquipSlot::Weapon, Item::weapon(Weapon::starter()));
        Self {
            name: name.into(),
            position,
            attributes: Attributes {
                strength: PLAYER_STARTING_STR,
                dexterity: PLAYER_STARTING_DEX,
                intelligence: PLAYER_STARTING_INT,
                defense: PLAYER_STARTING_DEF,
            },
            health: Health::full(PLAYER_STARTING_HP),
            statuses: StatusEffects::default(),
            level: 1,
            experience: 0,
            gold: 0,
            inventory,
        }
    }

    pub fn xp_to_next(&self) -> u32 {
        xp_for_level(self.level)
    }

    /// Add experience and apply every level-up it pays for.
    pub fn gain_experience(&mut self, amount: u32, rng: &mut GameRng) -> Vec<LevelUp> {
        let mut level_ups = Vec::new();
        self.experience = self.experience.saturating_add(amount);
        while self.level < MAX_LEVEL && self.experience >= self.xp_to_next() {
            self.experience -= self.xp_to_next();
            level_ups.push(self.level_up(rng));
        }
        level_ups
    }

    fn level_up(&mut self, rng: &mut GameRng) -> LevelUp {
        self.level += 1;
        let gains = Attributes {
            strength: rng.range_inclusive(1, 3),
            dexterity: rng.range_inclusive(1, 3),
            intelligence: rng.range_inclusive(1, 3),
            defense: rng.range_inclusive(1, 2),
        };
        self.attributes.strength += gains.strength;
        self.attributes.dexterity += gains.dexterity;
        self.attributes.intelligence += gains.intelligence;
        self.attributes.defense += gains.defense;
        self.health.raise_max(HEALTH_PER_LEVEL);
        self.health.restore_full();
        info!("Player leveled up to {}", self.level);
        LevelUp {
            level: self.level,
            max_health: self.health.max,
            gains,
        }
    }

    /// Consume one unit of the item at `index`. Items with nothing to do
    /// (potion at full health) are rejected and kept.
    pub fn use_item(&mut self, index: usize) -> Result<ItemEffect, InventoryError> {
        let item = self
            .inventory
            .get(index)
            .ok_or(InventoryError::EmptySlot { index })?;
        let consumable = match &item.kind {
            ItemKind::Consumable(c) => *c,
            ItemKind::Valuable { .. } => {
                let gold = self.inventory.take_one(index)?.gold_value();
                self.gold = self.gold.saturating_add(gold);
                return Ok(ItemEffect::CashedIn(gold));
            }
            _ => {
                return Err(InventoryError::NotUsable {
                    item: item.display_name(),
                })
            }
        };
        let useless = match consumable {
            Consumable::HealingPotion { .. } | Consumable::Food { .. } => {
                self.health.current >= self.health.max
            }
            Consumable::Antidote => {
                !self.statuses.has(StatusType::Poisoned) && !self.statuses.has(StatusType::Burning)
            }
            Consumable::IdentifyScroll => false,
        };
        if useless {
            return Err(InventoryError::NotUsable {
                item: item.display_name(),
            });
        }

        self.inventory.take_one(index)?;
        let effect = match consumable {
            Consumable::HealingPotion { heal } | Consumable::Food { heal } => {
                ItemEffect::Healed(self.health.heal(heal))
            }
            Consumable::Antidote => {
                self.statuses.cleanse(StatusType::Poisoned);
                self.statuses.cleanse(StatusType::Burning);
                ItemEffect::Cured
            }
            Consumable::IdentifyScroll => ItemEffect::Identified(self.inventory.identify_all()),
        };
        Ok(effect)
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.inventory.equipment.weapon()
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Position {
        self.position
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }

    fn dodge_rating(&self) -> i32 {
        defense::dodge_rating(
            self.attributes.dexterity,
            self.inventory.equipment.total_dodge(),
        )
    }

    fn armor_rating(&self) -> i32 {
        self.attributes.defense + self.inventory.equipment.total_defense()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::status::StatusEffect;
    use inventory::Gear;

    #[test]
    fn test_xp_curve() {
        assert_eq!(xp_for_level(1), 100);
        assert_eq!(xp_for_level(2), 150);
        assert_eq!(xp_for_level(3), 225);
        assert!(xp_for_level(10) > xp_for_level(9));
    }

    #[test]
    fn test_player_defaults() {
        let player = Player::default();
        assert_eq!(player.level, 1);
        assert_eq!(player.experience, 0);
        assert_eq!(player.health.max, PLAYER_STARTING_HP);
        assert!(player.weapon().is_some(), "starts with a weapon equipped");
        assert_eq!(player.inventory.used_slots(), 0);
    }

    #[test]
    fn test_level_up_heals_and_raises_stats() {
        let mut rng = GameRng::seeded(8);
        let mut player = Player::default();
        player.health.current = 10;

        let ups = player.gain_experience(100, &mut rng);
        assert_eq!(ups.len(), 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.experience, 0);
        assert_eq!(player.health.max, PLAYER_STARTING_HP + HEALTH_PER_LEVEL);
        assert_eq!(player.health.current, player.health.max);
        assert!(player.attributes.strength > PLAYER_STARTING_STR);
        assert!((1..=2).contains(&ups[0].gains.defense));
    }

    #[test]
    fn test_multiple_level_ups() {
        let mut rng = GameRng::seeded(8);
        let mut player = Player::default();
        let ups = player.gain_experience(100 + 150 + 10, &mut rng);
        assert_eq!(ups.len(), 2);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 10);
    }

    #[test]
    fn test_potion_heals_and_is_consumed() {
        let mut player = Player::default();
        player.inventory.add(Item::healing_potion().with_quantity(2)).unwrap();
        player.health.current = 50;

        assert_eq!(player.use_item(0), Ok(ItemEffect::Healed(25)));
        assert_eq!(player.inventory.get(0).map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_potion_at_full_health_is_kept() {
        let mut player = Player::default();
        player.inventory.add(Item::healing_potion()).unwrap();
        assert!(matches!(player.use_item(0), Err(InventoryError::NotUsable { .. })));
        assert_eq!(player.inventory.used_slots(), 1);
    }

    #[test]
    fn test_antidote_cures() {
        let mut player = Player::default();
        player.inventory.add(Item::antidote()).unwrap();
        player.statuses.apply(StatusEffect::new(StatusType::Poisoned, 5));

        assert_eq!(player.use_item(0), Ok(ItemEffect::Cured));
        assert!(!player.statuses.has(StatusType::Poisoned));
    }

    #[test]
    fn test_gear_feeds_defense_and_dodge() {
        let mut player = Player::default();
        let base_armor = player.armor_rating();
        let base_dodge = player.dodge_rating();
        player
            .inventory
            .add(Item::gear(
                "Buckler",
                Gear {
                    slot: EquipSlot::Shield,
                    defense: 3,
                    dodge: 1,
                },
                crate::combat::weapons::Rarity::Common,
            ))
            .unwrap();
        player.inventory.equip(0, EquipSlot::Shield).unwrap();

        assert_eq!(player.armor_rating(), base_armor + 3);
        assert_eq!(player.dodge_rating(), base_dodge + 1);
    }

    #[test]
    fn test_using_non_consumable_fails() {
        let mut player = Player::default();
        player.inventory.add(Item::key(7)).unwrap();
        assert!(matches!(player.use_item(0), Err(InventoryError::NotUsable { .. })));
        assert!(matches!(player.use_item(5), Err(InventoryError::EmptySlot { index: 5 })));
    }

    #[test]
    fn test_valuable_cashes_in_one_at_a_time() {
        let mut player = Player::default();
        let gold = player.gold;
        player.inventory.add(Item::gem("Ruby", 40, crate::combat::weapons::Rarity::Rare).with_quantity(2)).unwrap();

        assert_eq!(player.use_item(0), Ok(ItemEffect::CashedIn(40)));
        assert_eq!(player.gold, gold + 40);
        assert_eq!(player.inventory.get(0).map(|i| i.quantity), Some(1));

        assert_eq!(player.use_item(0), Ok(ItemEffect::CashedIn(40)));
        assert!(player.inventory.get(0).is_none());
    }
}
