//! Greedy headless player used by the `delver` binary and the scenario tests.
//!
//! Priorities: heal when low, swap to a stronger weapon, fight anything
//! adjacent, take the stairs down, otherwise walk the shortest path to them.

use super::{GameEngine, Intent};
use crate::combat::weapons::Weapon;
use crate::entity::{Combatant, Direction};
use crate::generation::floor_manager::StairDirection;
use crate::player::inventory::{Consumable, EquipSlot, ItemKind};

/// Health fraction under which the bot drinks or eats
pub const HEAL_THRESHOLD: f32 = 0.4;

fn weapon_score(weapon: &Weapon) -> f32 {
    if weapon.is_broken() {
        return 0.0;
    }
    let (min, max) = weapon.scaled_range();
    (min + max) / 2.0 * (1.0 + weapon.crit_chance)
}

pub fn choose_intent(engine: &GameEngine) -> Intent {
    let player = engine.player();
    let here = player.position;

    if player.health.fraction() < HEAL_THRESHOLD {
        let healing = player.inventory.find(|item| {
            matches!(
                item.kind,
                ItemKind::Consumable(Consumable::HealingPotion { .. } | Consumable::Food { .. })
            )
        });
        if let Some(index) = healing {
            return Intent::UseItem { index };
        }
    }

    let current = player.weapon().map_or(0.0, weapon_score);
    let upgrade = player.inventory.items().find(|(_, item)| match &item.kind {
        ItemKind::Weapon(w) => weapon_score(w) > current,
        _ => false,
    });
    if let Some((index, _)) = upgrade {
        return Intent::Equip {
            index,
            slot: EquipSlot::Weapon,
        };
    }

    let adjacent = engine
        .enemies()
        .iter()
        .filter(|e| e.is_alive())
        .find_map(|e| Direction::between(here, e.position));
    if let Some(direction) = adjacent {
        return Intent::Move(direction);
    }

    let dungeon = engine.dungeon();
    if here == dungeon.stairs_down {
        return Intent::UseStairs(StairDirection::Down);
    }
    dungeon
        .find_path(here, dungeon.stairs_down)
        .and_then(|path| path.get(1).copied())
        .and_then(|next| Direction::between(here, next))
        .map_or(Intent::Wait, Intent::Move)
}
