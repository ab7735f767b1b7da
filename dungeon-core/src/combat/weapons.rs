//! Weapon definitions and random weapon generation.
//!
//! A weapon stores its *base* damage range; the rarity multiplier is applied
//! when damage is rolled so the scaled range is always derivable from the
//! weapon alone.

use serde::{Deserialize, Serialize};

use super::status::{StatusEffect, StatusType};
use crate::constants::BASE_CRIT_CHANCE;
use crate::rng::GameRng;

/// Weapon types found in the dungeon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    Sword,  // balanced
    Axe,    // heavy hits, low crit
    Bow,    // light, high crit
    Staff,  // weak, reliable
    Dagger, // weakest, highest crit
}

impl WeaponType {
    pub const ALL: [WeaponType; 5] = [
        WeaponType::Sword,
        WeaponType::Axe,
        WeaponType::Bow,
        WeaponType::Staff,
        WeaponType::Dagger,
    ];

    pub fn base_damage(self) -> DamageRange {
        match self {
            Self::Sword => DamageRange::new(8, 15),
            Self::Axe => DamageRange::new(10, 18),
            Self::Bow => DamageRange::new(6, 12),
            Self::Staff => DamageRange::new(4, 8),
            Self::Dagger => DamageRange::new(4, 10),
        }
    }

    pub fn base_crit_chance(self) -> f32 {
        match self {
            Self::Sword => 0.15,
            Self::Axe => 0.10,
            Self::Bow => 0.20,
            Self::Staff => 0.05,
            Self::Dagger => 0.25,
        }
    }

    fn names(self) -> &'static [&'static str] {
        match self {
            Self::Sword => &["Sword", "Blade", "Longsword", "Broadsword"],
            Self::Axe => &["Axe", "Battle Axe", "War Axe", "Cleaver"],
            Self::Bow => &["Bow", "Longbow", "Shortbow", "Recurve Bow"],
            Self::Staff => &["Staff", "Magic Staff", "Arcane Staff", "Wizard Staff"],
            Self::Dagger => &["Dagger", "Knife", "Stiletto", "Dirk"],
        }
    }
}

/// Rarity tier, scaling power multiplicatively
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn damage_multiplier(self) -> f32 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.2,
            Self::Rare => 1.5,
            Self::Epic => 2.0,
            Self::Legendary => 2.5,
        }
    }

    /// Drop weight out of 100
    pub fn drop_weight(self) -> f32 {
        match self {
            Self::Common => 60.0,
            Self::Uncommon => 25.0,
            Self::Rare => 10.0,
            Self::Epic => 4.0,
            Self::Legendary => 1.0,
        }
    }

    /// Gold value multiplier
    pub fn value_multiplier(self) -> u32 {
        match self {
            Self::Common => 1,
            Self::Uncommon => 2,
            Self::Rare => 5,
            Self::Epic => 15,
            Self::Legendary => 50,
        }
    }

    /// Weighted rarity roll. `bias` shifts weight toward higher tiers
    /// (0.0 = default table).
    pub fn roll(rng: &mut GameRng, bias: f32) -> Rarity {
        let bias = bias.max(0.0);
        let table: Vec<(Rarity, f32)> = Self::ALL
            .iter()
            .enumerate()
            .map(|(tier, r)| (*r, r.drop_weight() * (1.0 + bias * tier as f32)))
            .collect();
        rng.weighted_choice(&table).unwrap_or(Rarity::Common)
    }

    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Common => &["Rusty", "Crude", "Simple", "Basic"],
            Self::Uncommon => &["Fine", "Sharp", "Balanced", "Quality"],
            Self::Rare => &["Superior", "Exceptional", "Masterwork", "Gleaming"],
            Self::Epic => &["Runed", "Storied", "Dread", "Gilded"],
            Self::Legendary => &["Legendary", "Mythic", "Eternal", "Divine"],
        }
    }
}

/// Elemental damage type carried by some weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Frost,
    Poison,
    Shock,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Frost, Element::Poison, Element::Shock];

    /// Status effect this element can inflict on hit
    pub fn status(self) -> StatusType {
        match self {
            Self::Fire => StatusType::Burning,
            Self::Frost => StatusType::Frozen,
            Self::Poison => StatusType::Poisoned,
            Self::Shock => StatusType::Stunned,
        }
    }

    pub fn status_turns(self) -> u32 {
        match self {
            Self::Fire => 3,
            Self::Poison => 4,
            Self::Frost | Self::Shock => 1,
        }
    }

    fn adjective(self) -> &'static str {
        match self {
            Self::Fire => "Flaming",
            Self::Frost => "Frost",
            Self::Poison => "Venomous",
            Self::Shock => "Shocking",
        }
    }
}

/// Chance-on-hit status effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusProc {
    pub effect: StatusType,
    pub chance: f32,
    pub turns: u32,
}

impl StatusProc {
    pub fn from_element(element: Element, chance: f32) -> Self {
        Self {
            effect: element.status(),
            chance: chance.clamp(0.0, 1.0),
            turns: element.status_turns(),
        }
    }

    /// Roll the proc; `Some` carries the effect to apply.
    pub fn roll(&self, rng: &mut GameRng) -> Option<StatusEffect> {
        rng.chance(self.chance)
            .then(|| StatusEffect::new(self.effect, self.turns))
    }
}

/// Inclusive integer damage range, `min <= max` by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn widen(self, add_min: u32, add_max: u32) -> Self {
        Self::new(self.min + add_min, self.max + add_max)
    }
}

pub const MAX_DURABILITY: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub weapon_type: WeaponType,
    pub rarity: Rarity,
    /// Base range before the rarity multiplier
    pub damage: DamageRange,
    pub crit_chance: f32,
    pub element: Option<Element>,
    pub proc_effect: Option<StatusProc>,
    pub durability: u32,
    pub max_durability: u32,
}

impl Weapon {
    /// Plain weapon of the given type and rarity, no random bonuses.
    pub fn new(weapon_type: WeaponType, rarity: Rarity) -> Self {
        let name = format!("{} {}", rarity.prefixes()[0], weapon_type.names()[0]);
        Self {
            name,
            weapon_type,
            rarity,
            damage: weapon_type.base_damage(),
            crit_chance: weapon_type.base_crit_chance(),
            element: None,
            proc_effect: None,
            durability: MAX_DURABILITY,
            max_durability: MAX_DURABILITY,
        }
    }

    /// Starting weapon for a new character.
    pub fn starter() -> Self {
        let mut weapon = Self::new(WeaponType::Sword, Rarity::Common);
        weapon.name = "Iron Sword".into();
        weapon
    }

    pub fn with_element(mut self, element: Element, proc_chance: f32) -> Self {
        self.element = Some(element);
        self.proc_effect = Some(StatusProc::from_element(element, proc_chance));
        self
    }

    /// Random weapon. `None` arguments are rolled; rarity uses the drop table
    /// shifted by `rarity_bias`.
    pub fn generate(
        rng: &mut GameRng,
        weapon_type: Option<WeaponType>,
        rarity: Option<Rarity>,
        rarity_bias: f32,
    ) -> Self {
        let weapon_type = weapon_type
            .or_else(|| rng.choose(&WeaponType::ALL).copied())
            .unwrap_or(WeaponType::Sword);
        let rarity = rarity.unwrap_or_else(|| Rarity::roll(rng, rarity_bias));

        let mut weapon = Self::new(weapon_type, rarity);
        match rarity {
            Rarity::Common => {}
            Rarity::Uncommon => {
                // keen
                if rng.chance(0.3) {
                    weapon.crit_chance += 0.05;
                }
            }
            Rarity::Rare => {
                weapon.damage = weapon.damage.widen(1, 0);
                if rng.chance(0.4) {
                    if let Some(element) = rng.choose(&Element::ALL).copied() {
                        weapon.element = Some(element);
                    }
                }
            }
            Rarity::Epic => {
                weapon.damage = weapon.damage.widen(2, 2);
                weapon.crit_chance += 0.10;
                if let Some(element) = rng.choose(&Element::ALL).copied() {
                    weapon = weapon.with_element(element, 0.2);
                }
            }
            Rarity::Legendary => {
                weapon.damage = weapon.damage.widen(3, 5);
                weapon.crit_chance += 0.15;
                if let Some(element) = rng.choose(&Element::ALL).copied() {
                    weapon = weapon.with_element(element, 0.3);
                }
            }
        }
        weapon.crit_chance = weapon.crit_chance.clamp(0.0, 1.0);
        weapon.name = Self::roll_name(rng, weapon_type, rarity, weapon.element);
        weapon
    }

    fn roll_name(
        rng: &mut GameRng,
        weapon_type: WeaponType,
        rarity: Rarity,
        element: Option<Element>,
    ) -> String {
        let base = rng.choose(weapon_type.names()).copied().unwrap_or("Weapon");
        let prefix = match (rarity, element) {
            (Rarity::Epic | Rarity::Legendary, Some(element)) if rng.coin_flip() => {
                element.adjective()
            }
            _ => rng.choose(rarity.prefixes()).copied().unwrap_or(""),
        };
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{prefix} {base}")
        }
    }

    /// Damage range after the rarity multiplier, as `(min, max)`
    pub fn scaled_range(&self) -> (f32, f32) {
        let mult = self.rarity.damage_multiplier();
        (self.damage.min as f32 * mult, self.damage.max as f32 * mult)
    }

    pub fn is_broken(&self) -> bool {
        self.durability == 0
    }

    /// Spend one point of durability. Returns true if this hit broke it.
    pub fn wear(&mut self) -> bool {
        if self.durability == 0 {
            return false;
        }
        self.durability -= 1;
        self.durability == 0
    }

    pub fn gold_value(&self) -> u32 {
        let damage_value = (self.damage.min + self.damage.max) * 5;
        let crit_value = (self.crit_chance * 100.0) as u32 * 2;
        let effect_value = if self.element.is_some() { 25 } else { 0 };
        (50 + damage_value + crit_value + effect_value) * self.rarity.value_multiplier()
    }
}

/// Baseline used when no weapon (or a broken one) is wielded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnarmedProfile {
    pub damage: DamageRange,
    pub crit_chance: f32,
}

impl Default for UnarmedProfile {
    fn default() -> Self {
        Self {
            damage: DamageRange::new(1, 4),
            crit_chance: BASE_CRIT_CHANCE,
        }
    }
}
