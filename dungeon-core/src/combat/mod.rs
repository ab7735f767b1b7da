//! Turn-based combat resolution.
//!
//! One call to [`resolve_exchange`] is one attack: hit roll, crit roll,
//! damage roll, armor mitigation, then side effects (status proc, weapon
//! wear). The attacker is passed as an [`AttackerProfile`] snapshot so the
//! weapon can be borrowed mutably from the same owner.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub mod abilities;
pub mod defense;
pub mod status;
pub mod weapons;

use crate::constants::{
    BASE_HIT_CHANCE, CRIT_CHANCE_CAP, CRIT_DAMAGE_MULT, CRIT_PER_DEX_POINT, ELEMENTAL_BONUS,
    HIT_CHANCE_CEILING, HIT_CHANCE_FLOOR, HIT_PER_DEX_POINT, STRENGTH_PER_BONUS_DAMAGE,
};
use crate::entity::Combatant;
use crate::error::ConfigError;
use crate::rng::GameRng;
use abilities::Ability;
use status::StatusType;
use weapons::{DamageRange, UnarmedProfile, Weapon};

/// Tunable combat constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub base_hit_chance: f32,
    pub hit_per_dex_point: f32,
    pub hit_floor: f32,
    pub hit_ceiling: f32,
    pub crit_multiplier: f32,
    pub crit_cap: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            base_hit_chance: BASE_HIT_CHANCE,
            hit_per_dex_point: HIT_PER_DEX_POINT,
            hit_floor: HIT_CHANCE_FLOOR,
            hit_ceiling: HIT_CHANCE_CEILING,
            crit_multiplier: CRIT_DAMAGE_MULT,
            crit_cap: CRIT_CHANCE_CAP,
        }
    }
}

impl CombatTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit(self.hit_floor) || !in_unit(self.hit_ceiling) || self.hit_floor > self.hit_ceiling
        {
            return Err(ConfigError::InvalidHitBounds {
                floor: self.hit_floor,
                ceiling: self.hit_ceiling,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    Miss,
    Hit,
    Critical,
}

impl HitOutcome {
    pub fn is_hit(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Result of one attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatExchange {
    pub attacker: String,
    pub defender: String,
    pub hit_chance: f32,
    pub outcome: HitOutcome,
    /// Weapon roll after the rarity multiplier, before bonuses and armor
    pub rolled_damage: f32,
    /// Damage after mitigation (before the defender's health clamp)
    pub damage: u32,
    pub status_applied: Option<StatusType>,
    /// Attacker ability that fired, or `Undying` when the defender got back up
    pub ability_used: Option<Ability>,
    pub defender_killed: bool,
    pub weapon_broke: bool,
}

/// The attacker's side of an exchange, captured before the weapon is borrowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerProfile {
    pub name: String,
    pub strength: i32,
    pub dexterity: i32,
    pub unarmed: UnarmedProfile,
    pub ability: Option<Ability>,
    pub health_fraction: f32,
}

impl AttackerProfile {
    pub fn of<C: Combatant + ?Sized>(combatant: &C) -> Self {
        let attrs = combatant.attributes();
        Self {
            name: combatant.name().to_string(),
            strength: attrs.strength,
            dexterity: attrs.dexterity,
            unarmed: combatant.unarmed_profile(),
            ability: combatant.ability(),
            health_fraction: combatant.health().fraction(),
        }
    }
}

/// Clamped chance to hit.
pub fn hit_chance(attacker_dex: i32, defender_dodge: i32, tuning: &CombatTuning) -> f32 {
    let raw = tuning.base_hit_chance + (attacker_dex - defender_dodge) as f32 * tuning.hit_per_dex_point;
    raw.clamp(tuning.hit_floor, tuning.hit_ceiling)
}

pub fn crit_chance(weapon_crit: f32, attacker_dex: i32, tuning: &CombatTuning) -> f32 {
    (weapon_crit + attacker_dex.max(0) as f32 * CRIT_PER_DEX_POINT).clamp(0.0, tuning.crit_cap)
}

/// Uniform integer roll in `range`, scaled by the rarity multiplier.
pub fn roll_base_damage(range: DamageRange, rarity_multiplier: f32, rng: &mut GameRng) -> f32 {
    rng.range_inclusive(range.min, range.max) as f32 * rarity_multiplier
}

/// Everything the damage formula needs once the dice are rolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInputs {
    pub rolled: f32,
    pub strength: i32,
    pub elemental: bool,
    pub critical: bool,
    pub crit_multiplier: f32,
    pub taken_modifier: f32,
    /// Offensive ability multiplier, 1.0 when none fired
    pub ability_multiplier: f32,
    pub armor: i32,
}

impl DamageInputs {
    pub fn pre_mitigation(&self) -> f32 {
        let strength_bonus = (self.strength.max(0) / STRENGTH_PER_BONUS_DAMAGE) as f32;
        let elemental_bonus = if self.elemental {
            self.rolled * ELEMENTAL_BONUS
        } else {
            0.0
        };
        let crit = if self.critical {
            self.crit_multiplier.max(1.0)
        } else {
            1.0
        };
        (self.rolled + strength_bonus + elemental_bonus)
            * crit
            * self.ability_multiplier.max(1.0)
            * self.taken_modifier.max(0.0)
    }
}

/// Final damage after armor; never below the minimum floor.
pub fn compute_damage(inputs: &DamageInputs) -> u32 {
    defense::mitigate(inputs.pre_mitigation(), inputs.armor)
}

/// Resolve one attack against `defender`. A missing or broken weapon falls
/// back to the attacker's unarmed profile.
pub fn resolve_exchange<D: Combatant + ?Sized>(
    attacker: &AttackerProfile,
    weapon: Option<&mut Weapon>,
    defender: &mut D,
    tuning: &CombatTuning,
    rng: &mut GameRng,
) -> CombatExchange {
    let mut weapon = weapon.filter(|w| !w.is_broken());
    let chance = hit_chance(attacker.dexterity, defender.dodge_rating(), tuning);

    let mut exchange = CombatExchange {
        attacker: attacker.name.clone(),
        defender: defender.name().to_string(),
        hit_chance: chance,
        outcome: HitOutcome::Miss,
        rolled_damage: 0.0,
        damage: 0,
        status_applied: None,
        ability_used: None,
        defender_killed: false,
        weapon_broke: false,
    };

    if !rng.chance(chance) {
        trace!(attacker = %attacker.name, defender = %exchange.defender, chance, "miss");
        return exchange;
    }

    let (range, rarity_mult, base_crit, element) = match weapon.as_deref() {
        Some(w) => (w.damage, w.rarity.damage_multiplier(), w.crit_chance, w.element),
        None => (attacker.unarmed.damage, 1.0, attacker.unarmed.crit_chance, None),
    };

    let critical = rng.chance(crit_chance(base_crit, attacker.dexterity, tuning));
    let rolled = roll_base_damage(range, rarity_mult, rng);
    let strike = attacker
        .ability
        .and_then(|a| a.strike(attacker.health_fraction, |e| defender.resists(e), rng));
    let inputs = DamageInputs {
        rolled,
        strength: attacker.strength,
        elemental: element.is_some_and(|e| !defender.resists(e)),
        critical,
        crit_multiplier: tuning.crit_multiplier,
        taken_modifier: defender.statuses().total_damage_taken_modifier(),
        ability_multiplier: strike.as_ref().map_or(1.0, |s| s.damage_multiplier),
        armor: defender.armor_rating(),
    };
    let damage = compute_damage(&inputs);
    defender.health_mut().apply_damage(damage);
    if let Some(strike) = strike {
        exchange.ability_used = Some(strike.ability);
        if let Some(effect) = strike.status {
            exchange.status_applied = Some(effect.effect_type);
            defender.statuses_mut().apply(effect);
        }
    }
    if !defender.is_alive() && defender.try_cheat_death(rng) {
        exchange.ability_used = Some(Ability::Undying);
    }

    exchange.outcome = if critical {
        HitOutcome::Critical
    } else {
        HitOutcome::Hit
    };
    exchange.rolled_damage = rolled;
    exchange.damage = damage;
    exchange.defender_killed = !defender.is_alive();

    if let Some(w) = weapon.as_deref_mut() {
        if !exchange.defender_killed {
            if let Some(effect) = w.proc_effect.and_then(|p| p.roll(rng)) {
                exchange.status_applied = Some(effect.effect_type);
                defender.statuses_mut().apply(effect);
            }
        }
        exchange.weapon_broke = w.wear();
    }

    debug!(
        attacker = %exchange.attacker,
        defender = %exchange.defender,
        outcome = ?exchange.outcome,
        damage,
        killed = exchange.defender_killed,
        "combat exchange"
    );
    exchange
}
