//! Enemy special abilities.
//!
//! Offensive abilities scale the damage of the holder's own hits; `Undying`
//! is defensive and is checked when the holder takes a killing blow.

use serde::{Deserialize, Serialize};

use super::status::{StatusEffect, StatusType};
use super::weapons::Element;
use crate::constants::{
    BERSERK_BELOW, BERSERK_MULT, FIRE_BREATH_BURN_TURNS, FIRE_BREATH_CHANCE, FIRE_BREATH_MULT,
    SNEAK_ATTACK_CHANCE, SNEAK_ATTACK_MULT, UNDYING_CHANCE,
};
use crate::rng::GameRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Goblin: some hits land for extra damage
    SneakAttack,
    /// Orc: hits harder once badly wounded
    BerserkerRage,
    /// Skeleton: may survive one killing blow at 1 HP
    Undying,
    /// Dragon: some hits are fire that also sets the target burning
    FireBreath,
}

/// An offensive ability that fired on one hit
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityStrike {
    pub ability: Ability,
    pub damage_multiplier: f32,
    pub status: Option<StatusEffect>,
}

impl Ability {
    pub fn is_offensive(self) -> bool {
        !matches!(self, Self::Undying)
    }

    /// Roll an offensive ability for a landed hit. `health_fraction` is the
    /// holder's, `defender_resists` tells whether the target resists an element.
    pub fn strike(
        self,
        health_fraction: f32,
        defender_resists: impl Fn(Element) -> bool,
        rng: &mut GameRng,
    ) -> Option<AbilityStrike> {
        let (damage_multiplier, status) = match self {
            Self::SneakAttack if rng.chance(SNEAK_ATTACK_CHANCE) => (SNEAK_ATTACK_MULT, None),
            Self::BerserkerRage if health_fraction < BERSERK_BELOW => (BERSERK_MULT, None),
            Self::FireBreath if rng.chance(FIRE_BREATH_CHANCE) => {
                if defender_resists(Element::Fire) {
                    (1.0, None)
                } else {
                    (
                        FIRE_BREATH_MULT,
                        Some(StatusEffect::new(StatusType::Burning, FIRE_BREATH_BURN_TURNS)),
                    )
                }
            }
            _ => return None,
        };
        Some(AbilityStrike {
            ability: self,
            damage_multiplier,
            status,
        })
    }

    pub fn cheats_death(self, rng: &mut GameRng) -> bool {
        self == Self::Undying && rng.chance(UNDYING_CHANCE)
    }
}
