//! Status effects applied by weapon procs and hazards.
//!
//! Durations count turns. Damage-over-time effects stack; crowd control
//! effects only refresh.

use serde::{Deserialize, Serialize};

use crate::entity::Health;

/// Status effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Burning,  // damage per turn
    Poisoned, // damage per turn
    Stunned,  // skips turns
    Frozen,   // skips turns, takes extra damage
}

impl StatusType {
    pub fn max_stacks(self) -> u32 {
        match self {
            Self::Burning | Self::Poisoned => 3,
            Self::Stunned | Self::Frozen => 1,
        }
    }

    /// Damage per turn per stack
    pub fn damage_per_turn(self) -> u32 {
        match self {
            Self::Burning => 3,
            Self::Poisoned => 2,
            Self::Stunned | Self::Frozen => 0,
        }
    }

    pub fn prevents_action(self) -> bool {
        matches!(self, Self::Stunned | Self::Frozen)
    }

    /// Multiplier on damage taken while the effect is active
    pub fn damage_taken_modifier(self) -> f32 {
        match self {
            Self::Frozen => 1.2,
            _ => 1.0,
        }
    }
}

/// A single status effect instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub effect_type: StatusType,
    pub remaining_turns: u32,
    pub stacks: u32,
}

impl StatusEffect {
    pub fn new(effect_type: StatusType, turns: u32) -> Self {
        Self {
            effect_type,
            remaining_turns: turns,
            stacks: 1,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_turns == 0
    }

    pub fn damage_this_turn(&self) -> u32 {
        self.effect_type.damage_per_turn() * self.stacks
    }
}

/// Damage dealt by one effect during [`StatusEffects::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTick {
    pub effect_type: StatusType,
    pub damage: u32,
}

/// Active status effects on one entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Apply a new status effect, stacking if applicable
    pub fn apply(&mut self, effect: StatusEffect) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.effect_type == effect.effect_type)
        {
            existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns);
            if existing.stacks < effect.effect_type.max_stacks() {
                existing.stacks += 1;
            }
        } else if effect.remaining_turns > 0 {
            self.effects.push(effect);
        }
    }

    pub fn cleanse(&mut self, effect_type: StatusType) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.effect_type != effect_type);
        before != self.effects.len()
    }

    pub fn has(&self, effect_type: StatusType) -> bool {
        self.effects.iter().any(|e| e.effect_type == effect_type)
    }

    /// Can the entity act this turn? (not stunned/frozen)
    pub fn can_act(&self) -> bool {
        !self.effects.iter().any(|e| e.effect_type.prevents_action())
    }

    pub fn total_damage_taken_modifier(&self) -> f32 {
        self.effects
            .iter()
            .map(|e| e.effect_type.damage_taken_modifier())
            .product()
    }

    /// End-of-turn upkeep: deal DoT to `health`, count durations down and
    /// drop expired effects.
    pub fn tick(&mut self, health: &mut Health) -> Vec<StatusTick> {
        let mut ticks = Vec::new();
        for effect in &mut self.effects {
            let damage = effect.damage_this_turn();
            if damage > 0 {
                let dealt = health.apply_damage(damage);
                ticks.push(StatusTick {
                    effect_type: effect.effect_type,
                    damage: dealt,
                });
            }
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }
        self.effects.retain(|e| !e.is_expired());
        ticks
    }
}
