//! Enemy AI state machine.
//!
//! One transition function shared by every archetype; the archetype only
//! supplies thresholds through [`AiConfig`]. Decisions for all enemies are
//! computed from an immutable view of the level, then applied by the engine
//! in enemy creation order.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Archetype, Enemy};
use crate::constants::{FLEE_COOLDOWN_TURNS, FLEE_RECOVER_FACTOR, FLEE_REGEN_PER_TURN};
use crate::entity::{Combatant, Position};
use crate::generation::layout::Dungeon;

/// AI state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Hunting,
    Attacking,
    Fleeing {
        /// Consecutive turns the player has been outside perception
        turns_out_of_range: u32,
    },
}

impl AiState {
    pub fn is_fleeing(self) -> bool {
        matches!(self, Self::Fleeing { .. })
    }
}

/// Global AI knobs, part of the game config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub flee_cooldown_turns: u32,
    pub flee_regen_per_turn: i32,
    /// Added to every archetype's perception radius
    pub perception_bonus: i32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            flee_cooldown_turns: FLEE_COOLDOWN_TURNS,
            flee_regen_per_turn: FLEE_REGEN_PER_TURN,
            perception_bonus: 0,
        }
    }
}

/// AI configuration per enemy (derived from its archetype)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Chebyshev distance at which the player is noticed
    pub perception: u32,
    pub flee_below: f32,
    pub recover_above: f32,
    pub flee_cooldown_turns: u32,
    pub regen_per_turn: i32,
}

impl AiConfig {
    pub fn from_archetype(archetype: Archetype, tuning: &AiTuning) -> Self {
        let (perception, flee_below) = match archetype {
            Archetype::Aggressive => (8, 0.10),
            Archetype::Defensive => (6, 0.20),
            Archetype::Ranged => (10, 0.30),
            Archetype::Support => (7, 0.35),
        };
        Self {
            perception: (perception + tuning.perception_bonus).max(1) as u32,
            flee_below,
            recover_above: flee_below * FLEE_RECOVER_FACTOR,
            flee_cooldown_turns: tuning.flee_cooldown_turns.max(1),
            regen_per_turn: tuning.flee_regen_per_turn.max(0),
        }
    }
}

/// Pure transition. `distance` is the Chebyshev distance to the player.
pub fn next_state(current: AiState, distance: u32, health_fraction: f32, config: &AiConfig) -> AiState {
    let in_range = distance <= config.perception;
    let adjacent = distance <= 1;

    match current {
        AiState::Idle => {
            if in_range {
                AiState::Hunting
            } else {
                AiState::Idle
            }
        }
        AiState::Hunting | AiState::Attacking if health_fraction < config.flee_below => {
            AiState::Fleeing {
                turns_out_of_range: 0,
            }
        }
        AiState::Hunting => {
            if !in_range {
                AiState::Idle
            } else if adjacent {
                AiState::Attacking
            } else {
                AiState::Hunting
            }
        }
        AiState::Attacking => {
            if adjacent {
                AiState::Attacking
            } else {
                AiState::Hunting
            }
        }
        AiState::Fleeing { turns_out_of_range } => {
            if health_fraction > config.recover_above {
                return AiState::Idle;
            }
            if in_range {
                return AiState::Fleeing {
                    turns_out_of_range: 0,
                };
            }
            let turns = turns_out_of_range + 1;
            if turns >= config.flee_cooldown_turns {
                AiState::Idle
            } else {
                AiState::Fleeing {
                    turns_out_of_range: turns,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    Wait,
    MoveTo(Position),
    AttackPlayer,
}

/// What one enemy wants to do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDecision {
    pub enemy_id: u32,
    pub state: AiState,
    pub action: AiAction,
}

/// Read-only view an enemy decides against
pub struct AiContext<'a> {
    pub dungeon: &'a Dungeon,
    pub player: Position,
    /// Tiles held by living enemies at the start of the turn
    pub occupied: &'a HashSet<Position>,
}

impl AiContext<'_> {
    fn open(&self, pos: Position) -> bool {
        pos != self.player && self.dungeon.is_walkable(pos) && !self.occupied.contains(&pos)
    }
}

/// First strictly-better candidate wins, so ties keep the E, W, S, N order.
fn best_step(from: Position, ctx: &AiContext<'_>, better: impl Fn(i64, i64) -> bool) -> Option<Position> {
    let mut best: Option<(Position, i64)> = None;
    let current = from.distance_sq(ctx.player);
    for candidate in from.cardinal_neighbors() {
        if !ctx.open(candidate) {
            continue;
        }
        let score = candidate.distance_sq(ctx.player);
        let reference = best.map_or(current, |(_, s)| s);
        if better(score, reference) {
            best = Some((candidate, score));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Greedy one-tile step that shrinks squared distance to the player.
pub fn step_toward(from: Position, ctx: &AiContext<'_>) -> Option<Position> {
    best_step(from, ctx, |score, reference| score < reference)
}

/// Greedy one-tile step that grows squared distance to the player.
pub fn step_away(from: Position, ctx: &AiContext<'_>) -> Option<Position> {
    best_step(from, ctx, |score, reference| score > reference)
}

/// Evaluate one enemy: transition, then pick an action for the new state.
pub fn decide(enemy: &Enemy, ctx: &AiContext<'_>) -> AiDecision {
    if !enemy.statuses().can_act() {
        return AiDecision {
            enemy_id: enemy.id,
            state: enemy.ai_state,
            action: AiAction::Wait,
        };
    }

    let distance = enemy.position.chebyshev(ctx.player);
    let state = next_state(
        enemy.ai_state,
        distance,
        enemy.health.fraction(),
        &enemy.ai_config,
    );

    let action = match state {
        AiState::Idle => AiAction::Wait,
        AiState::Hunting => step_toward(enemy.position, ctx).map_or(AiAction::Wait, AiAction::MoveTo),
        AiState::Attacking => AiAction::AttackPlayer,
        AiState::Fleeing { .. } => match step_away(enemy.position, ctx) {
            Some(pos) => AiAction::MoveTo(pos),
            // cornered
            None if distance <= 1 => AiAction::AttackPlayer,
            None => AiAction::Wait,
        },
    };

    AiDecision {
        enemy_id: enemy.id,
        state,
        action,
    }
}

/// Decide for every living enemy in parallel. Output keeps input order.
pub fn plan_turn(enemies: &[Enemy], ctx: &AiContext<'_>) -> Vec<AiDecision> {
    enemies
        .par_iter()
        .filter(|e| e.is_alive())
        .map(|e| decide(e, ctx))
        .collect()
}
