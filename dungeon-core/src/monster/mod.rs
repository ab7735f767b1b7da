//! Enemy kinds, archetypes and per-level stat scaling.
//!
//! Enemy = Kind x Level. The kind fixes base stats and the behavior
//! archetype; the level (dungeon depth) scales them.

use serde::{Deserialize, Serialize};

use crate::combat::abilities::Ability;
use crate::combat::status::StatusEffects;
use crate::combat::weapons::{DamageRange, Element, UnarmedProfile};
use crate::constants::BASE_CRIT_CHANCE;
use crate::entity::{Attributes, Combatant, Health, Position};
use crate::rng::GameRng;

pub mod ai;

use ai::{AiConfig, AiState, AiTuning};

/// Behavior archetype: a data parameter to the shared AI transition function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Aggressive, // closes in, almost never flees
    Defensive,  // short sight, flees early
    Ranged,     // long sight, keeps its distance when hurt
    Support,    // flees first
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Skeleton,
    SkeletonArcher,
    Shaman,
    Orc,
    Dragon,
}

/// Base stats for one enemy kind at level 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub max_hp: i32,
    pub damage: DamageRange,
    pub defense: i32,
    pub dexterity: i32,
    pub xp_reward: u32,
    pub gold_reward: (u32, u32),
    pub archetype: Archetype,
    pub resists: Option<Element>,
    pub ability: Option<Ability>,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Goblin,
        EnemyKind::Skeleton,
        EnemyKind::SkeletonArcher,
        EnemyKind::Shaman,
        EnemyKind::Orc,
        EnemyKind::Dragon,
    ];

    pub fn template(self) -> EnemyTemplate {
        match self {
            Self::Goblin => EnemyTemplate {
                max_hp: 20,
                damage: DamageRange::new(3, 6),
                defense: 2,
                dexterity: 12,
                xp_reward: 10,
                gold_reward: (1, 5),
                archetype: Archetype::Defensive,
                resists: None,
                ability: Some(Ability::SneakAttack),
            },
            Self::Skeleton => EnemyTemplate {
                max_hp: 25,
                damage: DamageRange::new(4, 8),
                defense: 3,
                dexterity: 8,
                xp_reward: 15,
                gold_reward: (2, 6),
                archetype: Archetype::Aggressive,
                resists: Some(Element::Poison),
                ability: Some(Ability::Undying),
            },
            Self::SkeletonArcher => EnemyTemplate {
                max_hp: 18,
                damage: DamageRange::new(3, 7),
                defense: 2,
                dexterity: 14,
                xp_reward: 15,
                gold_reward: (2, 6),
                archetype: Archetype::Ranged,
                resists: Some(Element::Poison),
                ability: None,
            },
            Self::Shaman => EnemyTemplate {
                max_hp: 22,
                damage: DamageRange::new(2, 5),
                defense: 2,
                dexterity: 10,
                xp_reward: 18,
                gold_reward: (3, 7),
                archetype: Archetype::Support,
                resists: Some(Element::Shock),
                ability: None,
            },
            Self::Orc => EnemyTemplate {
                max_hp: 35,
                damage: DamageRange::new(5, 10),
                defense: 4,
                dexterity: 8,
                xp_reward: 20,
                gold_reward: (3, 8),
                archetype: Archetype::Aggressive,
                resists: None,
                ability: Some(Ability::BerserkerRage),
            },
            Self::Dragon => EnemyTemplate {
                max_hp: 200,
                damage: DamageRange::new(20, 40),
                defense: 15,
                dexterity: 8,
                xp_reward: 500,
                gold_reward: (100, 200),
                archetype: Archetype::Aggressive,
                resists: Some(Element::Fire),
                ability: Some(Ability::FireBreath),
            },
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Goblin => "Goblin",
            Self::Skeleton => "Skeleton",
            Self::SkeletonArcher => "Skeleton Archer",
            Self::Shaman => "Shaman",
            Self::Orc => "Orc",
            Self::Dragon => "Dragon",
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(self, Self::Dragon)
    }
}

/// Multiplicative stat scaling for an enemy of `level`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelScaling {
    pub health: f32,
    pub damage: f32,
    pub defense: f32,
    pub xp: f32,
}

impl LevelScaling {
    pub fn for_level(level: u32) -> Self {
        let steps = level.saturating_sub(1) as f32;
        Self {
            health: 1.0 + 0.2 * steps,
            damage: 1.0 + 0.1 * steps,
            defense: 1.0 + 0.1 * steps,
            xp: 1.0 + 0.15 * steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Creation order within the level; AI results apply in this order
    pub id: u32,
    pub kind: EnemyKind,
    pub name: String,
    pub level: u32,
    pub position: Position,
    pub attributes: Attributes,
    pub health: Health,
    pub statuses: StatusEffects,
    pub damage: DamageRange,
    pub xp_reward: u32,
    pub gold_reward: (u32, u32),
    pub archetype: Archetype,
    pub resists: Option<Element>,
    pub ability: Option<Ability>,
    /// Set once `Undying` has saved this enemy
    #[serde(default)]
    pub undying_spent: bool,
    pub ai_state: AiState,
    pub ai_config: AiConfig,
}

impl Enemy {
    /// Build an enemy of `kind` at `level`. `stat_scale` is the depth tier's
    /// extra multiplier on health and damage.
    pub fn spawn(
        id: u32,
        kind: EnemyKind,
        level: u32,
        stat_scale: f32,
        position: Position,
        tuning: &AiTuning,
    ) -> Self {
        let template = kind.template();
        let level = level.max(1);
        let scaling = LevelScaling::for_level(level);
        let stat_scale = stat_scale.max(0.1);
        let scale = |v: u32, mult: f32| ((v as f32 * mult).round() as u32).max(1);

        let max_hp = scale(template.max_hp as u32, scaling.health * stat_scale) as i32;
        let damage = DamageRange::new(
            scale(template.damage.min, scaling.damage * stat_scale),
            scale(template.damage.max, scaling.damage * stat_scale),
        );
        let defense = (template.defense as f32 * scaling.defense).round() as i32;

        Self {
            id,
            kind,
            name: kind.display_name().to_string(),
            level,
            position,
            attributes: Attributes {
                strength: 0,
                dexterity: template.dexterity,
                intelligence: 0,
                defense,
            },
            health: Health::full(max_hp),
            statuses: StatusEffects::default(),
            damage,
            xp_reward: scale(template.xp_reward, scaling.xp),
            gold_reward: template.gold_reward,
            archetype: template.archetype,
            resists: template.resists,
            ability: template.ability,
            undying_spent: false,
            ai_state: AiState::Idle,
            ai_config: AiConfig::from_archetype(template.archetype, tuning),
        }
    }

    pub fn roll_gold(&self, rng: &mut GameRng) -> u32 {
        rng.range_inclusive(self.gold_reward.0, self.gold_reward.1)
    }
}

impl Combatant for Enemy {
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

    fn resists(&self, element: Element) -> bool {
        self.resists == Some(element)
    }

    fn unarmed_profile(&self) -> UnarmedProfile {
        UnarmedProfile {
            damage: self.damage,
            crit_chance: BASE_CRIT_CHANCE,
        }
    }

    fn ability(&self) -> Option<Ability> {
        self.ability
    }

    fn try_cheat_death(&mut self, rng: &mut GameRng) -> bool {
        if self.undying_spent || !self.ability.is_some_and(|a| a.cheats_death(rng)) {
            return false;
        }
        self.undying_spent = true;
        self.health.current = 1;
        true
    }
}
