//! Shared entity data: grid positions, health, attributes.
//!
//! Player and Enemy both implement [`Combatant`], the seam the combat
//! resolver works against.

use serde::{Deserialize, Serialize};

use crate::combat::abilities::Ability;
use crate::combat::defense;
use crate::combat::status::StatusEffects;
use crate::combat::weapons::{Element, UnarmedProfile};
use crate::rng::GameRng;

/// Tile coordinate. Signed so neighbour arithmetic can step off-map and be
/// rejected by bounds checks instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// King-move distance; 1 means adjacent (diagonals included).
    pub fn chebyshev(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn distance_sq(self, other: Position) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Orthogonal neighbours in fixed order: E, W, S, N.
    pub fn cardinal_neighbors(self) -> [Position; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

/// Player movement directions (8-way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// (dx, dy) with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::NorthEast => (1, -1),
            Self::NorthWest => (-1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),
        }
    }

    /// Direction of a single king-move step, if `from` and `to` are adjacent.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let delta = (to.x - from.x, to.y - from.y);
        Self::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

/// Current/max health. `current` is clamped to `[0, max]` by every mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Returns damage actually absorbed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let amount = amount.min(i32::MAX as u32) as i32;
        let taken = amount.min(self.current);
        self.current -= taken;
        taken as u32
    }

    /// Returns health actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let restored = amount.max(0).min(self.max - self.current);
        self.current += restored;
        restored
    }

    /// Raises max; current is only clamped.
    pub fn raise_max(&mut self, amount: i32) {
        self.max += amount.max(0);
        self.current = self.current.min(self.max);
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub defense: i32,
}

/// Anything that can stand on the other side of a combat exchange.
pub trait Combatant {
    fn name(&self) -> &str;
    fn position(&self) -> Position;
    fn attributes(&self) -> &Attributes;
    fn health(&self) -> &Health;
    fn health_mut(&mut self) -> &mut Health;
    fn statuses(&self) -> &StatusEffects;
    fn statuses_mut(&mut self) -> &mut StatusEffects;

    /// Dodge rating subtracted from the attacker's dexterity when rolling to hit.
    fn dodge_rating(&self) -> i32 {
        defense::dodge_rating(self.attributes().dexterity, 0)
    }

    /// Armor fed into damage mitigation.
    fn armor_rating(&self) -> i32 {
        self.attributes().defense
    }

    /// Elements this combatant takes no bonus damage from.
    fn resists(&self, _element: Element) -> bool {
        false
    }

    /// Damage baseline when no usable weapon is wielded.
    fn unarmed_profile(&self) -> UnarmedProfile {
        UnarmedProfile::default()
    }

    fn ability(&self) -> Option<Ability> {
        None
    }

    /// Called on a killing blow. Returns true if the combatant got back up.
    fn try_cheat_death(&mut self, _rng: &mut GameRng) -> bool {
        false
    }

    fn is_alive(&self) -> bool {
        !self.health().is_dead()
    }
}
