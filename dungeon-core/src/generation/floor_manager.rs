//! Level transitions and run progression.
//!
//! Levels are rebuilt from scratch on every descent or ascent; only the
//! per-depth seed and the progress counters survive a transition.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::DungeonSeed;

/// Direction of a level transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StairDirection {
    Up,
    Down,
}

impl StairDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Run progression tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub seed: DungeonSeed,
    pub current_depth: u32,
    pub deepest: u32,
    pub levels_visited: Vec<u32>,
    pub deaths: u32,
}

impl LevelProgress {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: DungeonSeed { seed },
            current_depth: 1,
            deepest: 1,
            levels_visited: vec![1],
            deaths: 0,
        }
    }

    pub fn is_visited(&self, depth: u32) -> bool {
        self.levels_visited.contains(&depth)
    }

    /// Depth reached by taking stairs in `direction`; `None` above level 1.
    pub fn target_depth(&self, direction: StairDirection) -> Option<u32> {
        match direction {
            StairDirection::Down => self.current_depth.checked_add(1),
            StairDirection::Up if self.current_depth > 1 => Some(self.current_depth - 1),
            StairDirection::Up => None,
        }
    }

    pub fn enter(&mut self, depth: u32) {
        self.current_depth = depth;
        self.deepest = self.deepest.max(depth);
        if !self.is_visited(depth) {
            self.levels_visited.push(depth);
        }
        info!("Level transition: now on depth {}", depth);
    }

    pub fn record_death(&mut self) {
        self.deaths += 1;
    }

    /// Seed for generating `depth`
    pub fn level_seed(&self, depth: u32) -> u64 {
        self.seed.level_seed(depth)
    }
}
