use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::CombatTuning;
use crate::constants::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, MIN_ROOM_EDGE, ROOM_FALLBACK_FLOOR,
};
use crate::error::ConfigError;
use crate::generation::placement::DifficultyTable;
use crate::logging::TracingConfig;
use crate::monster::ai::AiTuning;

/// Inclusive `[min, max]` count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub fn contains(&self, value: usize) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: usize,
    pub height: usize,
}

/// Everything the core needs to build and run a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map: MapBounds,
    pub rooms: CountRange,
    /// Room edge length range, walls excluded
    pub room_size: CountRange,
    pub room_attempts: u32,
    pub room_fallback_floor: usize,
    /// Minimum Manhattan distance from spawn to stairs-down
    pub spawn_safety_radius: u32,
    pub difficulty: DifficultyTable,
    pub combat: CombatTuning,
    pub ai: AiTuning,
    /// `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub logging: TracingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map: MapBounds {
                width: DEFAULT_MAP_WIDTH,
                height: DEFAULT_MAP_HEIGHT,
            },
            rooms: CountRange { min: 6, max: 8 },
            room_size: CountRange { min: 4, max: 9 },
            room_attempts: 200,
            room_fallback_floor: ROOM_FALLBACK_FLOOR,
            spawn_safety_radius: 3,
            difficulty: DifficultyTable::default(),
            combat: CombatTuning::default(),
            ai: AiTuning::default(),
            seed: None,
            logging: TracingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Reject configurations the generator cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rooms.min == 0 || self.rooms.max < self.rooms.min {
            return Err(ConfigError::InvalidRoomRange {
                min: self.rooms.min,
                max: self.rooms.max,
            });
        }
        if self.room_size.min < MIN_ROOM_EDGE || self.room_size.max < self.room_size.min {
            return Err(ConfigError::InvalidRoomSize {
                min: self.room_size.min,
                max: self.room_size.max,
                floor: MIN_ROOM_EDGE,
            });
        }
        let needed = self.room_size.min + 2;
        if self.map.width < needed || self.map.height < needed {
            return Err(ConfigError::MapTooSmall {
                width: self.map.width,
                height: self.map.height,
                room_edge: self.room_size.min,
            });
        }
        if self.spawn_safety_radius as usize >= self.room_size.min {
            return Err(ConfigError::SafetyRadiusTooLarge {
                radius: self.spawn_safety_radius,
                room_edge: self.room_size.min,
            });
        }
        if self.room_attempts == 0 {
            return Err(ConfigError::ZeroRetryBudget);
        }
        self.combat.validate()?;
        self.difficulty.validate()?;
        Ok(())
    }

    /// Load from `.ron` or `.json` (by extension), then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };
        let config: GameConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
            _ => ron::from_str(&text).map_err(|e| parse_err(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}
