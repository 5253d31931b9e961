//! Board engine configuration.
//!
//! # Responsibility
//! - Hold grid bounds, tile default sizes and move semantics.
//! - Load overrides from JSON and reject inconsistent values.
//!
//! # Invariants
//! - `0 < min <= default_slots <= max` and `step > 0`.
//! - Default tile sizes are at least 1x1.

use crate::grid::TileSize;
use crate::model::item::ItemKind;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot-count bounds for every board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLimits {
    /// Slot count for newly created boards.
    pub default_slots: usize,
    /// Granularity of the +/- grid controls.
    pub step: usize,
    /// Smallest allowed slot count.
    pub min: usize,
    /// Largest allowed slot count.
    pub max: usize,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            default_slots: 80,
            step: 20,
            min: 20,
            max: 400,
        }
    }
}

impl GridLimits {
    /// Clamps a requested slot count into `[min, max]`.
    pub fn clamp(&self, requested: usize) -> usize {
        requested.clamp(self.min, self.max)
    }
}

/// Kind-specific default footprints for new items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSizes {
    /// Default note footprint.
    pub note: TileSize,
    /// Default link footprint.
    pub link: TileSize,
}

impl Default for TileSizes {
    fn default() -> Self {
        Self {
            note: TileSize { w: 2, h: 2 },
            link: TileSize { w: 2, h: 1 },
        }
    }
}

impl TileSizes {
    /// Returns the default footprint for one item kind.
    pub fn for_kind(&self, kind: ItemKind) -> TileSize {
        match kind {
            ItemKind::Note => self.note,
            ItemKind::Link => self.link,
        }
    }
}

/// Drop semantics when moving a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePolicy {
    /// Destination footprint must be free (own source cells excepted).
    #[default]
    EmptyOnly,
    /// Like `EmptyOnly`, but a drop onto another 1x1 anchor swaps the two
    /// tiles when the moved tile is 1x1 as well.
    Swap,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardsConfig {
    /// Grid slot-count bounds.
    pub grid: GridLimits,
    /// Default item footprints.
    pub tile_sizes: TileSizes,
    /// Move semantics.
    pub move_policy: MovePolicy,
}

/// Errors from configuration parsing/validation.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON could not be parsed into the config shape.
    Parse(serde_json::Error),
    /// Values parse but violate a config invariant.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl BoardsConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    /// - Returns `Parse` for malformed JSON.
    /// - Returns `Invalid` when bounds or sizes are inconsistent.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks config invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.min == 0 {
            return Err(ConfigError::Invalid("grid.min must be > 0".to_string()));
        }
        if grid.min > grid.max {
            return Err(ConfigError::Invalid(format!(
                "grid.min {} exceeds grid.max {}",
                grid.min, grid.max
            )));
        }
        if grid.step == 0 {
            return Err(ConfigError::Invalid("grid.step must be > 0".to_string()));
        }
        if grid.default_slots < grid.min || grid.default_slots > grid.max {
            return Err(ConfigError::Invalid(format!(
                "grid.default_slots {} is outside [{}, {}]",
                grid.default_slots, grid.min, grid.max
            )));
        }
        for (name, size) in [("note", self.tile_sizes.note), ("link", self.tile_sizes.link)] {
            if size.w == 0 || size.h == 0 {
                return Err(ConfigError::Invalid(format!(
                    "tile_sizes.{name} must be at least 1x1"
                )));
            }
        }
        Ok(())
    }
}
