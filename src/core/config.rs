//! Match configuration
//!
//! Setup values only. Combat rules are fixed constants in `units::constants`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::TemplateError;

/// Configuration for a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Field width in cells
    pub field_width: usize,

    /// Field height in cells
    pub field_height: usize,

    /// Seed for the match RNG (resurrection draws)
    ///
    /// Two matches with the same templates and seed play out identically.
    pub seed: u64,

    /// Shard count for area damage when hardware parallelism is unknown
    pub area_damage_fallback_shards: usize,

    /// Ticks after which the runner declares a draw
    pub max_ticks: u64,

    /// Distance of each leader's start column from its own edge
    ///
    /// The player leader starts at x = offset, the enemy leader at
    /// x = width - offset, both on the middle row.
    pub leader_offset: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            field_width: 40,
            field_height: 40,
            seed: 42,
            area_damage_fallback_shards: 12,
            max_ticks: 1000,
            leader_offset: 10,
        }
    }
}

impl SimulationConfig {
    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, TemplateError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
