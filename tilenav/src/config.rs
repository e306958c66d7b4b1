//! Configuration loading.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working setup. Values that make no sense are clamped with a warning
//! rather than rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tilenav_paths::SearchLimits;
use tilenav_regions::RegionSettings;

use crate::error::Result;
use crate::repath::RepathPolicy;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub pathfinding: PathfindingConfig,
    #[serde(default)]
    pub regions: RegionConfig,
    #[serde(default)]
    pub repath: RepathConfig,
}

/// Map dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Tiles per row (default: 64)
    #[serde(default = "default_cols")]
    pub cols: i32,

    /// Tiles per column (default: 64)
    #[serde(default = "default_rows")]
    pub rows: i32,

    /// World units per tile; waypoints are tile centres (default: 1.0)
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
}

/// A* settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathfindingConfig {
    /// Nodes expanded before a search gives up (default: 50000)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Ask the region graph before running A* (default: true)
    #[serde(default = "default_true")]
    pub fast_reject: bool,
}

/// Region graph settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// When off, reachability queries always answer yes (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cap regions to NxN chunks; 0 keeps regions maximal (default: 0)
    #[serde(default)]
    pub chunk_size: u32,
}

/// Caller-side repath cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepathConfig {
    /// Goal displacement in tiles that forces a new path (default: 1.5)
    #[serde(default = "default_goal_threshold")]
    pub goal_threshold: f32,

    /// Seconds between periodic repaths (default: 2.0)
    #[serde(default = "default_interval")]
    pub interval: f32,
}

fn default_cols() -> i32 {
    64
}
fn default_rows() -> i32 {
    64
}
fn default_tile_size() -> f32 {
    1.0
}
fn default_max_iterations() -> usize {
    SearchLimits::DEFAULT_MAX_ITERATIONS
}
fn default_true() -> bool {
    true
}
fn default_goal_threshold() -> f32 {
    1.5
}
fn default_interval() -> f32 {
    2.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            tile_size: default_tile_size(),
        }
    }
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            fast_reject: true,
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chunk_size: 0,
        }
    }
}

impl Default for RepathConfig {
    fn default() -> Self {
        Self {
            goal_threshold: default_goal_threshold(),
            interval: default_interval(),
        }
    }
}

impl NavConfig {
    /// Parse a TOML document and clamp out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: NavConfig = toml::from_str(content)?;
        config.sanitize();
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("loading configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamp values that cannot be used as-is. Grid dimensions are left
    /// alone; building the grid reports them as errors.
    pub fn sanitize(&mut self) {
        if self.pathfinding.max_iterations == 0 {
            log::warn!(
                "pathfinding.max_iterations = 0, using {}",
                SearchLimits::DEFAULT_MAX_ITERATIONS
            );
            self.pathfinding.max_iterations = SearchLimits::DEFAULT_MAX_ITERATIONS;
        }
        if self.repath.goal_threshold.is_nan() || self.repath.goal_threshold < 0.0 {
            log::warn!("repath.goal_threshold = {}, using 0", self.repath.goal_threshold);
            self.repath.goal_threshold = 0.0;
        }
        if self.repath.interval.is_nan() || self.repath.interval < 0.0 {
            log::warn!("repath.interval = {}, using 0", self.repath.interval);
            self.repath.interval = 0.0;
        }
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_iterations: self.pathfinding.max_iterations,
        }
    }

    pub fn region_settings(&self) -> RegionSettings {
        RegionSettings {
            enabled: self.regions.enabled,
            chunk_size: self.regions.chunk_size,
        }
    }

    pub fn repath_policy(&self) -> RepathPolicy {
        RepathPolicy {
            goal_threshold: self.repath.goal_threshold,
            interval: self.repath.interval,
        }
    }
}
