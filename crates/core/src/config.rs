//! Game configuration
//!
//! A [`GameConfig`] is built once (from [`Default`] or JSON), validated, and
//! then passed by value into [`crate::HexGrid::new`] and
//! [`crate::FireSimulation::new`]. Nothing reads configuration from global
//! state; the helpers here are pure functions of the config they are given.

use crate::core_types::{FireType, FireTypeConfig, FireTypeRegistry, HexCoord, PathColor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base per-tick probabilities that a burning hex ignites a neighbor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadRates {
    /// Normal hex into a normal hex (also used for path into normal)
    pub normal_to_normal: f32,
    /// Normal hex into a path hex
    pub normal_to_path: f32,
    /// Path hex into a path hex
    pub path_to_path: f32,
}

impl SpreadRates {
    /// Base probability for a spread attempt between two hexes
    pub fn base_rate(&self, source_is_path: bool, target_is_path: bool) -> f32 {
        match (source_is_path, target_is_path) {
            (true, true) => self.path_to_path,
            (false, true) => self.normal_to_path,
            (_, false) => self.normal_to_normal,
        }
    }
}

impl Default for SpreadRates {
    fn default() -> Self {
        Self {
            normal_to_normal: 0.02,
            normal_to_path: 0.05,
            path_to_path: 0.10,
        }
    }
}

/// Town health pool settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TownConfig {
    pub max_health: f32,
    /// Health restored per second while no town hex burns
    pub regen_per_second: f32,
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            regen_per_second: 0.5,
        }
    }
}

/// One band of the path-count table: waves up to `max_wave` get `paths` paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveBand {
    pub max_wave: u32,
    pub paths: u32,
}

/// Wave number → number of enemy paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathBanding {
    /// Bands in ascending `max_wave` order
    pub bands: Vec<WaveBand>,
    /// Path count for waves past the last band
    pub beyond: u32,
}

impl PathBanding {
    pub fn path_count_for_wave(&self, wave: u32) -> u32 {
        self.bands
            .iter()
            .find(|band| wave <= band.max_wave)
            .map_or(self.beyond, |band| band.paths)
    }
}

impl Default for PathBanding {
    fn default() -> Self {
        Self {
            bands: vec![
                WaveBand { max_wave: 5, paths: 1 },
                WaveBand { max_wave: 10, paths: 2 },
                WaveBand { max_wave: 14, paths: 3 },
            ],
            beyond: 4,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Radius of the hexagonal map in hexes
    pub map_size: u32,
    /// Center of the seven-hex town cluster
    pub town_center: HexCoord,
    pub fire_types: FireTypeRegistry,
    pub spread: SpreadRates,
    /// Per-tick chance that an unburnt hex catches fire on its own
    pub ignition_probability: f32,
    /// Fraction of `max_extinguish_time` a fire regains per second when not suppressed
    pub regrow_rate: f32,
    /// Fraction of `max_extinguish_time` a fresh ignition starts with
    pub ignition_seed_fraction: f32,
    pub town: TownConfig,
    pub path_banding: PathBanding,
    /// Tint for paths laid without an explicit color
    pub default_path_color: PathColor,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_size: 26,
            town_center: HexCoord::ORIGIN,
            fire_types: FireTypeRegistry::default(),
            spread: SpreadRates::default(),
            ignition_probability: 0.0005,
            regrow_rate: 0.05,
            ignition_seed_fraction: 0.1,
            town: TownConfig::default(),
            path_banding: PathBanding::default(),
            default_path_color: PathColor::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the engine relies on.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(&tier) = self.fire_types.missing_tiers().first() {
            return Err(ConfigError::MissingFireTier(tier));
        }
        for cfg in self.fire_types.iter() {
            check_positive("extinguish_time", cfg.extinguish_time)?;
            if let Some(burnout) = cfg.burnout_time {
                check_positive("burnout_time", burnout)?;
            }
            check_non_negative("spread_multiplier", cfg.spread_multiplier)?;
            check_non_negative("town_damage_per_second", cfg.town_damage_per_second)?;
        }

        check_probability("spread.normal_to_normal", self.spread.normal_to_normal)?;
        check_probability("spread.normal_to_path", self.spread.normal_to_path)?;
        check_probability("spread.path_to_path", self.spread.path_to_path)?;
        check_probability("ignition_probability", self.ignition_probability)?;
        check_probability("ignition_seed_fraction", self.ignition_seed_fraction)?;
        check_positive("ignition_seed_fraction", self.ignition_seed_fraction)?;
        check_non_negative("regrow_rate", self.regrow_rate)?;
        check_positive("town.max_health", self.town.max_health)?;
        check_non_negative("town.regen_per_second", self.town.regen_per_second)?;

        if self
            .path_banding
            .bands
            .windows(2)
            .any(|pair| pair[0].max_wave >= pair[1].max_wave)
        {
            return Err(ConfigError::UnsortedPathBands);
        }

        if let Some(outside) = self
            .town_cluster()
            .into_iter()
            .find(|hex| !hex.in_bounds(self.map_size))
        {
            return Err(ConfigError::TownOutOfBounds(outside));
        }
        Ok(())
    }

    /// Parameters for a tier
    pub fn fire_type(&self, fire_type: FireType) -> Option<&FireTypeConfig> {
        self.fire_types.lookup(fire_type)
    }

    pub fn path_count_for_wave(&self, wave: u32) -> u32 {
        self.path_banding.path_count_for_wave(wave)
    }

    /// Town center followed by its six neighbors
    pub fn town_cluster(&self) -> [HexCoord; 7] {
        let ring = self.town_center.neighbors();
        std::array::from_fn(|i| if i == 0 { self.town_center } else { ring[i - 1] })
    }

    pub fn in_bounds(&self, hex: HexCoord) -> bool {
        hex.in_bounds(self.map_size)
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn check_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse JSON
    Parse(String),
    /// A tier has no entry in the fire type table
    MissingFireTier(FireType),
    /// A value that must be strictly positive was not
    NotPositive { name: &'static str, value: f32 },
    /// A value that must be non-negative was negative
    Negative { name: &'static str, value: f32 },
    /// A probability outside `[0, 1]`
    InvalidProbability { name: &'static str, value: f32 },
    /// Path bands are not in strictly ascending wave order
    UnsortedPathBands,
    /// Part of the town cluster lies outside the map
    TownOutOfBounds(HexCoord),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {msg}"),
            ConfigError::MissingFireTier(tier) => {
                write!(f, "Fire type table has no entry for {tier}")
            }
            ConfigError::NotPositive { name, value } => {
                write!(f, "{name} must be greater than zero, got {value}")
            }
            ConfigError::Negative { name, value } => {
                write!(f, "{name} must not be negative, got {value}")
            }
            ConfigError::InvalidProbability { name, value } => {
                write!(f, "{name} must be within [0, 1], got {value}")
            }
            ConfigError::UnsortedPathBands => {
                write!(f, "Path bands must be in ascending wave order")
            }
            ConfigError::TownOutOfBounds(hex) => {
                write!(f, "Town hex ({hex}) lies outside the map")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
