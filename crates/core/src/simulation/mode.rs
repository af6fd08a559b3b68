//! Simulation mode selected once at startup
//!
//! Debug behaviors that change how fires start are grouped here instead of
//! being checked as loose flags throughout the ignition code.

use crate::core_types::FireType;
use serde::{Deserialize, Serialize};

/// How fires are seeded and which hexes may burn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Normal play
    /// - New fires start at the lowest tier
    /// - Town hexes only burn when ignited explicitly
    #[default]
    Standard,

    /// Tier testing: every new fire picks a tier uniformly at random
    RandomTiers,

    /// Stress testing
    /// - Every hex, town included, is ignited at startup
    /// - Town hexes take part in ambient ignition and spread
    BurnAll,
}

impl SimulationMode {
    /// Whether new fires roll a random tier instead of starting at the lowest one
    pub fn randomizes_tiers(&self) -> bool {
        matches!(self, SimulationMode::RandomTiers)
    }

    /// Whether town hexes can catch fire from ambient ignition or spread
    pub fn town_burnable(&self) -> bool {
        matches!(self, SimulationMode::BurnAll)
    }

    /// Whether every hex is set alight when the simulation starts
    pub fn ignites_everything(&self) -> bool {
        matches!(self, SimulationMode::BurnAll)
    }

    /// Tier for a fresh ignition; `roll` picks an index into [`FireType::ALL`]
    /// and is only consulted when tiers are randomized.
    pub fn ignition_tier(&self, roll: impl FnOnce(usize) -> usize) -> FireType {
        if self.randomizes_tiers() {
            let index = roll(FireType::ALL.len());
            FireType::ALL[index.min(FireType::ALL.len() - 1)]
        } else {
            FireType::LOWEST
        }
    }

    /// Parse from a CLI-style name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(SimulationMode::Standard),
            "random-tiers" | "random_tiers" => Some(SimulationMode::RandomTiers),
            "burn-all" | "burn_all" => Some(SimulationMode::BurnAll),
            _ => None,
        }
    }
}
