//! Fire intensity tiers and their per-tier parameters
//!
//! Six ordered tiers from [`FireType::Flame`] up to [`FireType::Cataclysm`].
//! The registry never substitutes a default tier: an unknown id or a tier
//! missing from a hand-edited table comes back as `None`, and the caller
//! decides what to do about it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fire intensity tier, ordered weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FireType {
    Flame,
    Blaze,
    Firestorm,
    Inferno,
    Hellfire,
    Cataclysm,
}

impl FireType {
    /// Every tier in ascending order
    pub const ALL: [FireType; 6] = [
        FireType::Flame,
        FireType::Blaze,
        FireType::Firestorm,
        FireType::Inferno,
        FireType::Hellfire,
        FireType::Cataclysm,
    ];

    /// Tier assigned to a fresh ignition
    pub const LOWEST: FireType = FireType::Flame;

    /// Tier that never burns out and spreads twice as readily
    pub const HIGHEST: FireType = FireType::Cataclysm;

    /// Convert from u8 for FFI/wire compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI/wire compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a tier from its display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            FireType::Flame => "Flame",
            FireType::Blaze => "Blaze",
            FireType::Firestorm => "Firestorm",
            FireType::Inferno => "Inferno",
            FireType::Hellfire => "Hellfire",
            FireType::Cataclysm => "Cataclysm",
        }
    }

    pub fn is_top_tier(self) -> bool {
        self == Self::HIGHEST
    }
}

impl fmt::Display for FireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing, reward and spread parameters for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireTypeConfig {
    pub fire_type: FireType,
    /// Seconds of sustained suppression to bring a full fire to zero
    pub extinguish_time: f32,
    /// Seconds of unattended burning before the fire burns itself out.
    /// `None` means the fire never burns out.
    pub burnout_time: Option<f32>,
    /// XP granted when suppression extinguishes the fire
    pub xp_reward: u32,
    /// Scales the chance that this fire ignites a burnable neighbor
    pub spread_multiplier: f32,
    /// Health removed per second while this fire burns on a town hex
    pub town_damage_per_second: f32,
}

impl FireTypeConfig {
    /// True once `burn_duration` has reached this tier's burnout time
    pub fn is_burned_out(&self, burn_duration: f32) -> bool {
        self.burnout_time
            .is_some_and(|burnout| burn_duration >= burnout)
    }
}

/// Per-tier parameter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FireTypeRegistry {
    entries: Vec<FireTypeConfig>,
}

impl FireTypeRegistry {
    pub fn new(entries: Vec<FireTypeConfig>) -> Self {
        Self { entries }
    }

    /// Parameters for a tier, or `None` if the table has no entry for it
    pub fn lookup(&self, fire_type: FireType) -> Option<&FireTypeConfig> {
        self.entries.iter().find(|cfg| cfg.fire_type == fire_type)
    }

    /// Parameters for a raw tier id, `None` for ids outside the tier range
    pub fn lookup_id(&self, id: u8) -> Option<&FireTypeConfig> {
        FireType::from_u8(id).and_then(|tier| self.lookup(tier))
    }

    /// Tiers that have no entry in the table
    pub fn missing_tiers(&self) -> Vec<FireType> {
        FireType::ALL
            .into_iter()
            .filter(|tier| self.lookup(*tier).is_none())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FireTypeConfig> {
        self.entries.iter()
    }
}

impl Default for FireTypeRegistry {
    fn default() -> Self {
        let tier = |fire_type, extinguish_time, burnout_time, xp_reward, town_dps| FireTypeConfig {
            fire_type,
            extinguish_time,
            burnout_time,
            xp_reward,
            spread_multiplier: 1.0,
            town_damage_per_second: town_dps,
        };
        Self::new(vec![
            tier(FireType::Flame, 15.0, Some(90.0), 5, 1.0),
            tier(FireType::Blaze, 25.0, Some(120.0), 10, 2.0),
            tier(FireType::Firestorm, 40.0, Some(150.0), 20, 4.0),
            tier(FireType::Inferno, 60.0, Some(180.0), 35, 7.0),
            tier(FireType::Hellfire, 80.0, Some(240.0), 60, 12.0),
            FireTypeConfig {
                spread_multiplier: 2.0,
                ..tier(FireType::Cataclysm, 120.0, None, 100, 20.0)
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_type_conversion() {
        for (i, tier) in FireType::ALL.into_iter().enumerate() {
            assert_eq!(tier.as_u8() as usize, i);
            assert_eq!(FireType::from_u8(i as u8), Some(tier));
        }
        assert_eq!(FireType::from_u8(6), None);
        assert_eq!(FireType::from_name("inferno"), Some(FireType::Inferno));
        assert_eq!(FireType::from_name("Smoulder"), None);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(FireType::Flame < FireType::Blaze);
        assert!(FireType::Hellfire < FireType::Cataclysm);
        assert_eq!(FireType::ALL.iter().max(), Some(&FireType::HIGHEST));
    }

    #[test]
    fn test_default_table_is_complete() {
        let registry = FireTypeRegistry::default();
        assert!(registry.missing_tiers().is_empty());

        let flame = registry.lookup(FireType::Flame).unwrap();
        assert_eq!(flame.extinguish_time, 15.0);
        assert_eq!(flame.burnout_time, Some(90.0));
    }

    #[test]
    fn test_only_top_tier_doubles_spread_and_never_burns_out() {
        let registry = FireTypeRegistry::default();
        for cfg in registry.iter() {
            if cfg.fire_type.is_top_tier() {
                assert_eq!(cfg.spread_multiplier, 2.0);
                assert!(!cfg.is_burned_out(f32::MAX));
            } else {
                assert_eq!(cfg.spread_multiplier, 1.0);
                assert!(cfg.is_burned_out(cfg.burnout_time.unwrap()));
            }
        }
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let registry = FireTypeRegistry::default();
        assert!(registry.lookup_id(42).is_none());

        let partial = FireTypeRegistry::new(vec![*registry.lookup(FireType::Blaze).unwrap()]);
        assert!(partial.lookup(FireType::Flame).is_none());
        assert_eq!(partial.missing_tiers().len(), 5);
    }
}
