//! Fire lifecycle events
//!
//! The simulation records what happened to each fire; gameplay systems drain
//! the log to award XP, play effects, or update UI.

use crate::core_types::{FireType, HexCoord};
use serde::{Deserialize, Serialize};

/// What set a hex alight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnitionCause {
    /// Ambient per-tick ignition
    Spontaneous,
    /// Spread from a neighboring fire
    Spread { from: HexCoord },
    /// Explicit call from a gameplay system
    External,
}

/// Fire state transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireEvent {
    Ignited {
        hex: HexCoord,
        fire_type: FireType,
        cause: IgnitionCause,
    },
    /// Suppression drove the fire to zero. Carries the XP to award.
    Extinguished {
        hex: HexCoord,
        fire_type: FireType,
        xp_reward: u32,
    },
    /// The fire burned long enough to put itself out. No XP.
    BurnedOut { hex: HexCoord, fire_type: FireType },
}

impl FireEvent {
    pub fn hex(&self) -> HexCoord {
        match self {
            FireEvent::Ignited { hex, .. }
            | FireEvent::Extinguished { hex, .. }
            | FireEvent::BurnedOut { hex, .. } => *hex,
        }
    }

    pub fn fire_type(&self) -> FireType {
        match self {
            FireEvent::Ignited { fire_type, .. }
            | FireEvent::Extinguished { fire_type, .. }
            | FireEvent::BurnedOut { fire_type, .. } => *fire_type,
        }
    }

    /// XP granted by this event
    pub fn xp_reward(&self) -> u32 {
        match self {
            FireEvent::Extinguished { xp_reward, .. } => *xp_reward,
            _ => 0,
        }
    }
}

/// Sum of XP across a batch of events
pub fn total_xp<'a>(events: impl IntoIterator<Item = &'a FireEvent>) -> u32 {
    events.into_iter().map(FireEvent::xp_reward).sum()
}
