//! Hex Fire Simulation Core Library
//!
//! World state and fire propagation for a hex-grid base defense game.
//! Wildfires ignite across the map, spread between neighboring hexes, regrow
//! unless suppressed, and eventually burn out. Fires that reach the town drain
//! its shared health pool.
//!
//! ## Layout
//!
//! - `core_types`: axial coordinates, fire tiers, path colors
//! - `config`: one validated [`GameConfig`] passed into every constructor
//! - `grid`: the [`HexGrid`] record store with burning/path/town views kept in
//!   sync by its single write path, [`HexGrid::mutate`]
//! - `simulation`: the per-tick [`FireSimulation`] and the town health pool

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod grid;
pub mod simulation;

// Re-export core types
pub use core_types::{FireType, FireTypeConfig, FireTypeRegistry, HexCoord, HexLayout, PathColor, Vec2};

pub use config::{ConfigError, GameConfig, PathBanding, SpreadRates, TownConfig, WaveBand};

pub use grid::{GridStats, HexField, HexGrid, HexPatch, HexRecord, OccupantKind, PathSpec};
pub use simulation::{
    FireEvent, FireSimulation, IgnitionCause, SimulationMode, SimulationStats, SuppressionOutcome,
    TickSummary, TownUpdate,
};
