//! Fire lifecycle simulation on the hex grid
//!
//! `FireSimulation` owns the [`HexGrid`] and drives it at a fixed tick rate:
//! - Ambient ignition of unburnt hexes
//! - Spread from burning hexes to their neighbors
//! - Regrowth of unsuppressed fires toward full strength
//! - Burnout after a tier's unattended burn time
//! - Town damage or regeneration
//!
//! Between ticks the render loop reads the grid and applies suppression through
//! [`FireSimulation::suppress`]. A hex suppressed since the previous tick does
//! not regrow on the next one, so suppression always wins the tick it lands in.

pub mod events;
pub mod mode;
pub mod town;

pub use events::{total_xp, FireEvent, IgnitionCause};
pub use mode::SimulationMode;
pub use town::{TownHealth, TownUpdate};

use crate::config::{ConfigError, GameConfig};
use crate::core_types::{FireType, HexCoord};
use crate::grid::{GridStats, HexGrid, HexPatch, HexRecord, PathSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Outcome of a suppression call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuppressionOutcome {
    /// Nothing was burning at the hex
    NotBurning,
    /// The fire survived with this much progress left
    Suppressed { remaining: f32 },
    /// The fire went out; the XP is also logged as a [`FireEvent::Extinguished`]
    Extinguished { fire_type: FireType, xp_reward: u32 },
}

/// Per-tick counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickSummary {
    pub ignited: usize,
    pub extinguished: usize,
    pub burned_out: usize,
    pub burning: usize,
    pub town: TownUpdate,
}

/// Whole-simulation counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    pub grid: GridStats,
    pub simulation_time: f32,
    pub tick_count: u64,
    pub town_health: f32,
    pub town_damage_this_wave: f32,
}

/// Fire propagation engine
pub struct FireSimulation {
    grid: HexGrid,
    config: GameConfig,
    mode: SimulationMode,
    town: TownHealth,
    rng: StdRng,
    /// Hexes that received suppression since the last tick
    suppressed: FxHashSet<HexCoord>,
    events: Vec<FireEvent>,
    simulation_time: f32,
    tick_count: u64,
}

impl FireSimulation {
    /// Build the grid and, in [`SimulationMode::BurnAll`], set every hex alight.
    ///
    /// # Errors
    /// Returns the first configuration error found by [`GameConfig::validate`].
    pub fn new(config: GameConfig, mode: SimulationMode, seed: u64) -> Result<Self, ConfigError> {
        let grid = HexGrid::new(&config)?;
        let town = TownHealth::new(&config.town);

        let mut sim = Self {
            grid,
            config,
            mode,
            town,
            rng: StdRng::seed_from_u64(seed),
            suppressed: FxHashSet::default(),
            events: Vec::new(),
            simulation_time: 0.0,
            tick_count: 0,
        };

        if mode.ignites_everything() {
            let all: Vec<HexCoord> = sim.grid.get_all().iter().map(HexRecord::coord).collect();
            for hex in all {
                let tier = sim.roll_tier();
                sim.ignite_hex(hex, tier, IgnitionCause::External);
            }
        }

        info!(
            "Fire simulation created: mode={:?}, seed={}, hexes={}, burning={}",
            mode,
            seed,
            sim.grid.len(),
            sim.grid.get_burning().len()
        );
        Ok(sim)
    }

    /// Read access for renderers and gameplay systems
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Record at a coordinate
    pub fn get(&self, hex: HexCoord) -> Option<&HexRecord> {
        self.grid.get(hex)
    }

    /// Write path for occupants, path flags and direct field updates.
    ///
    /// A patch that lowers a burning hex's progress counts as suppression:
    /// the hex skips regrowth on the next tick, and if it sits at zero then
    /// it goes out with XP. Setting a tier on an unburnt hex without a max
    /// extinguish time seeds the fire the same way [`FireSimulation::ignite`]
    /// does.
    pub fn mutate(&mut self, hex: HexCoord, patch: HexPatch) {
        let Some(record) = self.grid.get(hex) else {
            self.grid.mutate(hex, patch);
            return;
        };
        let was_burning = record.is_burning();
        let progress_before = record.extinguish_progress();

        let patch = if was_burning {
            patch
        } else {
            self.seed_new_fire(patch)
        };
        self.grid.mutate(hex, patch);

        let lowered = self.grid.get(hex).is_some_and(|record| {
            was_burning && record.is_burning() && record.extinguish_progress() < progress_before
        });
        if lowered {
            self.suppressed.insert(hex);
        }
    }

    /// Install a new wave's path layout
    pub fn set_path_hexes(&mut self, paths: &[PathSpec]) -> usize {
        self.grid.set_path_hexes(paths)
    }

    pub fn path_count_for_wave(&self, wave: u32) -> u32 {
        self.config.path_count_for_wave(wave)
    }

    /// Set a hex alight on behalf of a gameplay system.
    ///
    /// Works on town hexes in every mode. `fire_type` of `None` uses the
    /// mode's ignition tier. Returns false if the hex is off the map or
    /// already burning.
    pub fn ignite(&mut self, hex: HexCoord, fire_type: Option<FireType>) -> bool {
        let tier = fire_type.unwrap_or_else(|| self.roll_tier());
        self.ignite_hex(hex, tier, IgnitionCause::External)
    }

    /// Lower a fire's remaining progress by `amount`.
    ///
    /// The hex skips regrowth on the next tick. Reaching zero puts the fire
    /// out and logs the tier's XP reward.
    pub fn suppress(&mut self, hex: HexCoord, amount: f32) -> SuppressionOutcome {
        let Some((fire_type, progress)) = self
            .grid
            .get(hex)
            .and_then(|record| Some((record.fire_type()?, record.extinguish_progress())))
        else {
            return SuppressionOutcome::NotBurning;
        };

        let amount = amount.max(0.0);
        if amount > 0.0 {
            self.suppressed.insert(hex);
        }

        let remaining = progress - amount;
        if remaining <= 0.0 {
            let xp_reward = self.extinguish(hex, fire_type);
            return SuppressionOutcome::Extinguished {
                fire_type,
                xp_reward,
            };
        }

        self.grid
            .mutate(hex, HexPatch::new().extinguish_progress(remaining));
        SuppressionOutcome::Suppressed { remaining }
    }

    /// Put out every fire regardless of progress. No XP is awarded.
    pub fn clear_all_fires(&mut self) -> usize {
        let burning = self.grid.get_burning().to_vec();
        for hex in &burning {
            self.grid.mutate(*hex, HexPatch::extinguished());
        }
        self.suppressed.clear();
        info!("Cleared {} fires", burning.len());
        burning.len()
    }

    /// Advance the simulation by one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickSummary {
        self.simulation_time += dt;
        self.tick_count += 1;

        let mut summary = TickSummary::default();

        // Fires lit during this tick neither age nor spread until the next one
        let snapshot = self.grid.get_burning().to_vec();

        // 1. Age, burn out, extinguish or regrow each fire
        for &hex in &snapshot {
            let Some(record) = self.grid.get(hex) else {
                continue;
            };
            let Some(fire_type) = record.fire_type() else {
                continue;
            };
            let burn_duration = record.burn_duration() + dt;
            let progress = record.extinguish_progress();
            let max_progress = record.max_extinguish_time();

            let Some(tier) = self.config.fire_type(fire_type).copied() else {
                warn!("No fire type config for {fire_type}, leaving fire at ({hex}) untouched");
                continue;
            };

            if tier.is_burned_out(burn_duration) {
                self.grid.mutate(hex, HexPatch::extinguished());
                self.events.push(FireEvent::BurnedOut { hex, fire_type });
                summary.burned_out += 1;
                continue;
            }

            let suppressed = self.suppressed.contains(&hex);
            if progress <= 0.0 && suppressed {
                self.extinguish(hex, fire_type);
                summary.extinguished += 1;
                continue;
            }

            let mut patch = HexPatch::new().burn_duration(burn_duration);
            if !suppressed {
                let regrow = max_progress * self.config.regrow_rate * dt;
                patch = patch.extinguish_progress((progress + regrow).min(max_progress));
            }
            self.grid.mutate(hex, patch);
        }

        // 2. Spread from fires that survived step 1
        let mut spread_targets: Vec<(HexCoord, HexCoord)> = Vec::new();
        for &source in &snapshot {
            let Some(record) = self.grid.get(source) else {
                continue;
            };
            let Some(fire_type) = record.fire_type() else {
                continue;
            };
            let Some(multiplier) = self
                .config
                .fire_type(fire_type)
                .map(|cfg| cfg.spread_multiplier)
            else {
                continue;
            };
            let source_is_path = record.is_path();

            for neighbor in source.neighbors() {
                let Some(target) = self.grid.get(neighbor) else {
                    continue;
                };
                if !is_burnable(target, self.mode) {
                    continue;
                }
                let chance = (self.config.spread.base_rate(source_is_path, target.is_path())
                    * multiplier)
                    .min(1.0);
                if chance > 0.0 && self.rng.random::<f32>() < chance {
                    spread_targets.push((neighbor, source));
                }
            }
        }
        for (target, source) in spread_targets {
            let tier = self.roll_tier();
            if self.ignite_hex(target, tier, IgnitionCause::Spread { from: source }) {
                summary.ignited += 1;
            }
        }

        // 3. Ambient ignition
        let chance = self.config.ignition_probability;
        if chance > 0.0 {
            let mut sparks = Vec::new();
            for record in self.grid.get_all() {
                if is_burnable(record, self.mode) && self.rng.random::<f32>() < chance {
                    sparks.push(record.coord());
                }
            }
            for hex in sparks {
                let tier = self.roll_tier();
                if self.ignite_hex(hex, tier, IgnitionCause::Spontaneous) {
                    summary.ignited += 1;
                }
            }
        }

        self.suppressed.clear();

        // 4. Town damage or regeneration
        summary.town = self.town.update(&mut self.grid, &self.config.fire_types, dt);
        summary.burning = self.grid.get_burning().len();

        debug!(
            "Tick {}: t={:.1}s, ignited={}, extinguished={}, burned_out={}, burning={}, town={:.1}",
            self.tick_count,
            self.simulation_time,
            summary.ignited,
            summary.extinguished,
            summary.burned_out,
            summary.burning,
            summary.town.health
        );
        summary
    }

    /// Take every event logged since the last drain
    pub fn drain_events(&mut self) -> Vec<FireEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events logged since the last drain
    pub fn events(&self) -> &[FireEvent] {
        &self.events
    }

    pub fn is_town_on_fire(&self) -> bool {
        self.town.is_on_fire(&self.grid)
    }

    /// See [`TownHealth::is_destroyed`]; not latched
    pub fn is_town_destroyed(&self) -> bool {
        self.town.is_destroyed(&self.grid)
    }

    pub fn town_health(&self) -> f32 {
        self.town.health(&self.grid)
    }

    pub fn town_max_health(&self) -> f32 {
        self.town.max_health(&self.grid)
    }

    pub fn town_damage_this_wave(&self) -> f32 {
        self.town.damage_this_wave()
    }

    /// Call at each wave boundary
    pub fn reset_town_damage_this_wave(&mut self) {
        self.town.reset_wave_damage();
    }

    pub fn apply_town_upgrade(&mut self, increment: f32) {
        self.town.apply_upgrade(&mut self.grid, increment);
    }

    pub fn set_town_health(&mut self, value: f32) {
        self.town.set_health(&mut self.grid, value);
    }

    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn get_stats(&self) -> SimulationStats {
        SimulationStats {
            grid: self.grid.get_stats(),
            simulation_time: self.simulation_time,
            tick_count: self.tick_count,
            town_health: self.town_health(),
            town_damage_this_wave: self.town.damage_this_wave(),
        }
    }

    fn roll_tier(&mut self) -> FireType {
        let rng = &mut self.rng;
        self.mode.ignition_tier(|n| rng.random_range(0..n))
    }

    fn ignite_hex(&mut self, hex: HexCoord, fire_type: FireType, cause: IgnitionCause) -> bool {
        if self.grid.get(hex).is_none_or(HexRecord::is_burning) {
            return false;
        }
        let Some(tier) = self.config.fire_type(fire_type) else {
            warn!("No fire type config for {fire_type}, not igniting ({hex})");
            return false;
        };
        let max_progress = tier.extinguish_time;
        let seed_progress = max_progress * self.config.ignition_seed_fraction;

        self.grid.mutate(
            hex,
            HexPatch::new()
                .fire_type(Some(fire_type))
                .max_extinguish_time(max_progress)
                .extinguish_progress(seed_progress)
                .burn_duration(0.0),
        );
        self.events.push(FireEvent::Ignited {
            hex,
            fire_type,
            cause,
        });
        true
    }

    /// Fill in the fire counters a bare tier assignment leaves at zero
    fn seed_new_fire(&self, mut patch: HexPatch) -> HexPatch {
        let Some(Some(fire_type)) = patch.fire_type else {
            return patch;
        };
        if patch.max_extinguish_time.is_some() {
            return patch;
        }
        let Some(tier) = self.config.fire_type(fire_type) else {
            return patch;
        };
        let max_progress = tier.extinguish_time;
        patch.max_extinguish_time = Some(max_progress);
        if patch.extinguish_progress.is_none() {
            patch.extinguish_progress = Some(max_progress * self.config.ignition_seed_fraction);
        }
        if patch.burn_duration.is_none() {
            patch.burn_duration = Some(0.0);
        }
        patch
    }

    /// Put a fire out through suppression and log its XP reward
    fn extinguish(&mut self, hex: HexCoord, fire_type: FireType) -> u32 {
        let xp_reward = match self.config.fire_type(fire_type) {
            Some(tier) => tier.xp_reward,
            None => {
                warn!("No fire type config for {fire_type}, awarding no XP");
                0
            }
        };
        self.grid.mutate(hex, HexPatch::extinguished());
        self.suppressed.remove(&hex);
        self.events.push(FireEvent::Extinguished {
            hex,
            fire_type,
            xp_reward,
        });
        xp_reward
    }
}

/// Whether ambient ignition or spread may set this hex alight
fn is_burnable(record: &HexRecord, mode: SimulationMode) -> bool {
    !record.is_burning() && (!record.is_town() || mode.town_burnable())
}
