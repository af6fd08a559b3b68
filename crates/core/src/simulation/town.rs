//! Town health pool
//!
//! The town is one logical health pool stored on every town hex. The pool is
//! read from the town center and always written to all town hexes together, so
//! the copies never drift apart. Each update either drains the pool by the
//! damage of the fires burning on town hexes or, with no town fire, regenerates
//! it slowly toward its maximum.

use crate::config::TownConfig;
use crate::core_types::{FireTypeRegistry, HexCoord};
use crate::grid::{HexGrid, HexPatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one town update
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TownUpdate {
    /// Distinct town hexes on fire
    pub burning_town_hexes: usize,
    /// Combined damage per second of those fires
    pub total_dps: f32,
    /// Signed health change applied this update
    pub health_delta: f32,
    /// Health after the update
    pub health: f32,
}

/// Town damage and regeneration bookkeeping
#[derive(Debug, Clone)]
pub struct TownHealth {
    regen_per_second: f32,
    damage_this_wave: f32,
}

impl TownHealth {
    pub fn new(config: &TownConfig) -> Self {
        Self {
            regen_per_second: config.regen_per_second,
            damage_this_wave: 0.0,
        }
    }

    /// Current pool value, read from the town center
    pub fn health(&self, grid: &HexGrid) -> f32 {
        grid.get_town_center().map_or(0.0, |center| center.town_health())
    }

    pub fn max_health(&self, grid: &HexGrid) -> f32 {
        grid.get_town_center()
            .map_or(0.0, |center| center.max_town_health())
    }

    /// Game over once the town center has no health left.
    ///
    /// The pool keeps regenerating from zero once no town hex burns, so this
    /// can turn false again; callers that end the game must latch it.
    pub fn is_destroyed(&self, grid: &HexGrid) -> bool {
        self.health(grid) <= 0.0
    }

    pub fn is_on_fire(&self, grid: &HexGrid) -> bool {
        grid.is_town_on_fire()
    }

    /// Damage taken since the last [`TownHealth::reset_wave_damage`]
    pub fn damage_this_wave(&self) -> f32 {
        self.damage_this_wave
    }

    pub fn reset_wave_damage(&mut self) {
        self.damage_this_wave = 0.0;
    }

    /// Apply `dt` seconds of fire damage or regeneration.
    pub fn update(&mut self, grid: &mut HexGrid, fire_types: &FireTypeRegistry, dt: f32) -> TownUpdate {
        let mut burning: Vec<HexCoord> = grid
            .get_town_hexes()
            .iter()
            .copied()
            .filter(|hex| grid.is_burning(*hex))
            .collect();
        burning.sort_unstable();
        burning.dedup();

        let health = self.health(grid);
        let max_health = self.max_health(grid);

        if burning.is_empty() {
            let regenerated = (health + self.regen_per_second * dt).min(max_health);
            let next = regenerated.max(health);
            self.write_pool(grid, next);
            return TownUpdate {
                burning_town_hexes: 0,
                total_dps: 0.0,
                health_delta: next - health,
                health: next,
            };
        }

        let total_dps: f32 = burning
            .iter()
            .filter_map(|hex| grid.get(*hex).and_then(|record| record.fire_type()))
            .map(|fire_type| match fire_types.lookup(fire_type) {
                Some(cfg) => cfg.town_damage_per_second,
                None => {
                    warn!("No fire type config for {fire_type}, town takes no damage from it");
                    0.0
                }
            })
            .sum();

        let damage = (total_dps * dt).min(health).max(0.0);
        let next = health - damage;
        self.damage_this_wave += damage;
        self.write_pool(grid, next);

        debug!(
            "Town burning: hexes={}, dps={:.2}, health={:.2}/{:.2}",
            burning.len(),
            total_dps,
            next,
            max_health
        );
        if next <= 0.0 && health > 0.0 {
            info!("Town destroyed after {:.1} damage this wave", self.damage_this_wave);
        }

        TownUpdate {
            burning_town_hexes: burning.len(),
            total_dps,
            health_delta: -damage,
            health: next,
        }
    }

    /// Raise max health and current health by `increment` on every town hex.
    pub fn apply_upgrade(&self, grid: &mut HexGrid, increment: f32) {
        let max_health = self.max_health(grid) + increment;
        let health = self.health(grid) + increment;
        let town: Vec<HexCoord> = grid.get_town_hexes().to_vec();
        for hex in town {
            grid.mutate(
                hex,
                HexPatch::new()
                    .max_town_health(max_health)
                    .town_health(health),
            );
        }
        info!("Town upgraded by {increment}: max health now {max_health}");
    }

    /// Set the pool on every town hex; clamped to `[0, max]`.
    pub fn set_health(&self, grid: &mut HexGrid, value: f32) {
        self.write_pool(grid, value);
    }

    fn write_pool(&self, grid: &mut HexGrid, value: f32) {
        let town: Vec<HexCoord> = grid.get_town_hexes().to_vec();
        for hex in town {
            let unchanged = grid
                .get(hex)
                .is_some_and(|record| record.town_health() == value);
            if !unchanged {
                grid.mutate(hex, HexPatch::new().town_health(value));
            }
        }
    }
}
