//! Hex record store and its derived views
//!
//! `HexGrid` owns one [`HexRecord`] per in-bounds coordinate and keeps four
//! views in lockstep with it:
//!
//! - every record, in fixed sweep order (the store itself)
//! - burning hexes and path hexes, as swap-remove [`IndexedSet`]s
//! - the seven town hexes, as a small list
//!
//! All writes go through [`HexGrid::mutate`], which updates the views and the
//! structure version before returning, so readers never see a view that
//! disagrees with the records.

use super::indexed_set::IndexedSet;
use super::record::{HexPatch, HexRecord};
use crate::config::{ConfigError, GameConfig};
use crate::core_types::{hex_count, HexCoord, PathColor};
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

/// One enemy path of a wave layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathSpec {
    pub hexes: Vec<HexCoord>,
    /// Tint for this path; the configured default when `None`
    pub color: Option<PathColor>,
}

impl PathSpec {
    pub fn new(hexes: Vec<HexCoord>, color: Option<PathColor>) -> Self {
        Self { hexes, color }
    }
}

/// Aggregate hex counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridStats {
    pub total_hexes: usize,
    pub burning_hexes: usize,
    pub path_hexes: usize,
    pub occupied_hexes: usize,
    pub town_hexes: usize,
    pub structure_version: u64,
}

/// Hex world state store
#[derive(Debug, Clone)]
pub struct HexGrid {
    records: Vec<HexRecord>,
    slots: FxHashMap<HexCoord, usize>,
    burning: IndexedSet<HexCoord>,
    path: IndexedSet<HexCoord>,
    town: Vec<HexCoord>,
    town_center: HexCoord,
    occupied_count: usize,
    structure_version: u64,
    map_size: u32,
    default_path_color: PathColor,
}

impl HexGrid {
    /// Build every in-bounds hex and mark the town cluster.
    ///
    /// # Errors
    /// Returns the first configuration error found by [`GameConfig::validate`].
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = config.map_size as i32;
        let capacity = hex_count(config.map_size);
        let mut records = Vec::with_capacity(capacity);
        let mut slots = FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher);
        for q in -size..=size {
            for r in -size..=size {
                let hex = HexCoord::new(q, r);
                if config.in_bounds(hex) {
                    slots.insert(hex, records.len());
                    records.push(HexRecord::new(hex));
                }
            }
        }

        let mut grid = Self {
            records,
            slots,
            burning: IndexedSet::with_capacity(capacity),
            path: IndexedSet::with_capacity(capacity),
            town: Vec::with_capacity(7),
            town_center: config.town_center,
            occupied_count: 0,
            structure_version: 0,
            map_size: config.map_size,
            default_path_color: config.default_path_color,
        };

        let max_health = config.town.max_health;
        for hex in config.town_cluster() {
            grid.mutate(
                hex,
                HexPatch::new()
                    .town(true)
                    .max_town_health(max_health)
                    .town_health(max_health),
            );
        }

        info!(
            "Hex grid initialized: map_size={}, hexes={}, town_center=({})",
            grid.map_size,
            grid.records.len(),
            grid.town_center
        );
        Ok(grid)
    }

    /// Record at a coordinate, `None` outside the map
    #[inline]
    pub fn get(&self, hex: HexCoord) -> Option<&HexRecord> {
        self.slots.get(&hex).map(|&slot| &self.records[slot])
    }

    /// Record by [`HexCoord::key`]
    pub fn get_by_key(&self, key: u64) -> Option<&HexRecord> {
        self.get(HexCoord::from_key(key))
    }

    pub fn contains(&self, hex: HexCoord) -> bool {
        self.slots.contains_key(&hex)
    }

    /// Merge `patch` into the record at `hex` and bring every view up to date.
    ///
    /// Unknown coordinates and empty patches are no-ops.
    pub fn mutate(&mut self, hex: HexCoord, patch: HexPatch) {
        let Some(&slot) = self.slots.get(&hex) else {
            trace!("Ignoring mutation of off-map hex ({hex})");
            return;
        };
        if patch.is_empty() {
            return;
        }

        let record = &mut self.records[slot];
        let was_town = record.is_town();
        let was_burning = record.is_burning();
        let was_path = record.is_path();
        let was_occupied = record.is_occupied();

        record.apply(&patch);

        let is_town = record.is_town();
        let is_burning = record.is_burning();
        let is_path = record.is_path();
        let is_occupied = record.is_occupied();

        if was_town != is_town {
            if is_town {
                self.town.push(hex);
            } else {
                self.town.retain(|member| *member != hex);
            }
        }
        if was_burning != is_burning {
            if is_burning {
                self.burning.insert(hex);
            } else {
                self.burning.remove(&hex);
            }
        }
        if was_path != is_path {
            if is_path {
                self.path.insert(hex);
            } else {
                self.path.remove(&hex);
            }
        }
        if was_occupied != is_occupied {
            if is_occupied {
                self.occupied_count += 1;
            } else {
                self.occupied_count -= 1;
            }
        }
        if patch.touches_structure() {
            self.structure_version += 1;
        }
    }

    /// Every record, in fixed order
    #[inline]
    pub fn get_all(&self) -> &[HexRecord] {
        &self.records
    }

    /// Coordinates of every burning hex. Order changes as fires go out.
    #[inline]
    pub fn get_burning(&self) -> &[HexCoord] {
        self.burning.as_slice()
    }

    /// Coordinates of every path hex. Order changes as paths are cleared.
    #[inline]
    pub fn get_path(&self) -> &[HexCoord] {
        self.path.as_slice()
    }

    #[inline]
    pub fn get_town_hexes(&self) -> &[HexCoord] {
        &self.town
    }

    pub fn burning_records(&self) -> impl Iterator<Item = &HexRecord> + '_ {
        self.burning.as_slice().iter().filter_map(|hex| self.get(*hex))
    }

    pub fn town_records(&self) -> impl Iterator<Item = &HexRecord> + '_ {
        self.town.iter().filter_map(|hex| self.get(*hex))
    }

    pub fn town_center(&self) -> HexCoord {
        self.town_center
    }

    /// Record of the town center hex
    pub fn get_town_center(&self) -> Option<&HexRecord> {
        self.get(self.town_center)
    }

    pub fn is_burning(&self, hex: HexCoord) -> bool {
        self.burning.contains(&hex)
    }

    pub fn is_town_on_fire(&self) -> bool {
        self.town.iter().any(|hex| self.burning.contains(hex))
    }

    /// Bumped by every mutation that touches a structural field
    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    pub fn map_size(&self) -> u32 {
        self.map_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_stats(&self) -> GridStats {
        GridStats {
            total_hexes: self.records.len(),
            burning_hexes: self.burning.len(),
            path_hexes: self.path.len(),
            occupied_hexes: self.occupied_count,
            town_hexes: self.town.len(),
            structure_version: self.structure_version,
        }
    }

    /// Replace path membership with a new wave layout.
    ///
    /// Existing path hexes are cleared first. Town hexes and off-map
    /// coordinates in `paths` are skipped. When paths overlap, the later path's
    /// color wins. Returns the number of path hexes afterwards.
    pub fn set_path_hexes(&mut self, paths: &[PathSpec]) -> usize {
        let previous = self.path.as_slice().to_vec();
        for hex in previous {
            self.mutate(hex, HexPatch::new().path(false).path_color(None));
        }

        for spec in paths {
            let color = spec.color.unwrap_or(self.default_path_color);
            for &hex in &spec.hexes {
                let Some(record) = self.get(hex) else {
                    continue;
                };
                if record.is_town() {
                    continue;
                }
                self.mutate(hex, HexPatch::new().path(true).path_color(Some(color)));
            }
        }

        info!(
            "Path layout replaced: {} paths, {} path hexes",
            paths.len(),
            self.path.len()
        );
        self.path.len()
    }
}
