//! Per-hex state record and the typed patch used to change it

use crate::core_types::{FireType, HexCoord, PathColor};
use serde::{Deserialize, Serialize};

/// Id of the gameplay entity occupying a hex (tower, bomb, ...)
pub type EntityId = u32;

/// Kinds of entity a hex can host at the same time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupantKind {
    Tower,
    Bomb,
    Tank,
    Item,
    DigSite,
}

impl OccupantKind {
    pub const ALL: [OccupantKind; 5] = [
        OccupantKind::Tower,
        OccupantKind::Bomb,
        OccupantKind::Tank,
        OccupantKind::Item,
        OccupantKind::DigSite,
    ];

    /// Patch field that carries this occupant
    pub fn field(self) -> HexField {
        match self {
            OccupantKind::Tower => HexField::Tower,
            OccupantKind::Bomb => HexField::Bomb,
            OccupantKind::Tank => HexField::Tank,
            OccupantKind::Item => HexField::Item,
            OccupantKind::DigSite => HexField::DigSite,
        }
    }
}

/// Owning entity ids per occupant kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupants {
    pub tower: Option<EntityId>,
    pub bomb: Option<EntityId>,
    pub tank: Option<EntityId>,
    pub item: Option<EntityId>,
    pub dig_site: Option<EntityId>,
}

impl Occupants {
    pub fn get(&self, kind: OccupantKind) -> Option<EntityId> {
        *self.slot(kind)
    }

    fn slot(&self, kind: OccupantKind) -> &Option<EntityId> {
        match kind {
            OccupantKind::Tower => &self.tower,
            OccupantKind::Bomb => &self.bomb,
            OccupantKind::Tank => &self.tank,
            OccupantKind::Item => &self.item,
            OccupantKind::DigSite => &self.dig_site,
        }
    }

    fn slot_mut(&mut self, kind: OccupantKind) -> &mut Option<EntityId> {
        match kind {
            OccupantKind::Tower => &mut self.tower,
            OccupantKind::Bomb => &mut self.bomb,
            OccupantKind::Tank => &mut self.tank,
            OccupantKind::Item => &mut self.item,
            OccupantKind::DigSite => &mut self.dig_site,
        }
    }

    pub fn is_empty(&self) -> bool {
        OccupantKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

/// Full mutable state of one hex
///
/// Fields are crate-private: outside the crate a record is read-only and every
/// change goes through [`crate::HexGrid::mutate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexRecord {
    pub(crate) coord: HexCoord,
    pub(crate) is_town: bool,
    pub(crate) is_path: bool,
    pub(crate) path_color: Option<PathColor>,
    /// `None` while the hex is not burning
    pub(crate) fire_type: Option<FireType>,
    /// Seconds this fire has been burning
    pub(crate) burn_duration: f32,
    /// Remaining suppression effort, always within `[0, max_extinguish_time]`
    pub(crate) extinguish_progress: f32,
    pub(crate) max_extinguish_time: f32,
    pub(crate) occupants: Occupants,
    pub(crate) town_health: f32,
    pub(crate) max_town_health: f32,
}

impl HexRecord {
    /// Unburnt, unoccupied, non-town hex
    pub fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            is_town: false,
            is_path: false,
            path_color: None,
            fire_type: None,
            burn_duration: 0.0,
            extinguish_progress: 0.0,
            max_extinguish_time: 0.0,
            occupants: Occupants::default(),
            town_health: 0.0,
            max_town_health: 0.0,
        }
    }

    /// Merge every field present in `patch`, leaving the rest untouched.
    pub(crate) fn apply(&mut self, patch: &HexPatch) {
        if let Some(is_town) = patch.is_town {
            self.is_town = is_town;
        }
        if let Some(is_path) = patch.is_path {
            self.is_path = is_path;
        }
        if let Some(color) = patch.path_color {
            self.path_color = color;
        }
        if let Some(fire_type) = patch.fire_type {
            self.fire_type = fire_type;
        }
        if let Some(duration) = patch.burn_duration {
            self.burn_duration = duration.max(0.0);
        }
        if let Some(max) = patch.max_extinguish_time {
            self.max_extinguish_time = max.max(0.0);
        }
        if let Some(progress) = patch.extinguish_progress {
            self.extinguish_progress = progress;
        }
        for kind in OccupantKind::ALL {
            if let Some(occupant) = patch.occupant_update(kind) {
                *self.occupants.slot_mut(kind) = occupant;
            }
        }
        if let Some(max) = patch.max_town_health {
            self.max_town_health = max.max(0.0);
        }
        if let Some(health) = patch.town_health {
            self.town_health = health;
        }

        self.extinguish_progress = self
            .extinguish_progress
            .max(0.0)
            .min(self.max_extinguish_time);
        self.town_health = self.town_health.max(0.0).min(self.max_town_health);
    }

    pub fn coord(&self) -> HexCoord {
        self.coord
    }

    pub fn q(&self) -> i32 {
        self.coord.q
    }

    pub fn r(&self) -> i32 {
        self.coord.r
    }

    pub fn is_town(&self) -> bool {
        self.is_town
    }

    pub fn is_path(&self) -> bool {
        self.is_path
    }

    pub fn path_color(&self) -> Option<PathColor> {
        self.path_color
    }

    pub fn fire_type(&self) -> Option<FireType> {
        self.fire_type
    }

    pub fn is_burning(&self) -> bool {
        self.fire_type.is_some()
    }

    pub fn burn_duration(&self) -> f32 {
        self.burn_duration
    }

    pub fn extinguish_progress(&self) -> f32 {
        self.extinguish_progress
    }

    pub fn max_extinguish_time(&self) -> f32 {
        self.max_extinguish_time
    }

    pub fn occupants(&self) -> &Occupants {
        &self.occupants
    }

    pub fn occupant(&self, kind: OccupantKind) -> Option<EntityId> {
        self.occupants.get(kind)
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub fn town_health(&self) -> f32 {
        self.town_health
    }

    pub fn max_town_health(&self) -> f32 {
        self.max_town_health
    }
}

/// Names of every patchable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexField {
    IsTown,
    IsPath,
    PathColor,
    FireType,
    BurnDuration,
    ExtinguishProgress,
    MaxExtinguishTime,
    Tower,
    Bomb,
    Tank,
    Item,
    DigSite,
    TownHealth,
    MaxTownHealth,
}

/// Fields whose change invalidates cached render layout.
///
/// Any new field that changes what the map looks like must be listed here, or
/// renderers keyed on `structure_version` will keep drawing stale geometry.
pub const STRUCTURAL_FIELDS: [HexField; 9] = [
    HexField::IsTown,
    HexField::IsPath,
    HexField::PathColor,
    HexField::FireType,
    HexField::Tower,
    HexField::Bomb,
    HexField::Tank,
    HexField::Item,
    HexField::DigSite,
];

/// Partial update for a [`HexRecord`]. Absent fields are left untouched.
///
/// Nested options (`path_color`, occupants) distinguish "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HexPatch {
    pub is_town: Option<bool>,
    pub is_path: Option<bool>,
    pub path_color: Option<Option<PathColor>>,
    pub fire_type: Option<Option<FireType>>,
    pub burn_duration: Option<f32>,
    pub extinguish_progress: Option<f32>,
    pub max_extinguish_time: Option<f32>,
    pub tower: Option<Option<EntityId>>,
    pub bomb: Option<Option<EntityId>>,
    pub tank: Option<Option<EntityId>>,
    pub item: Option<Option<EntityId>>,
    pub dig_site: Option<Option<EntityId>>,
    pub town_health: Option<f32>,
    pub max_town_health: Option<f32>,
}

impl HexPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that puts a hex out and zeroes its fire counters
    pub fn extinguished() -> Self {
        Self::new()
            .fire_type(None)
            .burn_duration(0.0)
            .extinguish_progress(0.0)
            .max_extinguish_time(0.0)
    }

    pub fn town(mut self, is_town: bool) -> Self {
        self.is_town = Some(is_town);
        self
    }

    pub fn path(mut self, is_path: bool) -> Self {
        self.is_path = Some(is_path);
        self
    }

    pub fn path_color(mut self, color: Option<PathColor>) -> Self {
        self.path_color = Some(color);
        self
    }

    pub fn fire_type(mut self, fire_type: Option<FireType>) -> Self {
        self.fire_type = Some(fire_type);
        self
    }

    pub fn burn_duration(mut self, seconds: f32) -> Self {
        self.burn_duration = Some(seconds);
        self
    }

    pub fn extinguish_progress(mut self, progress: f32) -> Self {
        self.extinguish_progress = Some(progress);
        self
    }

    pub fn max_extinguish_time(mut self, seconds: f32) -> Self {
        self.max_extinguish_time = Some(seconds);
        self
    }

    pub fn occupant(mut self, kind: OccupantKind, id: Option<EntityId>) -> Self {
        let slot = match kind {
            OccupantKind::Tower => &mut self.tower,
            OccupantKind::Bomb => &mut self.bomb,
            OccupantKind::Tank => &mut self.tank,
            OccupantKind::Item => &mut self.item,
            OccupantKind::DigSite => &mut self.dig_site,
        };
        *slot = Some(id);
        self
    }

    pub fn town_health(mut self, health: f32) -> Self {
        self.town_health = Some(health);
        self
    }

    pub fn max_town_health(mut self, health: f32) -> Self {
        self.max_town_health = Some(health);
        self
    }

    /// Occupant update for `kind`, if present
    pub(crate) fn occupant_update(&self, kind: OccupantKind) -> Option<Option<EntityId>> {
        match kind {
            OccupantKind::Tower => self.tower,
            OccupantKind::Bomb => self.bomb,
            OccupantKind::Tank => self.tank,
            OccupantKind::Item => self.item,
            OccupantKind::DigSite => self.dig_site,
        }
    }

    /// Whether the patch carries a value for `field`
    pub fn has(&self, field: HexField) -> bool {
        match field {
            HexField::IsTown => self.is_town.is_some(),
            HexField::IsPath => self.is_path.is_some(),
            HexField::PathColor => self.path_color.is_some(),
            HexField::FireType => self.fire_type.is_some(),
            HexField::BurnDuration => self.burn_duration.is_some(),
            HexField::ExtinguishProgress => self.extinguish_progress.is_some(),
            HexField::MaxExtinguishTime => self.max_extinguish_time.is_some(),
            HexField::Tower => self.tower.is_some(),
            HexField::Bomb => self.bomb.is_some(),
            HexField::Tank => self.tank.is_some(),
            HexField::Item => self.item.is_some(),
            HexField::DigSite => self.dig_site.is_some(),
            HexField::TownHealth => self.town_health.is_some(),
            HexField::MaxTownHealth => self.max_town_health.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if any allow-listed structural field is present
    pub fn touches_structure(&self) -> bool {
        STRUCTURAL_FIELDS.iter().any(|field| self.has(*field))
    }
}
