//! Axial hex coordinates
//!
//! The map is a hexagon of hexes addressed by axial `(q, r)` pairs. The third
//! cube component is implicit (`s = -q - r`). Every store and cache in the crate
//! is keyed by [`HexCoord`]; [`HexCoord::key`] gives the same identity as a
//! packed integer for collaborators that keep their own caches.

use super::vec2::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial neighbor offsets, counter-clockwise starting east.
pub const AXIAL_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

const SQRT_3: f32 = 1.732_050_8;

/// Axial hex coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    /// Map origin, also the default town center
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implicit cube component
    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Deterministic integer key: `q` in the high 32 bits, `r` in the low 32 bits.
    #[inline]
    pub const fn key(self) -> u64 {
        ((self.q as u32 as u64) << 32) | (self.r as u32 as u64)
    }

    /// Inverse of [`HexCoord::key`]
    #[inline]
    pub const fn from_key(key: u64) -> Self {
        Self {
            q: (key >> 32) as u32 as i32,
            r: key as u32 as i32,
        }
    }

    /// Neighbor in one of the six [`AXIAL_DIRECTIONS`] (index taken modulo 6)
    #[inline]
    pub const fn neighbor(self, direction: usize) -> Self {
        let (dq, dr) = AXIAL_DIRECTIONS[direction % 6];
        Self::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, in direction order. Bounds are not checked.
    pub fn neighbors(self) -> [HexCoord; 6] {
        std::array::from_fn(|dir| self.neighbor(dir))
    }

    /// Hex (cube) distance between two coordinates
    pub const fn distance(self, other: HexCoord) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Distance from the origin
    #[inline]
    pub const fn length(self) -> i32 {
        self.distance(Self::ORIGIN)
    }

    /// Every coordinate exactly `radius` steps away, walking the ring
    /// counter-clockwise. Radius 0 yields the center alone.
    pub fn ring(self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![self];
        }
        let radius_i = radius as i32;
        let (sq, sr) = AXIAL_DIRECTIONS[4];
        let mut hex = HexCoord::new(self.q + sq * radius_i, self.r + sr * radius_i);

        let mut results = Vec::with_capacity(6 * radius as usize);
        for dir in 0..6 {
            for _ in 0..radius {
                results.push(hex);
                hex = hex.neighbor(dir);
            }
        }
        results
    }

    /// Every coordinate within `radius` steps, ring by ring from the center.
    pub fn spiral(self, radius: u32) -> Vec<HexCoord> {
        let mut results = Vec::with_capacity(hex_count(radius));
        for k in 0..=radius {
            results.extend(self.ring(k));
        }
        results
    }

    /// Bounds predicate for a hexagonal map of radius `map_size` centered on the origin.
    #[inline]
    pub const fn in_bounds(self, map_size: u32) -> bool {
        self.length() <= map_size as i32
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// Number of hexes in a hexagon of the given radius
pub const fn hex_count(radius: u32) -> usize {
    let r = radius as usize;
    3 * r * (r + 1) + 1
}

/// Pointy-top pixel layout used by the renderer and pointer picking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    /// Center-to-corner distance in pixels
    pub size: f32,
    /// Pixel position of the origin hex
    pub origin: Vec2,
}

impl HexLayout {
    pub fn new(size: f32, origin: Vec2) -> Self {
        Self { size, origin }
    }

    /// Pixel center of a hex
    pub fn hex_to_pixel(&self, hex: HexCoord) -> Vec2 {
        let q = hex.q as f32;
        let r = hex.r as f32;
        let x = self.size * (SQRT_3 * q + SQRT_3 / 2.0 * r);
        let y = self.size * (1.5 * r);
        self.origin + Vec2::new(x, y)
    }

    /// Hex containing a pixel position
    pub fn pixel_to_hex(&self, point: Vec2) -> HexCoord {
        let local = (point - self.origin) / self.size;
        let q = SQRT_3 / 3.0 * local.x - local.y / 3.0;
        let r = 2.0 / 3.0 * local.y;
        cube_round(q, r)
    }
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::new(16.0, Vec2::zeros())
    }
}

/// Round fractional axial coordinates to the nearest hex.
fn cube_round(q: f32, r: f32) -> HexCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    HexCoord::new(rq as i32, rr as i32)
}
