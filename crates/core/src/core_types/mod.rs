//! Core types and utilities

pub mod color;
pub mod fire_type;
pub mod hex;
pub mod vec2;

pub use color::PathColor;
pub use fire_type::{FireType, FireTypeConfig, FireTypeRegistry};
pub use hex::{hex_count, HexCoord, HexLayout, AXIAL_DIRECTIONS};
pub use vec2::Vec2;
