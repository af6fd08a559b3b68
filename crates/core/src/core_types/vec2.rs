//! Vector type alias for 2D screen-space positions.

use nalgebra::Vector2;

/// 2D vector type for pixel-space positions.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used by the hex layout
/// helpers that the renderer and input handling call into.
pub type Vec2 = Vector2<f32>;
