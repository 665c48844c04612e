//! Hitgrid - 2D shape collision tests and tile-grid contour tracing
//!
//! Core modules:
//! - `geom`: Shape model, pairwise collision dispatch, contour tracing
//! - `settings`: Collision tolerances and presets
//! - `error`: Construction and configuration errors

pub mod error;
pub mod geom;
pub mod settings;

pub use error::{GeometryError, GeometryResult};
pub use geom::{
    Aabb, Corner, Geometry, OccupancyGrid, Outline, Polygon, RightTriangle, Shape, ShapeKind,
    TileId, collides, collides_at, collides_with, trace_outlines,
};
pub use settings::{TolerancePreset, Tolerances};

use glam::Vec2;

/// Geometry constants
pub mod consts {
    /// Two points closer than this on both axes are the same point
    pub const POINT_EPSILON: f32 = 1e-4;
    /// Hit radius given to zero-width line segments
    pub const LINE_THICKNESS: f32 = 0.5;
    /// Cross products smaller than this are treated as parallel
    pub const PARALLEL_EPSILON: f32 = 1e-6;
    /// Tile id of an empty grid cell
    pub const EMPTY_TILE: u16 = 0;
}

/// 2D cross product (z of the 3D cross product with z = 0)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Clamp that tolerates an inverted range
///
/// `f32::clamp` panics when `min > max`; this returns `max` instead.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
