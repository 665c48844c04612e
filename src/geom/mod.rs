//! Collision geometry module
//!
//! Everything here is pure and synchronous:
//! - Shapes are plain values, positions are passed in per query
//! - No query mutates its inputs
//! - Degenerate numbers resolve to "no hit", never to NaN

pub mod collision;
pub mod contour;
pub mod dispatch;
pub mod grid;
pub mod polygon;
pub mod primitives;
pub mod shape;
pub mod triangle;

pub use contour::{Component, Outline, find_components, trace_outlines};
pub use dispatch::{collides, collides_at, collides_with};
pub use grid::{CellRange, OccupancyGrid, TileId};
pub use polygon::Polygon;
pub use primitives::{
    Aabb, closest_point_on_segment, half_plane_side, point_in_polygon, segment_intersection,
    segment_within_radius, segments_intersect,
};
pub use shape::{Geometry, Shape, ShapeKind};
pub use triangle::{Corner, RightTriangle};
