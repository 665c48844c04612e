//! Pairwise intersection tests
//!
//! One canonical test per unordered pair of shape kinds, all in world
//! space. Triangles, polygons and grids are passed with the anchor `at`
//! they are placed at. Every test is inclusive: touching is a hit.
//!
//! Box vs right triangle and right triangle vs right triangle sample
//! vertices and edges rather than running a full separating-axis test,
//! so an overlap made only of crossing edges with no vertex inside the
//! other shape can be missed.

use glam::Vec2;

use super::grid::OccupancyGrid;
use super::polygon::Polygon;
use super::primitives::{Aabb, segment_within_radius, segments_intersect};
use super::triangle::RightTriangle;
use crate::{clamp, cross};

// === Point ===

/// Points coincide when they are closer than `epsilon` on both axes
#[inline]
pub fn point_point(a: Vec2, b: Vec2, epsilon: f32) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// A point hits a segment when it lies within `thickness` of it
#[inline]
pub fn point_line(p: Vec2, a0: Vec2, a1: Vec2, thickness: f32) -> bool {
    line_circle(a0, a1, p, thickness)
}

#[inline]
pub fn point_box(p: Vec2, b: &Aabb) -> bool {
    b.contains(p)
}

#[inline]
pub fn point_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) <= radius * radius
}

#[inline]
pub fn point_triangle(p: Vec2, tri: &RightTriangle, at: Vec2) -> bool {
    tri.contains(at, p)
}

#[inline]
pub fn point_polygon(p: Vec2, poly: &Polygon, at: Vec2) -> bool {
    poly.contains(at, p)
}

/// Tile lookup under the point
pub fn point_grid(p: Vec2, grid: &OccupancyGrid, at: Vec2) -> bool {
    grid.cell_at(p - at)
        .is_some_and(|(col, row)| grid.is_filled(col as i32, row as i32))
}

// === Line ===

/// Segment intersection; parallel segments fall back to checking whether
/// either segment's endpoints lie on the other
pub fn line_line(
    a0: Vec2,
    a1: Vec2,
    b0: Vec2,
    b1: Vec2,
    thickness: f32,
    parallel_epsilon: f32,
) -> bool {
    if segments_intersect(a0, a1, b0, b1) {
        return true;
    }
    if cross(a1 - a0, b1 - b0).abs() > parallel_epsilon {
        return false;
    }
    point_line(a0, b0, b1, thickness)
        || point_line(a1, b0, b1, thickness)
        || point_line(b0, a0, a1, thickness)
        || point_line(b1, a0, a1, thickness)
}

/// Either endpoint inside, or the segment crosses one of the box edges
pub fn line_box(a0: Vec2, a1: Vec2, b: &Aabb) -> bool {
    if b.contains(a0) || b.contains(a1) {
        return true;
    }
    b.edges()
        .iter()
        .any(|&(e0, e1)| segments_intersect(a0, a1, e0, e1))
}

#[inline]
pub fn line_circle(a0: Vec2, a1: Vec2, center: Vec2, radius: f32) -> bool {
    segment_within_radius(a0, a1, center, radius)
}

pub fn line_triangle(a0: Vec2, a1: Vec2, tri: &RightTriangle, at: Vec2) -> bool {
    tri.edges(at)
        .iter()
        .any(|&(e0, e1)| segments_intersect(a0, a1, e0, e1))
        || tri.contains(at, a0)
        || tri.contains(at, a1)
}

/// Crossing test against every polygon edge; a segment fully inside the
/// polygon does not cross anything and is not reported
pub fn line_polygon(
    a0: Vec2,
    a1: Vec2,
    poly: &Polygon,
    at: Vec2,
    thickness: f32,
    parallel_epsilon: f32,
) -> bool {
    poly.world_edges(at)
        .any(|(e0, e1)| line_line(a0, a1, e0, e1, thickness, parallel_epsilon))
}

/// Line against the area of each filled tile under the segment
pub fn line_grid(a0: Vec2, a1: Vec2, grid: &OccupancyGrid, at: Vec2) -> bool {
    any_tile_under(grid, at, &Aabb::from_points(a0, a1), |tile| line_box(a0, a1, tile))
}

// === Box ===

/// Overlapping or abutting pixel boxes
///
/// Box bounds end at `pos + size - 1`, so boxes that share an edge are
/// one pixel apart in bounds space. The one-pixel slack applies between
/// two boxes only: a zero-size box at `(10, 5)` hits `Box(0, 0, 10, 10)`
/// while a point there does not, and a box abutting a filled grid tile
/// does not hit it (see [`box_grid`]).
pub fn box_box(a: &Aabb, b: &Aabb) -> bool {
    a.left <= b.right + 1.0
        && b.left <= a.right + 1.0
        && a.top <= b.bottom + 1.0
        && b.top <= a.bottom + 1.0
}

/// Clamp the centre into the box and compare against the radius
///
/// The vertical clamp stops at `bottom - 1` while the horizontal one uses
/// `right`; existing content depends on this asymmetry.
pub fn box_circle(b: &Aabb, center: Vec2, radius: f32) -> bool {
    let closest = Vec2::new(
        clamp(center.x, b.left, b.right),
        clamp(center.y, b.top, b.bottom - 1.0),
    );
    closest.distance_squared(center) <= radius * radius
}

/// Triangle centroid in box, any triangle edge touching the box, or any
/// box corner in the triangle
pub fn box_triangle(b: &Aabb, tri: &RightTriangle, at: Vec2) -> bool {
    if !b.overlaps(&tri.bounds(at)) {
        return false;
    }
    b.contains(tri.centroid(at))
        || tri.edges(at).iter().any(|&(e0, e1)| line_box(e0, e1, b))
        || b.corners().iter().any(|&c| tri.contains(at, c))
}

/// Bounds reject, then any polygon edge touching the box
///
/// A box entirely inside a polygon crosses no edge and is not reported.
pub fn box_polygon(b: &Aabb, poly: &Polygon, at: Vec2) -> bool {
    if !b.overlaps(&poly.bounds(at)) {
        return false;
    }
    poly.world_edges(at).any(|(e0, e1)| line_box(e0, e1, b))
}

/// Any filled tile in the cell range covered by the box
///
/// Cells are looked up from the box's pixel bounds with no abutting
/// slack, so a box must cover at least one pixel of a filled tile.
pub fn box_grid(b: &Aabb, grid: &OccupancyGrid, at: Vec2) -> bool {
    grid.cell_range(&b.translated(-at))
        .is_some_and(|range| {
            range
                .cells()
                .any(|(col, row)| grid.is_filled(col as i32, row as i32))
        })
}

// === Circle ===

#[inline]
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

pub fn circle_triangle(center: Vec2, radius: f32, tri: &RightTriangle, at: Vec2) -> bool {
    tri.contains(at, center)
        || tri
            .edges(at)
            .iter()
            .any(|&(e0, e1)| segment_within_radius(e0, e1, center, radius))
}

pub fn circle_polygon(center: Vec2, radius: f32, poly: &Polygon, at: Vec2) -> bool {
    poly.contains(at, center)
        || poly
            .world_edges(at)
            .any(|(e0, e1)| segment_within_radius(e0, e1, center, radius))
}

pub fn circle_grid(center: Vec2, radius: f32, grid: &OccupancyGrid, at: Vec2) -> bool {
    let reach = Vec2::splat(radius);
    let bounds = Aabb::from_points(center - reach, center + reach);
    any_tile_under(grid, at, &bounds, |tile| {
        let closest = center.clamp(tile.min(), tile.max());
        closest.distance_squared(center) <= radius * radius
    })
}

// === Right triangle ===

/// Any vertex of either triangle inside the other
pub fn triangle_triangle(a: &RightTriangle, at_a: Vec2, b: &RightTriangle, at_b: Vec2) -> bool {
    a.world_vertices(at_a).iter().any(|&v| b.contains(at_b, v))
        || b.world_vertices(at_b).iter().any(|&v| a.contains(at_a, v))
}

pub fn triangle_polygon(tri: &RightTriangle, at_t: Vec2, poly: &Polygon, at_p: Vec2) -> bool {
    tri.world_vertices(at_t)
        .iter()
        .any(|&v| poly.contains(at_p, v))
        || poly.world_vertices(at_p).any(|v| tri.contains(at_t, v))
}

pub fn triangle_grid(tri: &RightTriangle, at_t: Vec2, grid: &OccupancyGrid, at_g: Vec2) -> bool {
    any_tile_under(grid, at_g, &tri.bounds(at_t), |tile| {
        box_triangle(tile, tri, at_t)
    })
}

// === Polygon ===

/// Separating-axis test over both polygons' edge normals
pub fn polygon_polygon(a: &Polygon, at_a: Vec2, b: &Polygon, at_b: Vec2) -> bool {
    a.normals().iter().chain(b.normals()).all(|&axis| {
        let (a_min, a_max) = a.project(at_a, axis);
        let (b_min, b_max) = b.project(at_b, axis);
        a_max >= b_min && b_max >= a_min
    })
}

/// Edge contact with a filled tile, or a tile covered by the polygon
pub fn polygon_grid(poly: &Polygon, at_p: Vec2, grid: &OccupancyGrid, at_g: Vec2) -> bool {
    any_tile_under(grid, at_g, &poly.bounds(at_p), |tile| {
        box_polygon(tile, poly, at_p) || poly.contains(at_p, tile.center())
    })
}

// === Grid ===

/// Any pair of filled tiles whose pixel boxes overlap
pub fn grid_grid(a: &OccupancyGrid, at_a: Vec2, b: &OccupancyGrid, at_b: Vec2) -> bool {
    let Some(range) = a.cell_range(&b.bounds(at_b).translated(-at_a)) else {
        return false;
    };
    a.filled_tiles(range, at_a).any(|tile_a| {
        b.cell_range(&tile_a.translated(-at_b)).is_some_and(|range_b| {
            b.filled_tiles(range_b, at_b)
                .any(|tile_b| tile_a.overlaps(&tile_b))
        })
    })
}

/// Run `hit` on the area of each filled tile near world-space `bounds`
///
/// Tile areas are closed, so a shape starting exactly on a tile's right or
/// bottom edge still touches it; the lookup reaches one unit back for it.
fn any_tile_under(
    grid: &OccupancyGrid,
    at: Vec2,
    bounds: &Aabb,
    mut hit: impl FnMut(&Aabb) -> bool,
) -> bool {
    let lookup = Aabb::new(bounds.left - 1.0, bounds.top - 1.0, bounds.right, bounds.bottom);
    let Some(range) = grid.cell_range(&lookup.translated(-at)) else {
        return false;
    };
    range
        .cells()
        .filter(|&(col, row)| grid.is_filled(col as i32, row as i32))
        .any(|(col, row)| hit(&grid.tile_rect(col, row, at)))
}
