//! Geometric primitives shared by every pairwise test
//!
//! All comparisons are inclusive: touching counts as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cross;

/// Axis-aligned bounds with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Bounds of a single point
    pub fn point(p: Vec2) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Smallest bounds containing both points
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x, max.y)
    }

    /// Bounds of a pixel rectangle: `pos .. pos + size - 1`, never inverted
    pub fn from_pixels(pos: Vec2, size: Vec2) -> Self {
        let span = (size - Vec2::ONE).max(Vec2::ZERO);
        Self::new(pos.x, pos.y, pos.x + span.x, pos.y + span.y)
    }

    /// Smallest bounds containing every point, `None` for an empty iterator
    pub fn enclosing(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::point(first), |acc, p| {
            Self::new(
                acc.left.min(p.x),
                acc.top.min(p.y),
                acc.right.max(p.x),
                acc.bottom.max(p.y),
            )
        }))
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right, self.bottom)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min() + self.max()) * 0.5
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self::new(
            self.left + by.x,
            self.top + by.y,
            self.right + by.x,
            self.bottom + by.y,
        )
    }

    /// Inclusive containment
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Inclusive overlap (shared edges count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.top <= other.bottom
            && self.bottom >= other.top
    }

    /// Corners in clockwise screen order: NW, NE, SE, SW
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
        ]
    }

    /// The four edges as segments, following `corners`
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let [nw, ne, se, sw] = self.corners();
        [(nw, ne), (ne, se), (se, sw), (sw, nw)]
    }
}

/// Parametric segment intersection
///
/// Returns the intersection point `a0 + t * (a1 - a0)` when both segment
/// parameters lie in `[0, 1]`. Parallel or collinear segments produce
/// non-finite parameters, which fail the range check and yield `None`.
pub fn segment_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<Vec2> {
    let r = a1 - a0;
    let s = b1 - b0;
    let rxs = cross(r, s);

    let t = cross(b0 - a0, s) / rxs;
    let u = cross(a0 - b0, r) / -rxs;

    // NaN fails both range checks
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a0 + r * t)
    } else {
        None
    }
}

#[inline]
pub fn segments_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    segment_intersection(a0, a1, b0, b1).is_some()
}

/// Crossing-number point-in-polygon test over a vertex ring
///
/// `offset` is added to every vertex, so local-space rings can be tested
/// without building a world-space copy.
pub fn point_in_polygon(p: Vec2, vertices: &[Vec2], offset: Vec2) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut prev = vertices[vertices.len() - 1] + offset;
    for &v in vertices {
        let v = v + offset;
        if (v.y > p.y) != (prev.y > p.y) {
            // Straddling edges never have equal y, so the division is safe
            let x_cross = (prev.x - v.x) * (p.y - v.y) / (prev.y - v.y) + v.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        prev = v;
    }
    inside
}

/// Closest point to `p` on the segment `a..b`
///
/// The projection parameter is clamped to `[0, length]`. A zero-length
/// segment returns `a`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len = ab.length();
    if len <= f32::EPSILON {
        return a;
    }

    let dir = ab / len;
    let t = (p - a).dot(dir).clamp(0.0, len);
    a + dir * t
}

/// Whether any point of segment `a..b` lies within `radius` of `center`
#[inline]
pub fn segment_within_radius(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = closest_point_on_segment(a, b, center);
    closest.distance_squared(center) <= radius * radius
}

/// Which side of the directed line `a -> b` the point `p` is on
///
/// Zero on the line; the sign convention is that of [`cross`].
#[inline]
pub fn half_plane_side(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    cross(b - a, p - a)
}

/// Project a point ring onto an axis, returning `(min, max)`
pub fn project(vertices: impl IntoIterator<Item = Vec2>, axis: Vec2) -> (f32, f32) {
    vertices
        .into_iter()
        .map(|v| v.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_intersection_crossing() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        let p = hit.expect("diagonals cross");
        assert!((p - Vec2::new(5.0, 5.0)).length() < 0.001);
    }

    #[test]
    fn test_segment_intersection_endpoint_touch() {
        // T junction: second segment ends exactly on the first
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 0.0),
        ));
    }

    #[test]
    fn test_segment_intersection_parallel_is_miss() {
        // Parallel
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        ));
        // Collinear and overlapping: still reported as a miss at this level
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0),
        ));
    }

    #[test]
    fn test_segment_intersection_zero_length() {
        let p = Vec2::new(3.0, 3.0);
        assert!(!segments_intersect(p, p, p, p));
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square, Vec2::ZERO));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square, Vec2::ZERO));
        // Offset moves the ring, not the point
        assert!(point_in_polygon(
            Vec2::new(25.0, 5.0),
            &square,
            Vec2::new(20.0, 0.0)
        ));
        assert!(!point_in_polygon(Vec2::ZERO, &square[..2], Vec2::ZERO));
    }

    #[test]
    fn test_closest_point_on_segment_clamps() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(5.0, 3.0)), Vec2::new(5.0, 0.0));
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(-4.0, 3.0)), a);
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(14.0, 3.0)), b);
        // Degenerate segment
        assert_eq!(closest_point_on_segment(a, a, Vec2::new(1.0, 1.0)), a);
    }

    #[test]
    fn test_segment_within_radius_tangent() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(segment_within_radius(a, b, Vec2::new(5.0, 5.0), 5.0));
        assert!(!segment_within_radius(a, b, Vec2::new(5.0, 5.1), 5.0));
    }

    #[test]
    fn test_half_plane_side() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // y grows downward: (5, 5) is below the line
        assert!(half_plane_side(a, b, Vec2::new(5.0, 5.0)) > 0.0);
        assert!(half_plane_side(a, b, Vec2::new(5.0, -5.0)) < 0.0);
        assert_eq!(half_plane_side(a, b, Vec2::new(7.0, 0.0)), 0.0);
    }

    #[test]
    fn test_aabb_pixels_and_overlap() {
        let b = Aabb::from_pixels(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(b.right, 9.0);
        assert_eq!(b.bottom, 9.0);

        let empty = Aabb::from_pixels(Vec2::new(4.0, 4.0), Vec2::ZERO);
        assert_eq!(empty.left, empty.right);

        let other = Aabb::new(9.0, 9.0, 20.0, 20.0);
        assert!(b.overlaps(&other));
        assert!(!b.overlaps(&other.translated(Vec2::new(1.0, 0.0))));
    }

    #[test]
    fn test_aabb_enclosing() {
        assert!(Aabb::enclosing(std::iter::empty()).is_none());
        let b = Aabb::enclosing([Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0)]).unwrap();
        assert_eq!(b, Aabb::new(-2.0, -1.0, 3.0, 4.0));
    }
}
