//! Convex polygons with precomputed separating axes
//!
//! Vertices are stored in local space. Edges and normals do not depend
//! on position, so they are derived once; world-space vertices are
//! produced on the fly by adding the anchor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::primitives::{Aabb, point_in_polygon, project};
use super::shape::ShapeKind;
use crate::cross;
use crate::error::{GeometryError, GeometryResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonDesc", into = "PolygonDesc")]
pub struct Polygon {
    vertices: Vec<Vec2>,
    /// `vertices[i + 1] - vertices[i]`, wrapping
    edges: Vec<Vec2>,
    /// Unit outward normal per edge (zero for zero-length edges)
    normals: Vec<Vec2>,
    /// Local bounds of the vertex ring
    bounds: Aabb,
}

#[derive(Serialize, Deserialize)]
struct PolygonDesc {
    vertices: Vec<Vec2>,
}

impl TryFrom<PolygonDesc> for Polygon {
    type Error = GeometryError;

    fn try_from(desc: PolygonDesc) -> Result<Self, Self::Error> {
        Polygon::new(desc.vertices)
    }
}

impl From<Polygon> for PolygonDesc {
    fn from(poly: Polygon) -> Self {
        PolygonDesc {
            vertices: poly.vertices,
        }
    }
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> GeometryResult<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite(ShapeKind::Polygon));
        }

        let n = vertices.len();
        let edges: Vec<Vec2> = (0..n)
            .map(|i| vertices[(i + 1) % n] - vertices[i])
            .collect();

        // Twice the signed area; positive means clockwise on a y-down screen
        let winding: f32 = (0..n)
            .map(|i| cross(vertices[i], vertices[(i + 1) % n]))
            .sum();
        let normals = edges
            .iter()
            .map(|e| {
                let outward = if winding >= 0.0 {
                    Vec2::new(e.y, -e.x)
                } else {
                    Vec2::new(-e.y, e.x)
                };
                outward.normalize_or_zero()
            })
            .collect();

        let bounds = Aabb::enclosing(vertices.iter().copied())
            .ok_or(GeometryError::TooFewVertices(0))?;

        Ok(Self {
            vertices,
            edges,
            normals,
            bounds,
        })
    }

    /// Axis-aligned rectangle as a polygon, clockwise from the top-left
    pub fn rect(size: Vec2) -> GeometryResult<Self> {
        Self::new(vec![
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ])
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    /// Separating-axis candidates
    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn world_vertices(&self, at: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |&v| v + at)
    }

    /// Edge segments placed at `at`, closing the ring
    pub fn world_edges(&self, at: Vec2) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.vertices
            .iter()
            .zip(&self.edges)
            .map(move |(&v, &e)| (v + at, v + e + at))
    }

    pub fn bounds(&self, at: Vec2) -> Aabb {
        self.bounds.translated(at)
    }

    pub fn contains(&self, at: Vec2, p: Vec2) -> bool {
        point_in_polygon(p, &self.vertices, at)
    }

    /// Projection interval of the placed polygon onto `axis`
    pub fn project(&self, at: Vec2, axis: Vec2) -> (f32, f32) {
        project(self.world_vertices(at), axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_too_few_vertices() {
        let err = Polygon::new(vec![Vec2::ZERO, Vec2::X]).unwrap_err();
        assert!(matches!(err, GeometryError::TooFewVertices(2)));
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = Polygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::new(f32::NAN, 1.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::NonFinite(ShapeKind::Polygon)));
    }

    #[test]
    fn test_normals_point_outward_for_either_winding() {
        let cw = Polygon::rect(Vec2::new(10.0, 10.0)).unwrap();
        let mut ccw_vertices = cw.vertices().to_vec();
        ccw_vertices.reverse();
        let ccw = Polygon::new(ccw_vertices).unwrap();

        let center = Vec2::new(5.0, 5.0);
        for poly in [&cw, &ccw] {
            for ((a, _), n) in poly.world_edges(Vec2::ZERO).zip(poly.normals()) {
                assert!((n.length() - 1.0).abs() < 1e-6);
                assert!(n.dot(a - center) > 0.0, "normal {n} should face away from center");
            }
        }
    }

    #[test]
    fn test_world_edges_close_ring() {
        let tri = Polygon::new(vec![Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)]).unwrap();
        let edges: Vec<_> = tri.world_edges(Vec2::new(1.0, 1.0)).collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Vec2::new(1.0, 5.0), Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_zero_length_edge_has_zero_normal() {
        let poly = Polygon::new(vec![
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
        ])
        .unwrap();
        assert_eq!(poly.normals()[0], Vec2::ZERO);
    }

    #[test]
    fn test_bounds_and_projection() {
        let poly = Polygon::rect(Vec2::new(4.0, 2.0)).unwrap();
        assert_eq!(poly.bounds(Vec2::new(10.0, 0.0)), Aabb::new(10.0, 0.0, 14.0, 2.0));
        assert_eq!(poly.project(Vec2::new(10.0, 0.0), Vec2::X), (10.0, 14.0));
    }
}
