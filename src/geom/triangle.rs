//! Right triangles that fill three corners of their bounding box
//!
//! The orientation names the bounding-box corner the triangle leaves out;
//! the hypotenuse runs between the two corners adjacent to it. Vertices
//! are recomputed whenever size or orientation change, so readers never
//! see stale geometry.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::primitives::{Aabb, half_plane_side};
use crate::error::{GeometryError, GeometryResult};

/// Bounding-box corner omitted by a right triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "ne", alias = "NE")]
    NorthEast,
    #[serde(rename = "se", alias = "SE")]
    SouthEast,
    #[serde(rename = "sw", alias = "SW")]
    SouthWest,
    #[serde(rename = "nw", alias = "NW")]
    NorthWest,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::SouthWest,
        Corner::NorthWest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::NorthEast => "ne",
            Corner::SouthEast => "se",
            Corner::SouthWest => "sw",
            Corner::NorthWest => "nw",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ne" | "northeast" | "north_east" => Ok(Corner::NorthEast),
            "se" | "southeast" | "south_east" => Ok(Corner::SouthEast),
            "sw" | "southwest" | "south_west" => Ok(Corner::SouthWest),
            "nw" | "northwest" | "north_west" => Ok(Corner::NorthWest),
            _ => Err(GeometryError::UnknownOrientation(s.to_string())),
        }
    }
}

/// A right triangle in local space, top-left of its bounding box at the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TriangleDesc", into = "TriangleDesc")]
pub struct RightTriangle {
    size: Vec2,
    corner: Corner,
    /// Derived from `size` and `corner`, clockwise on screen
    vertices: [Vec2; 3],
    /// Hypotenuse directed so the inside is where `half_plane_side <= 0`
    hypotenuse: (Vec2, Vec2),
}

#[derive(Serialize, Deserialize)]
struct TriangleDesc {
    size: Vec2,
    corner: Corner,
}

impl TryFrom<TriangleDesc> for RightTriangle {
    type Error = GeometryError;

    fn try_from(desc: TriangleDesc) -> Result<Self, Self::Error> {
        RightTriangle::new(desc.size, desc.corner)
    }
}

impl From<RightTriangle> for TriangleDesc {
    fn from(tri: RightTriangle) -> Self {
        TriangleDesc {
            size: tri.size,
            corner: tri.corner,
        }
    }
}

impl RightTriangle {
    pub fn new(size: Vec2, corner: Corner) -> GeometryResult<Self> {
        validate_size(size)?;
        let mut tri = Self {
            size,
            corner,
            vertices: [Vec2::ZERO; 3],
            hypotenuse: (Vec2::ZERO, Vec2::ZERO),
        };
        tri.recompute();
        Ok(tri)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn corner(&self) -> Corner {
        self.corner
    }

    pub fn set_size(&mut self, size: Vec2) -> GeometryResult<()> {
        validate_size(size)?;
        self.size = size;
        self.recompute();
        Ok(())
    }

    pub fn set_corner(&mut self, corner: Corner) {
        self.corner = corner;
        self.recompute();
    }

    /// Local-space vertices
    #[inline]
    pub fn vertices(&self) -> [Vec2; 3] {
        self.vertices
    }

    /// Vertices placed at `at`
    pub fn world_vertices(&self, at: Vec2) -> [Vec2; 3] {
        self.vertices.map(|v| v + at)
    }

    /// Edges placed at `at`, following vertex order
    pub fn edges(&self, at: Vec2) -> [(Vec2, Vec2); 3] {
        let [a, b, c] = self.world_vertices(at);
        [(a, b), (b, c), (c, a)]
    }

    /// Pixel bounds placed at `at`
    pub fn bounds(&self, at: Vec2) -> Aabb {
        Aabb::from_pixels(at, self.size)
    }

    pub fn centroid(&self, at: Vec2) -> Vec2 {
        let [a, b, c] = self.vertices;
        at + (a + b + c) / 3.0
    }

    /// Inclusive point test: bounds reject, then the hypotenuse half-plane
    pub fn contains(&self, at: Vec2, p: Vec2) -> bool {
        if !self.bounds(at).contains(p) {
            return false;
        }
        let (a, b) = self.hypotenuse;
        half_plane_side(a + at, b + at, p) <= 0.0
    }

    fn recompute(&mut self) {
        // Vertices sit on pixel bounds, matching `Aabb::from_pixels`
        let extent = (self.size - Vec2::ONE).max(Vec2::ZERO);
        let nw = Vec2::ZERO;
        let ne = Vec2::new(extent.x, 0.0);
        let se = extent;
        let sw = Vec2::new(0.0, extent.y);

        (self.vertices, self.hypotenuse) = match self.corner {
            Corner::NorthEast => ([nw, se, sw], (se, nw)),
            Corner::SouthEast => ([nw, ne, sw], (sw, ne)),
            Corner::SouthWest => ([nw, ne, se], (nw, se)),
            Corner::NorthWest => ([ne, se, sw], (ne, sw)),
        };
    }
}

fn validate_size(size: Vec2) -> GeometryResult<()> {
    if !size.is_finite() {
        return Err(GeometryError::NonFinite(super::ShapeKind::RightTriangle));
    }
    if size.x < 0.0 || size.y < 0.0 {
        return Err(GeometryError::NegativeExtent {
            width: size.x,
            height: size.y,
        });
    }
    Ok(())
}
