//! Shape model: the seven collidable kinds
//!
//! A shape's anchor is `owner + offset - origin`. The owner position is
//! passed in at query time, so asking "would this hit over there" never
//! means moving the shape and putting it back.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::OccupancyGrid;
use super::polygon::Polygon;
use super::primitives::Aabb;
use super::triangle::{Corner, RightTriangle};
use crate::error::{GeometryError, GeometryResult};

/// Shape kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Point,
    Line,
    Box,
    Circle,
    RightTriangle,
    Polygon,
    Grid,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Point,
        ShapeKind::Line,
        ShapeKind::Box,
        ShapeKind::Circle,
        ShapeKind::RightTriangle,
        ShapeKind::Polygon,
        ShapeKind::Grid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Line => "line",
            ShapeKind::Box => "box",
            ShapeKind::Circle => "circle",
            ShapeKind::RightTriangle => "right_triangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Grid => "grid",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific geometry, relative to the shape's anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Point,
    Line { start: Vec2, end: Vec2 },
    /// Top-left at the anchor
    Box { size: Vec2 },
    /// Centred on the anchor
    Circle { radius: f32 },
    RightTriangle(RightTriangle),
    Polygon(Polygon),
    Grid(OccupancyGrid),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Point => ShapeKind::Point,
            Geometry::Line { .. } => ShapeKind::Line,
            Geometry::Box { .. } => ShapeKind::Box,
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::RightTriangle(_) => ShapeKind::RightTriangle,
            Geometry::Polygon(_) => ShapeKind::Polygon,
            Geometry::Grid(_) => ShapeKind::Grid,
        }
    }

    fn validate(&self) -> GeometryResult<()> {
        let kind = self.kind();
        match self {
            Geometry::Line { start, end } if !start.is_finite() || !end.is_finite() => {
                Err(GeometryError::NonFinite(kind))
            }
            Geometry::Box { size } => validate_extent(*size, kind),
            Geometry::Circle { radius } if !radius.is_finite() => {
                Err(GeometryError::NonFinite(kind))
            }
            Geometry::Circle { radius } if *radius < 0.0 => {
                Err(GeometryError::NegativeRadius(*radius))
            }
            _ => Ok(()),
        }
    }
}

fn validate_extent(size: Vec2, kind: ShapeKind) -> GeometryResult<()> {
    if !size.is_finite() {
        return Err(GeometryError::NonFinite(kind));
    }
    if size.x < 0.0 || size.y < 0.0 {
        return Err(GeometryError::NegativeExtent {
            width: size.x,
            height: size.y,
        });
    }
    Ok(())
}

/// A collidable shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeDesc", into = "ShapeDesc")]
pub struct Shape {
    offset: Vec2,
    origin: Vec2,
    geometry: Geometry,
}

#[derive(Serialize, Deserialize)]
struct ShapeDesc {
    #[serde(default)]
    offset: Vec2,
    #[serde(default)]
    origin: Vec2,
    #[serde(flatten)]
    geometry: Geometry,
}

impl TryFrom<ShapeDesc> for Shape {
    type Error = GeometryError;

    fn try_from(desc: ShapeDesc) -> Result<Self, Self::Error> {
        Shape::from_parts(desc.offset, desc.origin, desc.geometry)
    }
}

impl From<Shape> for ShapeDesc {
    fn from(shape: Shape) -> Self {
        ShapeDesc {
            offset: shape.offset,
            origin: shape.origin,
            geometry: shape.geometry,
        }
    }
}

impl Shape {
    /// Build a shape from raw parts, validating extents and coordinates
    pub fn from_parts(offset: Vec2, origin: Vec2, geometry: Geometry) -> GeometryResult<Self> {
        if !offset.is_finite() || !origin.is_finite() {
            return Err(GeometryError::NonFinite(geometry.kind()));
        }
        geometry.validate()?;
        Ok(Self {
            offset,
            origin,
            geometry,
        })
    }

    pub fn point(pos: Vec2) -> GeometryResult<Self> {
        Self::from_parts(pos, Vec2::ZERO, Geometry::Point)
    }

    /// Segment between two owner-relative endpoints
    pub fn line(start: Vec2, end: Vec2) -> GeometryResult<Self> {
        Self::from_parts(Vec2::ZERO, Vec2::ZERO, Geometry::Line { start, end })
    }

    /// Box with its top-left corner at `pos`
    pub fn new_box(pos: Vec2, size: Vec2) -> GeometryResult<Self> {
        Self::from_parts(pos, Vec2::ZERO, Geometry::Box { size })
    }

    pub fn circle(center: Vec2, radius: f32) -> GeometryResult<Self> {
        Self::from_parts(center, Vec2::ZERO, Geometry::Circle { radius })
    }

    /// Right triangle whose bounding box has its top-left corner at `pos`
    pub fn right_triangle(pos: Vec2, size: Vec2, corner: Corner) -> GeometryResult<Self> {
        let tri = RightTriangle::new(size, corner)?;
        Self::from_parts(pos, Vec2::ZERO, Geometry::RightTriangle(tri))
    }

    /// Convex polygon with vertices relative to `pos`
    pub fn polygon(pos: Vec2, vertices: Vec<Vec2>) -> GeometryResult<Self> {
        let poly = Polygon::new(vertices)?;
        Self::from_parts(pos, Vec2::ZERO, Geometry::Polygon(poly))
    }

    /// Grid with its top-left corner at `pos`
    pub fn grid(pos: Vec2, grid: OccupancyGrid) -> GeometryResult<Self> {
        Self::from_parts(pos, Vec2::ZERO, Geometry::Grid(grid))
    }

    pub fn with_origin(mut self, origin: Vec2) -> GeometryResult<Self> {
        self.set_origin(origin)?;
        Ok(self)
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) -> GeometryResult<()> {
        if !origin.is_finite() {
            return Err(GeometryError::NonFinite(self.kind()));
        }
        self.origin = origin;
        Ok(())
    }

    /// World position of the shape's local origin for a given owner
    #[inline]
    pub fn anchor(&self, owner: Vec2) -> Vec2 {
        owner + self.offset - self.origin
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds_at(Vec2::ZERO)
    }

    /// Bounding box for a given owner position
    pub fn bounds_at(&self, owner: Vec2) -> Aabb {
        let at = self.anchor(owner);
        match &self.geometry {
            Geometry::Point => Aabb::point(at),
            Geometry::Line { start, end } => Aabb::from_points(at + *start, at + *end),
            Geometry::Box { size } => Aabb::from_pixels(at, *size),
            Geometry::Circle { radius } => {
                Aabb::from_points(at - Vec2::splat(*radius), at + Vec2::splat(*radius))
            }
            Geometry::RightTriangle(tri) => tri.bounds(at),
            Geometry::Polygon(poly) => poly.bounds(at),
            Geometry::Grid(grid) => grid.bounds(at),
        }
    }

    /// Horizontal extent; lines count both endpoints (span + 1)
    pub fn width(&self) -> f32 {
        self.extent().x
    }

    /// Vertical extent; lines count both endpoints (span + 1)
    pub fn height(&self) -> f32 {
        self.extent().y
    }

    fn extent(&self) -> Vec2 {
        match &self.geometry {
            Geometry::Point => Vec2::ZERO,
            Geometry::Line { start, end } => (*end - *start).abs() + Vec2::ONE,
            Geometry::Box { size } => *size,
            Geometry::Circle { radius } => Vec2::splat(radius * 2.0),
            Geometry::RightTriangle(tri) => tri.size(),
            Geometry::Polygon(poly) => {
                let b = poly.bounds(Vec2::ZERO);
                b.max() - b.min()
            }
            Geometry::Grid(grid) => Vec2::new(grid.width() as f32, grid.height() as f32),
        }
    }

    /// Resize a box or right triangle; other kinds have derived extents
    pub fn set_size(&mut self, size: Vec2) -> GeometryResult<()> {
        let kind = self.kind();
        match &mut self.geometry {
            Geometry::Box { size: current } => {
                validate_extent(size, kind)?;
                *current = size;
                Ok(())
            }
            Geometry::RightTriangle(tri) => tri.set_size(size),
            _ => Err(GeometryError::FixedExtent(kind)),
        }
    }

    pub fn set_radius(&mut self, radius: f32) -> GeometryResult<()> {
        let actual = self.kind();
        let Geometry::Circle { radius: current } = &mut self.geometry else {
            return Err(GeometryError::WrongKind {
                expected: ShapeKind::Circle,
                actual,
            });
        };
        if !radius.is_finite() {
            return Err(GeometryError::NonFinite(actual));
        }
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius(radius));
        }
        *current = radius;
        Ok(())
    }

    pub fn set_corner(&mut self, corner: Corner) -> GeometryResult<()> {
        let actual = self.kind();
        match &mut self.geometry {
            Geometry::RightTriangle(tri) => {
                tri.set_corner(corner);
                Ok(())
            }
            _ => Err(GeometryError::WrongKind {
                expected: ShapeKind::RightTriangle,
                actual,
            }),
        }
    }
}
