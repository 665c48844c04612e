//! Errors raised while building shapes, grids and settings
//!
//! Queries never fail: degenerate geometry is answered with "no hit".

use thiserror::Error;

use crate::geom::ShapeKind;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Negative extent: {width}x{height}")]
    NegativeExtent { width: f32, height: f32 },

    #[error("Negative radius: {0}")]
    NegativeRadius(f32),

    #[error("Non-finite coordinate in {0} shape")]
    NonFinite(ShapeKind),

    #[error("Unknown right triangle orientation: {0:?}")]
    UnknownOrientation(String),

    #[error("Polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("A {0} shape cannot be resized through width/height")]
    FixedExtent(ShapeKind),

    #[error("Expected a {expected} shape, got {actual}")]
    WrongKind { expected: ShapeKind, actual: ShapeKind },

    #[error("Tile size must be non-zero, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },

    #[error("Tile data has {actual} cells, expected {expected}")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("Unexpected tile character {0:?}")]
    InvalidTileChar(char),

    #[error("Cell ({col}, {row}) is outside a {columns}x{rows} grid")]
    CellOutOfBounds { col: i32, row: i32, columns: u32, rows: u32 },

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
