//! Occupancy grid: a rectangle of tile-type ids
//!
//! Tile 0 is empty, anything else is a filled tile of that type. Reads
//! outside the grid return empty so edge math never needs special cases;
//! writes outside the grid are errors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::primitives::Aabb;
use crate::consts::EMPTY_TILE;
use crate::error::{GeometryError, GeometryResult};

/// Tile type id, 0 = empty
pub type TileId = u16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDesc", into = "GridDesc")]
pub struct OccupancyGrid {
    /// Pixel size
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    columns: u32,
    rows: u32,
    /// Row-major, `columns * rows` cells
    tiles: Vec<TileId>,
}

#[derive(Serialize, Deserialize)]
struct GridDesc {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    tiles: Vec<TileId>,
}

impl TryFrom<GridDesc> for OccupancyGrid {
    type Error = GeometryError;

    fn try_from(desc: GridDesc) -> Result<Self, Self::Error> {
        OccupancyGrid::from_tiles(
            desc.width,
            desc.height,
            desc.tile_width,
            desc.tile_height,
            desc.tiles,
        )
    }
}

impl From<OccupancyGrid> for GridDesc {
    fn from(grid: OccupancyGrid) -> Self {
        GridDesc {
            width: grid.width,
            height: grid.height,
            tile_width: grid.tile_width,
            tile_height: grid.tile_height,
            tiles: grid.tiles,
        }
    }
}

/// Inclusive rectangle of cell indices, always inside its grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub col_start: u32,
    pub col_end: u32,
    pub row_start: u32,
    pub row_end: u32,
}

impl CellRange {
    /// Cells in row-major order
    pub fn cells(self) -> impl Iterator<Item = (u32, u32)> {
        let (cols, rows) = (self.col_start..=self.col_end, self.row_start..=self.row_end);
        rows.flat_map(move |row| cols.clone().map(move |col| (col, row)))
    }
}

impl OccupancyGrid {
    /// Empty grid covering `width` x `height` pixels
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> GeometryResult<Self> {
        let (columns, rows) = Self::dimensions(width, height, tile_width, tile_height)?;
        Ok(Self {
            width,
            height,
            tile_width,
            tile_height,
            columns,
            rows,
            tiles: vec![EMPTY_TILE; columns as usize * rows as usize],
        })
    }

    /// Grid from a flat row-major tile array
    pub fn from_tiles(
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        tiles: Vec<TileId>,
    ) -> GeometryResult<Self> {
        let mut grid = Self::new(width, height, tile_width, tile_height)?;
        if tiles.len() != grid.tiles.len() {
            return Err(GeometryError::TileCountMismatch {
                expected: grid.tiles.len(),
                actual: tiles.len(),
            });
        }
        grid.tiles = tiles;
        Ok(grid)
    }

    /// Grid from bit-packed cells: row-major, most significant bit first,
    /// a set bit is a tile of type 1. Trailing bits of the last byte are ignored.
    pub fn from_packed_bits(
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        bits: &[u8],
    ) -> GeometryResult<Self> {
        let mut grid = Self::new(width, height, tile_width, tile_height)?;
        let expected_bytes = grid.tiles.len().div_ceil(8);
        if bits.len() != expected_bytes {
            return Err(GeometryError::TileCountMismatch {
                expected: grid.tiles.len(),
                actual: bits.len() * 8,
            });
        }

        for (i, tile) in grid.tiles.iter_mut().enumerate() {
            let byte = bits[i / 8];
            if byte & (0x80 >> (i % 8)) != 0 {
                *tile = 1;
            }
        }
        log::debug!(
            "Unpacked {}x{} grid, {} filled cells",
            grid.columns,
            grid.rows,
            grid.filled_count()
        );
        Ok(grid)
    }

    /// Grid from an RGBA bitmap with one pixel per cell; any non-zero
    /// alpha is a tile of type 1
    pub fn from_rgba(
        columns: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
        rgba: &[u8],
    ) -> GeometryResult<Self> {
        let mut grid = Self::new(
            columns.saturating_mul(tile_width),
            rows.saturating_mul(tile_height),
            tile_width,
            tile_height,
        )?;
        if rgba.len() != grid.tiles.len() * 4 {
            return Err(GeometryError::TileCountMismatch {
                expected: grid.tiles.len(),
                actual: rgba.len() / 4,
            });
        }

        for (tile, pixel) in grid.tiles.iter_mut().zip(rgba.chunks_exact(4)) {
            if pixel[3] > 0 {
                *tile = 1;
            }
        }
        Ok(grid)
    }

    /// Grid from text rows, one character per cell
    ///
    /// `.`, space and `0` are empty, `#` is type 1, digits `1`-`9` are
    /// their own type. Every row must have the same length.
    pub fn from_rows<S: AsRef<str>>(
        tile_width: u32,
        tile_height: u32,
        rows: &[S],
    ) -> GeometryResult<Self> {
        let columns = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(columns * rows.len());

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != columns {
                return Err(GeometryError::RaggedRow {
                    row: row_index,
                    expected: columns,
                    actual: len,
                });
            }
            for c in row.chars() {
                let tile = match c {
                    '.' | ' ' => EMPTY_TILE,
                    '#' => 1,
                    '0'..='9' => c as TileId - '0' as TileId,
                    _ => return Err(GeometryError::InvalidTileChar(c)),
                };
                tiles.push(tile);
            }
        }

        Self::from_tiles(
            columns as u32 * tile_width,
            rows.len() as u32 * tile_height,
            tile_width,
            tile_height,
            tiles,
        )
    }

    fn dimensions(
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> GeometryResult<(u32, u32)> {
        if tile_width == 0 || tile_height == 0 {
            return Err(GeometryError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        Ok((width.div_ceil(tile_width), height.div_ceil(tile_height)))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width as f32, self.tile_height as f32)
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Row-major tile data
    #[inline]
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as u32 >= self.columns || row as u32 >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    /// Tile at a cell, empty outside the grid
    #[inline]
    pub fn get(&self, col: i32, row: i32) -> TileId {
        self.index(col, row)
            .map(|i| self.tiles[i])
            .unwrap_or(EMPTY_TILE)
    }

    #[inline]
    pub fn is_filled(&self, col: i32, row: i32) -> bool {
        self.get(col, row) != EMPTY_TILE
    }

    pub fn set(&mut self, col: i32, row: i32, tile: TileId) -> GeometryResult<()> {
        let index = self.index(col, row).ok_or(GeometryError::CellOutOfBounds {
            col,
            row,
            columns: self.columns,
            rows: self.rows,
        })?;
        self.tiles[index] = tile;
        Ok(())
    }

    pub fn filled_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != EMPTY_TILE).count()
    }

    /// Cell containing a grid-local pixel position, `None` outside the grid
    pub fn cell_at(&self, local: Vec2) -> Option<(u32, u32)> {
        if !local.is_finite()
            || local.x < 0.0
            || local.y < 0.0
            || local.x >= self.width as f32
            || local.y >= self.height as f32
        {
            return None;
        }
        let cell = (local / self.tile_size()).floor();
        Some((cell.x as u32, cell.y as u32))
    }

    /// Cells touched by grid-local inclusive bounds, clamped to the grid
    pub fn cell_range(&self, local: &Aabb) -> Option<CellRange> {
        if self.columns == 0
            || self.rows == 0
            || !local.min().is_finite()
            || !local.max().is_finite()
        {
            return None;
        }
        let size = self.tile_size();
        let lo = (local.min() / size).floor();
        let hi = (local.max() / size).floor();

        let max_col = (self.columns - 1) as f32;
        let max_row = (self.rows - 1) as f32;
        if hi.x < 0.0 || hi.y < 0.0 || lo.x > max_col || lo.y > max_row {
            return None;
        }

        Some(CellRange {
            col_start: lo.x.max(0.0) as u32,
            col_end: hi.x.min(max_col) as u32,
            row_start: lo.y.max(0.0) as u32,
            row_end: hi.y.min(max_row) as u32,
        })
    }

    /// Pixel bounds of one tile with the grid placed at `at`
    pub fn tile_bounds(&self, col: u32, row: u32, at: Vec2) -> Aabb {
        let pos = at + Vec2::new(col as f32, row as f32) * self.tile_size();
        Aabb::from_pixels(pos, self.tile_size())
    }

    /// Continuous area of one tile, `pos ..= pos + tile size`
    ///
    /// Unlike [`Self::tile_bounds`] this has no gap before the next tile,
    /// so points, lines and curves inside a filled tile always hit it.
    pub fn tile_rect(&self, col: u32, row: u32, at: Vec2) -> Aabb {
        let pos = at + Vec2::new(col as f32, row as f32) * self.tile_size();
        Aabb::from_points(pos, pos + self.tile_size())
    }

    /// Pixel bounds of the whole grid placed at `at`
    pub fn bounds(&self, at: Vec2) -> Aabb {
        Aabb::from_pixels(at, Vec2::new(self.width as f32, self.height as f32))
    }

    /// Bounds of every filled tile inside `range`, grid placed at `at`
    pub fn filled_tiles(&self, range: CellRange, at: Vec2) -> impl Iterator<Item = Aabb> + '_ {
        range
            .cells()
            .filter(|&(col, row)| self.is_filled(col as i32, row as i32))
            .map(move |(col, row)| self.tile_bounds(col, row, at))
    }
}
