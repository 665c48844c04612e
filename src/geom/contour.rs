//! Grid contour tracing
//!
//! Two passes over an occupancy grid:
//! 1. Flood fill (4-connected) into components of equal tile id. Empty
//!    components that touch the grid border are the open exterior and
//!    are dropped; enclosed empty components are holes.
//! 2. Walk each component's boundary along tile edges, keeping the
//!    component on the right-hand side, and emit a point at every turn.
//!
//! Outlines are clockwise on a y-down screen and closed (the last point
//! connects back to the first).
//!
//! Tiles cover pixels `pos ..= pos + size - 1`. Solid outlines sit on the
//! outer tile edges, one unit past their last pixel on the right and
//! bottom. Hole outlines sit on the hole's own pixels, so their right and
//! bottom edges are pulled in by one unit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{OccupancyGrid, TileId};
use crate::consts::EMPTY_TILE;

/// A connected set of equal-id cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub tile: TileId,
    /// First cell in row-major order
    pub seed: (u32, u32),
    pub cell_count: usize,
    /// Inclusive cell bounds: (min_col, min_row, max_col, max_row)
    pub cell_bounds: (u32, u32, u32, u32),
}

impl Component {
    pub fn is_hole(&self) -> bool {
        self.tile == EMPTY_TILE
    }

    pub fn touches_border(&self, grid: &OccupancyGrid) -> bool {
        let (min_col, min_row, max_col, max_row) = self.cell_bounds;
        min_col == 0 || min_row == 0 || max_col + 1 >= grid.columns() || max_row + 1 >= grid.rows()
    }
}

/// Closed boundary of one component in grid pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub tile: TileId,
    pub hole: bool,
    pub points: Vec<Vec2>,
}

impl Outline {
    pub fn is_hole(&self) -> bool {
        self.hole
    }

    /// Copy moved by `by`, e.g. to the grid's world position
    pub fn translated(&self, by: Vec2) -> Self {
        Self {
            tile: self.tile,
            hole: self.hole,
            points: self.points.iter().map(|&p| p + by).collect(),
        }
    }
}

/// Cardinal walking direction, y down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    fn step(&self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }

    fn turn_right(&self) -> Self {
        match self {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
        }
    }

    fn turn_left(&self) -> Self {
        match self {
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
            Direction::North => Direction::West,
        }
    }

    /// Cells diagonally ahead of a tile corner, as (ahead-left, ahead-right)
    fn ahead(&self, corner: (i32, i32)) -> ((i32, i32), (i32, i32)) {
        let (x, y) = corner;
        // Cells around corner (x, y): NW (x-1, y-1), NE (x, y-1), SW (x-1, y), SE (x, y)
        match self {
            Direction::East => ((x, y - 1), (x, y)),
            Direction::South => ((x, y), (x - 1, y)),
            Direction::West => ((x - 1, y), (x - 1, y - 1)),
            Direction::North => ((x - 1, y - 1), (x, y - 1)),
        }
    }
}

const UNLABELED: usize = usize::MAX;

/// Label every cell with its component index
fn label_components(grid: &OccupancyGrid) -> (Vec<usize>, Vec<Component>) {
    let columns = grid.columns() as usize;
    let rows = grid.rows() as usize;
    let tiles = grid.tiles();

    let mut labels = vec![UNLABELED; tiles.len()];
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for seed in 0..tiles.len() {
        if labels[seed] != UNLABELED {
            continue;
        }

        let label = components.len();
        let tile = tiles[seed];
        let (seed_col, seed_row) = ((seed % columns) as u32, (seed / columns) as u32);
        let mut component = Component {
            tile,
            seed: (seed_col, seed_row),
            cell_count: 0,
            cell_bounds: (seed_col, seed_row, seed_col, seed_row),
        };

        labels[seed] = label;
        stack.push(seed);
        while let Some(index) = stack.pop() {
            let (col, row) = (index % columns, index / columns);
            component.cell_count += 1;
            let bounds = &mut component.cell_bounds;
            bounds.0 = bounds.0.min(col as u32);
            bounds.1 = bounds.1.min(row as u32);
            bounds.2 = bounds.2.max(col as u32);
            bounds.3 = bounds.3.max(row as u32);

            let neighbors = [
                (col > 0).then(|| index - 1),
                (col + 1 < columns).then(|| index + 1),
                (row > 0).then(|| index - columns),
                (row + 1 < rows).then(|| index + columns),
            ];
            for next in neighbors.into_iter().flatten() {
                if labels[next] == UNLABELED && tiles[next] == tile {
                    labels[next] = label;
                    stack.push(next);
                }
            }
        }

        components.push(component);
    }

    (labels, components)
}

/// Connected components of a grid, in row-major order of their first cell
pub fn find_components(grid: &OccupancyGrid) -> Vec<Component> {
    label_components(grid).1
}

/// Trace one closed outline per filled component and per enclosed hole
pub fn trace_outlines(grid: &OccupancyGrid) -> Vec<Outline> {
    let (labels, components) = label_components(grid);
    let columns = grid.columns() as i32;
    let rows = grid.rows() as i32;

    let mut outlines = Vec::new();
    for (label, component) in components.iter().enumerate() {
        if component.is_hole() && component.touches_border(grid) {
            continue;
        }

        let inside = |(col, row): (i32, i32)| {
            col >= 0
                && row >= 0
                && col < columns
                && row < rows
                && labels[(row * columns + col) as usize] == label
        };
        let points = walk_boundary(grid, component.seed, component.is_hole(), inside);
        outlines.push(Outline {
            tile: component.tile,
            hole: component.is_hole(),
            points,
        });
    }

    log::debug!(
        "Traced {} outlines from {} components on a {}x{} grid",
        outlines.len(),
        components.len(),
        grid.columns(),
        grid.rows()
    );
    outlines
}

/// Follow tile edges around the component containing `seed`
///
/// `seed` must be the component's first cell in row-major order, so its
/// top-left corner touches no other cell of the component and the walk
/// passes through it exactly once.
fn walk_boundary(
    grid: &OccupancyGrid,
    seed: (u32, u32),
    hole: bool,
    inside: impl Fn((i32, i32)) -> bool,
) -> Vec<Vec2> {
    // A turn joins one vertical and one horizontal edge. With the region on
    // the right, heading south runs down its right side and heading west
    // runs along its bottom.
    let to_pixels = |(x, y): (i32, i32), incoming: Direction, outgoing: Direction| {
        let mut p = Vec2::new(
            (x as u32 * grid.tile_width()).min(grid.width()) as f32,
            (y as u32 * grid.tile_height()).min(grid.height()) as f32,
        );
        if hole {
            let turn = [incoming, outgoing];
            if turn.contains(&Direction::South) {
                p.x -= 1.0;
            }
            if turn.contains(&Direction::West) {
                p.y -= 1.0;
            }
        }
        p
    };

    let start = (seed.0 as i32, seed.1 as i32);
    let mut corner = start;
    let mut dir = Direction::East;
    let mut points = vec![to_pixels(start, Direction::North, Direction::East)];

    // Each tile edge is walked at most once
    let max_steps = 4 * (grid.columns() as usize + 1) * (grid.rows() as usize + 1);
    for _ in 0..max_steps {
        let (dx, dy) = dir.step();
        corner = (corner.0 + dx, corner.1 + dy);
        if corner == start {
            return points;
        }

        let (ahead_left, ahead_right) = dir.ahead(corner);
        let next = if !inside(ahead_right) {
            dir.turn_right()
        } else if inside(ahead_left) {
            dir.turn_left()
        } else {
            dir
        };

        if next != dir {
            points.push(to_pixels(corner, dir, next));
            dir = next;
        }
    }

    log::warn!(
        "Boundary walk from cell {:?} did not close after {} steps",
        seed,
        max_steps
    );
    points
}
