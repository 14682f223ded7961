#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for Maze Walk.
//!
//! A [`Maze`] is carved once at session start and is read-only afterwards.
//! Movement, placement, scoring and rendering all borrow the same instance,
//! so wall data, dead-end classification and hop distances can never drift
//! apart between consumers.

mod carve;
mod navigation;

use std::fmt::{self, Write as _};

use maze_walk_core::{
    config::validate_maze_size, CellCoord, ConfigError, Direction, TileKind,
};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use self::navigation::DistanceField;

/// Wall flags for the four sides of a cell; `true` means a wall is present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Walls {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl Walls {
    const CLOSED: Self = Self {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    /// Reports whether the side facing `direction` is walled.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Number of walled sides.
    #[must_use]
    pub fn count(&self) -> usize {
        [self.north, self.east, self.south, self.west]
            .into_iter()
            .filter(|wall| *wall)
            .count()
    }

    fn remove(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }
}

/// One grid square of the maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    walls: Walls,
    visited: bool,
    dead_end: bool,
    distance_from_center: Option<u32>,
}

impl Cell {
    fn walled(coord: CellCoord) -> Self {
        Self {
            coord,
            walls: Walls::CLOSED,
            visited: false,
            dead_end: false,
            distance_from_center: None,
        }
    }

    /// Location of the cell within the grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Reports whether the side facing `direction` is walled.
    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls.has(direction)
    }

    /// Reports whether the cell has exactly one open side.
    #[must_use]
    pub const fn is_dead_end(&self) -> bool {
        self.dead_end
    }

    /// Hop count from the generation root, once computed.
    #[must_use]
    pub const fn distance_from_center(&self) -> Option<u32> {
        self.distance_from_center
    }

    /// The single open side of a dead end.
    #[must_use]
    pub fn open_side(&self) -> Option<Direction> {
        if !self.dead_end {
            return None;
        }
        Direction::SEARCH_ORDER
            .into_iter()
            .find(|direction| !self.walls.has(*direction))
    }
}

/// Square maze grid carved as a spanning tree.
#[derive(Clone, Debug)]
pub struct Maze {
    size: u32,
    cells: Vec<Cell>,
    root: CellCoord,
    center_dead_end: CellCoord,
    farthest_dead_end: CellCoord,
}

impl Maze {
    /// Generates a perfect maze of `size × size` cells.
    ///
    /// Carving starts at the geometric centre `(⌊size/2⌋, ⌊size/2⌋)`; branch
    /// order is drawn from `rng`, so a seeded generator reproduces a maze.
    pub fn generate<R>(size: u32, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        validate_maze_size(size)?;
        let mut maze = Self::walled(size);
        carve::carve(&mut maze, rng);
        maze.classify();

        debug!(
            size,
            dead_ends = maze.dead_ends().count(),
            spawn = %maze.center_dead_end,
            goal = %maze.farthest_dead_end,
            "generated maze"
        );
        Ok(maze)
    }

    /// Builds a maze from an explicit list of open passages.
    ///
    /// Each entry opens the wall pair between a cell and its neighbour in the
    /// given direction. The passages must form a spanning tree over the grid.
    pub fn from_passages(
        size: u32,
        passages: &[(CellCoord, Direction)],
    ) -> Result<Self, LayoutError> {
        validate_maze_size(size)?;
        let mut maze = Self::walled(size);

        for &(cell, direction) in passages {
            if cell.step(direction, size).is_none() {
                return Err(LayoutError::PassageOutOfBounds { cell, direction });
            }
            maze.remove_wall_pair(cell, direction);
        }

        let total = maze.cell_count();
        let reached = DistanceField::from_source(&maze, maze.root).reached();
        if reached != total {
            return Err(LayoutError::Disconnected { reached, total });
        }
        if maze.open_passage_count() != total - 1 {
            return Err(LayoutError::Cycle);
        }

        for cell in &mut maze.cells {
            cell.visited = true;
        }
        maze.classify();
        Ok(maze)
    }

    fn walled(size: u32) -> Self {
        let root = CellCoord::new(size / 2, size / 2);
        let cells = (0..size)
            .flat_map(|x| (0..size).map(move |y| Cell::walled(CellCoord::new(x, y))))
            .collect();
        Self {
            size,
            cells,
            root,
            center_dead_end: root,
            farthest_dead_end: root,
        }
    }

    /// Marks dead ends, assigns distances from the root and picks spawn and goal.
    fn classify(&mut self) {
        let field = DistanceField::from_source(self, self.root);
        for cell in &mut self.cells {
            cell.dead_end = cell.walls.count() == 3;
            cell.distance_from_center = field.distance(cell.coord);
        }

        let mut nearest: Option<(u32, CellCoord)> = None;
        let mut farthest: Option<(u32, CellCoord)> = None;
        for cell in self.cells.iter().filter(|cell| cell.dead_end) {
            let Some(distance) = cell.distance_from_center else {
                continue;
            };
            // Strict comparisons keep the first dead end met in x-major order.
            if nearest.map_or(true, |(best, _)| distance < best) {
                nearest = Some((distance, cell.coord));
            }
            if farthest.map_or(true, |(best, _)| distance > best) {
                farthest = Some((distance, cell.coord));
            }
        }

        if let (Some((_, nearest)), Some((_, farthest))) = (nearest, farthest) {
            self.center_dead_end = nearest;
            self.farthest_dead_end = farthest;
        }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell where carving and distance computation started.
    #[must_use]
    pub const fn root(&self) -> CellCoord {
        self.root
    }

    /// Dead end with the smallest distance from the root; the spawn tile.
    #[must_use]
    pub const fn center_dead_end(&self) -> CellCoord {
        self.center_dead_end
    }

    /// Dead end with the largest distance from the root; the goal tile.
    #[must_use]
    pub const fn farthest_dead_end(&self) -> CellCoord {
        self.farthest_dead_end
    }

    /// Cell stored at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        cell_index(self.size, coord).map(|index| &self.cells[index])
    }

    /// Iterates every cell in `x`-major, then `y` order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Reports whether movement from `coord` toward `direction` is unobstructed.
    ///
    /// Cells outside the grid are treated as fully walled.
    #[must_use]
    pub fn is_open(&self, coord: CellCoord, direction: Direction) -> bool {
        self.cell(coord)
            .map_or(false, |cell| !cell.has_wall(direction))
    }

    /// Cells reachable from `coord` in one step, in north, south, east, west order.
    pub fn open_neighbors(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::SEARCH_ORDER
            .into_iter()
            .filter(move |direction| self.is_open(coord, *direction))
            .filter_map(move |direction| coord.step(direction, self.size))
    }

    /// Iterates the dead ends in grid order.
    pub fn dead_ends(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.dead_end)
            .map(Cell::coord)
    }

    /// Colour classification of a cell.
    #[must_use]
    pub fn tile_kind(&self, coord: CellCoord) -> TileKind {
        if coord == self.center_dead_end {
            TileKind::Spawn
        } else if coord == self.farthest_dead_end {
            TileKind::Goal
        } else if self.cell(coord).map_or(false, Cell::is_dead_end) {
            TileKind::Red
        } else {
            TileKind::Plain
        }
    }

    /// Dead ends that are neither spawn nor goal, in grid order.
    #[must_use]
    pub fn red_tiles(&self) -> Vec<CellCoord> {
        self.dead_ends()
            .filter(|coord| self.tile_kind(*coord) == TileKind::Red)
            .collect()
    }

    /// Number of open wall pairs; a spanning tree has one fewer than its cell count.
    #[must_use]
    pub fn open_passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                usize::from(!cell.has_wall(Direction::East) && cell.coord.x() + 1 < self.size)
                    + usize::from(
                        !cell.has_wall(Direction::South) && cell.coord.y() + 1 < self.size,
                    )
            })
            .sum()
    }

    /// Draws the maze as text, optionally marking one cell with `marker`.
    ///
    /// Spawn, goal and red tiles are drawn as `S`, `G` and `*`.
    #[must_use]
    pub fn ascii_map(&self, marker: Option<(CellCoord, char)>) -> String {
        let mut out = String::new();
        for y in 0..self.size {
            out.push('+');
            for x in 0..self.size {
                let wall = self.has_wall_at(CellCoord::new(x, y), Direction::North);
                out.push_str(if wall { "---+" } else { "   +" });
            }
            out.push('\n');

            for x in 0..self.size {
                let coord = CellCoord::new(x, y);
                out.push(if self.has_wall_at(coord, Direction::West) {
                    '|'
                } else {
                    ' '
                });
                let glyph = match marker {
                    Some((cell, marker)) if cell == coord => marker,
                    _ => match self.tile_kind(coord) {
                        TileKind::Spawn => 'S',
                        TileKind::Goal => 'G',
                        TileKind::Red => '*',
                        TileKind::Plain => ' ',
                    },
                };
                let _ = write!(out, " {glyph} ");
            }
            out.push_str("|\n");
        }
        out.push('+');
        for _ in 0..self.size {
            out.push_str("---+");
        }
        out.push('\n');
        out
    }

    fn has_wall_at(&self, coord: CellCoord, direction: Direction) -> bool {
        self.cell(coord).map_or(true, |cell| cell.has_wall(direction))
    }

    fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        cell_index(self.size, coord).map(move |index| &mut self.cells[index])
    }

    fn is_visited(&self, coord: CellCoord) -> bool {
        self.cell(coord).map_or(true, |cell| cell.visited)
    }

    fn mark_visited(&mut self, coord: CellCoord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.visited = true;
        }
    }

    /// Opens the wall between `coord` and its neighbour as a pair.
    fn remove_wall_pair(&mut self, coord: CellCoord, direction: Direction) {
        let Some(neighbor) = coord.step(direction, self.size) else {
            return;
        };
        if let Some(cell) = self.cell_mut(coord) {
            cell.walls.remove(direction);
        }
        if let Some(cell) = self.cell_mut(neighbor) {
            cell.walls.remove(direction.opposite());
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii_map(None))
    }
}

/// Reasons an explicit passage layout cannot be turned into a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The grid size itself is unsupported.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A passage leads off the edge of the grid.
    #[error("passage from {cell} heading {direction:?} leaves the grid")]
    PassageOutOfBounds {
        /// Cell the passage starts from.
        cell: CellCoord,
        /// Direction of the offending passage.
        direction: Direction,
    },
    /// Some cells cannot be reached from the root.
    #[error("layout reaches {reached} of {total} cells")]
    Disconnected {
        /// Cells reachable from the root.
        reached: usize,
        /// Cells in the grid.
        total: usize,
    },
    /// The passages close a loop.
    #[error("layout contains a cycle")]
    Cycle,
}

/// Dense `[x][y]` storage offset of `cell` in a `size × size` grid.
pub(crate) fn cell_index(size: u32, cell: CellCoord) -> Option<usize> {
    if cell.x() >= size || cell.y() >= size {
        return None;
    }
    let size = usize::try_from(size).ok()?;
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    x.checked_mul(size)?.checked_add(y)
}
