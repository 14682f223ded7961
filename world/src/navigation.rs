//! Breadth-first hop distances over the wall-permeability graph.

use std::collections::VecDeque;

use maze_walk_core::{CellCoord, Direction};

use crate::Maze;

/// Dense hop-count grid rooted at a single source cell.
///
/// Cells the search never reached keep `None`, which lets callers tell an
/// unreachable cell apart from the source itself.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    size: u32,
    distances: Vec<Option<u32>>,
}

impl DistanceField {
    /// Runs the search from `source`, following only open wall pairs.
    pub(crate) fn from_source(maze: &Maze, source: CellCoord) -> Self {
        let size = maze.size();
        let mut field = Self {
            size,
            distances: vec![None; maze.cell_count()],
        };

        let Some(source_index) = field.index(source) else {
            return field;
        };
        field.distances[source_index] = Some(0);

        let mut queue = VecDeque::new();
        queue.push_back((source, 0u32));

        while let Some((cell, distance)) = queue.pop_front() {
            for direction in Direction::SEARCH_ORDER {
                if !maze.is_open(cell, direction) {
                    continue;
                }
                let Some(neighbor) = cell.step(direction, size) else {
                    continue;
                };
                let Some(neighbor_index) = field.index(neighbor) else {
                    continue;
                };
                if field.distances[neighbor_index].is_some() {
                    continue;
                }

                field.distances[neighbor_index] = Some(distance + 1);
                queue.push_back((neighbor, distance + 1));
            }
        }

        field
    }

    /// Hop count from the source, or `None` when unreachable or out of bounds.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell).and_then(|index| self.distances[index])
    }

    /// Number of cells the search reached, including the source.
    #[must_use]
    pub(crate) fn reached(&self) -> usize {
        self.distances.iter().filter(|distance| distance.is_some()).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        crate::cell_index(self.size, cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor(size: u32) -> Maze {
        let passages: Vec<_> = (0..size)
            .flat_map(|x| (0..size - 1).map(move |y| (CellCoord::new(x, y), Direction::South)))
            .chain((0..size - 1).map(|x| (CellCoord::new(x, 0), Direction::East)))
            .collect();
        Maze::from_passages(size, &passages).expect("comb layout is a spanning tree")
    }

    #[test]
    fn source_is_distance_zero() {
        let maze = corridor(3);
        let field = DistanceField::from_source(&maze, CellCoord::new(1, 2));

        assert_eq!(field.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(field.distance(CellCoord::new(0, 0)), Some(3));
        assert_eq!(field.distance(CellCoord::new(0, 2)), Some(5));
        assert_eq!(field.reached(), 9);
    }

    #[test]
    fn walls_block_the_search() {
        let maze = corridor(3);
        let field = DistanceField::from_source(&maze, CellCoord::new(0, 2));

        // (0, 2) and (1, 2) are adjacent but separated by a wall.
        assert_eq!(field.distance(CellCoord::new(1, 2)), Some(5));
        assert_eq!(field.distance(CellCoord::new(5, 5)), None);
    }
}
