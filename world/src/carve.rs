//! Randomized depth-first carving ("recursive backtracker").
//!
//! The recursion is unrolled onto an explicit stack of frames. Each frame
//! holds the neighbour list shuffled when its cell was entered plus a cursor,
//! so siblings are tried in exactly the order the recursive formulation would
//! try them while maze size stays independent of call-stack depth.

use maze_walk_core::{CellCoord, Direction};
use rand::{seq::SliceRandom, Rng};

use crate::Maze;

#[derive(Debug)]
struct Frame {
    cell: CellCoord,
    neighbors: Vec<(Direction, CellCoord)>,
    cursor: usize,
}

/// Carves a spanning tree into a fully walled maze, starting at its root.
pub(crate) fn carve<R>(maze: &mut Maze, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let root = maze.root();
    maze.mark_visited(root);
    let mut stack = vec![enter(maze, root, rng)];

    while let Some(frame) = stack.last_mut() {
        let Some(&(direction, next)) = frame.neighbors.get(frame.cursor) else {
            let _ = stack.pop();
            continue;
        };
        frame.cursor += 1;
        let from = frame.cell;

        // Siblings shuffled on entry may have been reached through a deeper branch.
        if maze.is_visited(next) {
            continue;
        }

        maze.remove_wall_pair(from, direction);
        maze.mark_visited(next);
        stack.push(enter(maze, next, rng));
    }
}

fn enter<R>(maze: &Maze, cell: CellCoord, rng: &mut R) -> Frame
where
    R: Rng + ?Sized,
{
    let mut neighbors: Vec<_> = Direction::SEARCH_ORDER
        .into_iter()
        .filter_map(|direction| {
            cell.step(direction, maze.size())
                .filter(|neighbor| !maze.is_visited(*neighbor))
                .map(|neighbor| (direction, neighbor))
        })
        .collect();
    neighbors.shuffle(rng);

    Frame {
        cell,
        neighbors,
        cursor: 0,
    }
}
