#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Chooses which red tiles receive collectibles.
//!
//! Placement runs once, after the maze is fully classified and before the
//! session is handed to the host. An empty candidate set is a legitimate
//! topology and yields no collectibles rather than an error.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;
use maze_walk_core::{
    coords, CellCoord, Collectible, CollectibleId, Direction, ObjectShape, PlacementMode, Shape,
};
use maze_walk_world::Maze;
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

/// Selects world positions for collectibles according to `mode`.
///
/// `red_tiles` lists the candidate cells, `start` is the player's spawn
/// cell. `rng` is only consulted by [`PlacementMode::Random`].
pub fn select_positions<R>(
    mode: PlacementMode,
    red_tiles: &[CellCoord],
    start: CellCoord,
    maze: &Maze,
    rng: &mut R,
) -> Vec<Vec2>
where
    R: Rng + ?Sized,
{
    let cells: Vec<CellCoord> = match mode {
        PlacementMode::All => red_tiles.to_vec(),
        PlacementMode::Random => red_tiles.choose(rng).copied().into_iter().collect(),
        PlacementMode::Closest => closest_red_tile(maze, start, red_tiles)
            .into_iter()
            .collect(),
    };

    debug!(?mode, candidates = red_tiles.len(), selected = cells.len(), "placed collectibles");
    cells
        .into_iter()
        .map(|cell| coords::world_position_of(cell, maze.size()))
        .collect()
}

/// Red tile with the fewest hops from `start` over open passages.
///
/// The search expands neighbours north, south, east, west and stops at the
/// first red tile it discovers, so ties resolve in discovery order. Returns
/// `None` when no candidate is reachable.
#[must_use]
pub fn closest_red_tile(maze: &Maze, start: CellCoord, red_tiles: &[CellCoord]) -> Option<CellCoord> {
    let targets: HashSet<CellCoord> = red_tiles.iter().copied().collect();
    if targets.is_empty() || maze.cell(start).is_none() {
        return None;
    }
    if targets.contains(&start) {
        return Some(start);
    }

    let mut seen = HashSet::from([start]);
    let mut frontier = VecDeque::from([start]);

    while let Some(cell) = frontier.pop_front() {
        for direction in Direction::SEARCH_ORDER {
            if !maze.is_open(cell, direction) {
                continue;
            }
            let Some(neighbor) = cell.step(direction, maze.size()) else {
                continue;
            };
            if !seen.insert(neighbor) {
                continue;
            }
            if targets.contains(&neighbor) {
                return Some(neighbor);
            }
            frontier.push_back(neighbor);
        }
    }

    None
}

/// Turns selected positions into collectible descriptors with shape tags.
///
/// Mixed sessions draw each collectible's shape uniformly.
pub fn place_collectibles<R>(positions: &[Vec2], shape: ObjectShape, rng: &mut R) -> Vec<Collectible>
where
    R: Rng + ?Sized,
{
    positions
        .iter()
        .zip(0u32..)
        .map(|(&position, index)| Collectible {
            id: CollectibleId::new(index),
            position,
            shape: shape.fixed().unwrap_or_else(|| random_shape(rng)),
        })
        .collect()
}

fn random_shape<R>(rng: &mut R) -> Shape
where
    R: Rng + ?Sized,
{
    Shape::ALL[rng.gen_range(0..Shape::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line() -> Maze {
        // (0,0) - (1,0) - (1,1) - (0,1)
        Maze::from_passages(
            2,
            &[
                (CellCoord::new(0, 0), Direction::East),
                (CellCoord::new(1, 0), Direction::South),
                (CellCoord::new(1, 1), Direction::West),
            ],
        )
        .expect("path layout")
    }

    #[test]
    fn empty_candidates_yield_nothing_in_every_mode() {
        let maze = line();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for mode in [PlacementMode::All, PlacementMode::Random, PlacementMode::Closest] {
            assert!(select_positions(mode, &[], CellCoord::new(0, 1), &maze, &mut rng).is_empty());
        }
    }

    #[test]
    fn closest_search_counts_hops_not_euclidean_distance() {
        let maze = line();
        // (0,0) is adjacent to (0,1) geometrically but three hops away.
        let red = [CellCoord::new(0, 0), CellCoord::new(1, 1)];
        assert_eq!(
            closest_red_tile(&maze, CellCoord::new(0, 1), &red),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn closest_search_accepts_the_start_cell() {
        let maze = line();
        let red = [CellCoord::new(0, 1)];
        assert_eq!(closest_red_tile(&maze, CellCoord::new(0, 1), &red), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn fixed_shapes_are_applied_to_every_collectible() {
        let positions = [Vec2::new(1.0, 1.0), Vec2::new(-1.0, 3.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let placed = place_collectibles(&positions, ObjectShape::Sphere, &mut rng);

        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|collectible| collectible.shape == Shape::Sphere));
        assert_eq!(placed[1].id, CollectibleId::new(1));
        assert_eq!(placed[1].position, positions[1]);
    }

    #[test]
    fn mixed_shapes_draw_from_every_kind() {
        let positions = vec![Vec2::ZERO; 64];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let placed = place_collectibles(&positions, ObjectShape::Mixed, &mut rng);

        for shape in Shape::ALL {
            assert!(placed.iter().any(|collectible| collectible.shape == shape));
        }
    }
}
