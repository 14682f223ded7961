use std::collections::VecDeque;

use maze_walk_core::{CellCoord, ConfigError, Direction, TileKind};
use maze_walk_world::Maze;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEEDS: [u64; 6] = [0, 1, 7, 0x5eed, 0xdead_beef, 0x42f0_e1eb_d4a5_3c21];

fn generate(size: u32, seed: u64) -> Maze {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Maze::generate(size, &mut rng).expect("size within bounds")
}

fn reachable_from(maze: &Maze, start: CellCoord) -> usize {
    let mut seen = vec![start];
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for neighbor in maze.open_neighbors(cell) {
            if !seen.contains(&neighbor) {
                seen.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }
    seen.len()
}

#[test]
fn generated_mazes_are_spanning_trees() {
    for size in [2, 3, 5, 8, 13] {
        for seed in SEEDS {
            let maze = generate(size, seed);
            let cells = (size * size) as usize;

            assert_eq!(maze.cell_count(), cells);
            assert_eq!(
                maze.open_passage_count(),
                cells - 1,
                "size {size} seed {seed:#x} is not a tree"
            );
            assert_eq!(reachable_from(&maze, CellCoord::new(0, 0)), cells);
            assert_eq!(reachable_from(&maze, CellCoord::new(size - 1, size - 1)), cells);
        }
    }
}

#[test]
fn walls_are_removed_in_pairs() {
    for seed in SEEDS {
        let maze = generate(9, seed);
        for cell in maze.cells() {
            for direction in Direction::SEARCH_ORDER {
                let Some(neighbor) = cell.coord().step(direction, maze.size()) else {
                    assert!(cell.has_wall(direction), "border wall missing at {}", cell.coord());
                    continue;
                };
                let facing_back = maze
                    .cell(neighbor)
                    .expect("neighbor inside grid")
                    .has_wall(direction.opposite());
                assert_eq!(cell.has_wall(direction), facing_back);
            }
        }
    }
}

#[test]
fn dead_ends_are_leaves_and_spawn_differs_from_goal() {
    for size in [2, 4, 8] {
        for seed in SEEDS {
            let maze = generate(size, seed);
            let leaves = maze
                .cells()
                .filter(|cell| maze.open_neighbors(cell.coord()).count() == 1)
                .count();

            assert_eq!(maze.dead_ends().count(), leaves);
            assert!(leaves >= 2, "size {size} seed {seed:#x} has {leaves} leaves");
            assert_ne!(maze.center_dead_end(), maze.farthest_dead_end());
            assert_eq!(maze.tile_kind(maze.center_dead_end()), TileKind::Spawn);
            assert_eq!(maze.tile_kind(maze.farthest_dead_end()), TileKind::Goal);
        }
    }
}

#[test]
fn two_by_two_maze_is_a_path_with_two_ends() {
    for seed in SEEDS {
        let maze = generate(2, seed);
        assert_eq!(maze.root(), CellCoord::new(1, 1));
        assert_eq!(maze.dead_ends().count(), 2);
        assert!(maze.red_tiles().is_empty());
    }
}

#[test]
fn distances_follow_the_tree_from_the_root() {
    let maze = generate(10, 99);
    let root = maze.cell(maze.root()).expect("root inside grid");
    assert_eq!(root.distance_from_center(), Some(0));

    for cell in maze.cells() {
        let distance = cell.distance_from_center().expect("every cell is reachable");
        if cell.coord() == maze.root() {
            continue;
        }
        // In a tree exactly one neighbour lies one hop closer to the root.
        let closer = maze
            .open_neighbors(cell.coord())
            .filter_map(|neighbor| maze.cell(neighbor))
            .filter(|neighbor| neighbor.distance_from_center() == Some(distance - 1))
            .count();
        assert_eq!(closer, 1, "cell {} has {closer} parents", cell.coord());
    }
}

#[test]
fn spawn_and_goal_are_extreme_dead_ends() {
    for seed in SEEDS {
        let maze = generate(8, seed);
        let distance = |coord: CellCoord| {
            maze.cell(coord)
                .and_then(|cell| cell.distance_from_center())
                .expect("distance computed")
        };
        let spawn = distance(maze.center_dead_end());
        let goal = distance(maze.farthest_dead_end());

        for dead_end in maze.dead_ends() {
            assert!(spawn <= distance(dead_end));
            assert!(goal >= distance(dead_end));
        }
    }
}

#[test]
fn different_seeds_yield_different_mazes() {
    let first = generate(12, 1).to_string();
    let second = generate(12, 2).to_string();
    assert_ne!(first, second);
    assert_eq!(first, generate(12, 1).to_string());
}

#[test]
fn invalid_sizes_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(matches!(
        Maze::generate(1, &mut rng),
        Err(ConfigError::MazeTooSmall { size: 1, .. })
    ));
    assert!(matches!(
        Maze::generate(0, &mut rng),
        Err(ConfigError::MazeTooSmall { size: 0, .. })
    ));
    assert!(matches!(
        Maze::generate(5000, &mut rng),
        Err(ConfigError::MazeTooLarge { .. })
    ));
}
