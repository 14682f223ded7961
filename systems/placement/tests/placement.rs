use maze_walk_core::{coords, CellCoord, Direction, PlacementMode};
use maze_walk_system_placement::{closest_red_tile, select_positions};
use maze_walk_world::Maze;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SIZE: u32 = 8;
const START: CellCoord = CellCoord::new(4, 2);
const NEAR_BY_HOPS: CellCoord = CellCoord::new(4, 5);
const NEAR_BY_SIGHT: CellCoord = CellCoord::new(5, 2);

/// Comb layout: the top row is a corridor and every column hangs below it.
///
/// Column 4 is cut below (4,5) and column 5 below (5,2); the detached cells
/// are reattached sideways so the layout stays a spanning tree. From (4,2),
/// (4,5) is three hops away while (5,2), right next door, takes five.
fn fixture() -> Maze {
    let mut passages = Vec::new();
    for x in 0..SIZE - 1 {
        passages.push((CellCoord::new(x, 0), Direction::East));
    }
    for x in 0..SIZE {
        for y in 0..SIZE - 1 {
            let cut = (x == 4 && (y == 5 || y == 6)) || (x == 5 && y == 2);
            if !cut {
                passages.push((CellCoord::new(x, y), Direction::South));
            }
        }
    }
    passages.push((CellCoord::new(3, 6), Direction::East));
    passages.push((CellCoord::new(3, 7), Direction::East));
    passages.push((CellCoord::new(5, 3), Direction::East));

    Maze::from_passages(SIZE, &passages).expect("fixture is a spanning tree")
}

#[test]
fn fixture_candidates_are_dead_ends() {
    let maze = fixture();
    let dead_ends: Vec<_> = maze.dead_ends().collect();
    assert!(dead_ends.contains(&NEAR_BY_HOPS));
    assert!(dead_ends.contains(&NEAR_BY_SIGHT));
}

#[test]
fn closest_prefers_fewer_hops() {
    let maze = fixture();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    for red in [[NEAR_BY_SIGHT, NEAR_BY_HOPS], [NEAR_BY_HOPS, NEAR_BY_SIGHT]] {
        assert_eq!(closest_red_tile(&maze, START, &red), Some(NEAR_BY_HOPS));

        let positions = select_positions(PlacementMode::Closest, &red, START, &maze, &mut rng);
        assert_eq!(positions, vec![coords::world_position_of(NEAR_BY_HOPS, SIZE)]);
    }
}

#[test]
fn closest_falls_back_to_the_longer_route() {
    let maze = fixture();
    assert_eq!(
        closest_red_tile(&maze, START, &[NEAR_BY_SIGHT]),
        Some(NEAR_BY_SIGHT)
    );
}

#[test]
fn all_mode_places_on_every_red_tile() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xabc);
    let maze = Maze::generate(10, &mut rng).expect("valid size");
    let red = maze.red_tiles();

    let positions = select_positions(
        PlacementMode::All,
        &red,
        maze.center_dead_end(),
        &maze,
        &mut rng,
    );

    assert_eq!(positions.len(), red.len());
    for (position, cell) in positions.iter().zip(&red) {
        assert_eq!(coords::cell_at(*position, maze.size()), Some(*cell));
    }
}

#[test]
fn random_mode_places_exactly_one_candidate() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xabc);
    let maze = Maze::generate(10, &mut rng).expect("valid size");
    let red = maze.red_tiles();
    assert!(!red.is_empty());

    let mut picks = Vec::new();
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let positions = select_positions(
            PlacementMode::Random,
            &red,
            maze.center_dead_end(),
            &maze,
            &mut rng,
        );
        assert_eq!(positions.len(), 1);
        let cell = coords::cell_at(positions[0], maze.size()).expect("inside grid");
        assert!(red.contains(&cell));
        picks.push(cell);
    }

    picks.sort();
    picks.dedup();
    assert!(picks.len() > 1, "random placement always picked the same tile");
}
