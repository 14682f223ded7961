#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Walk engine.
//!
//! This crate defines the message surface that connects adapters, the maze,
//! and the pure gameplay systems. Adapters submit [`Command`] values for
//! player input and clock progression, the session executes those commands
//! via its `apply` entry point, and then reports [`Event`] values describing
//! what the UI collaborator should present. Every crossing between grid and
//! world space goes through [`coords`].

use std::{
    f32::consts::{FRAC_PI_2, PI},
    fmt,
    time::Duration,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod coords;

pub use config::{ConfigError, ObjectShape, PlacementMode, SessionConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Walk.";

/// Wall-clock time a single forward or backward step takes to animate.
pub const MOVE_DURATION: Duration = Duration::from_millis(500);

/// Wall-clock time a quarter turn takes to animate.
pub const ROTATION_DURATION: Duration = Duration::from_millis(300);

/// Player-to-collectible distance, in world units, below which a collectible is consumed.
pub const COLLECT_RADIUS: f32 = 0.8;

/// Logical player inputs, independent of the device that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    /// Advance one cell along the facing direction.
    MoveForward,
    /// Retreat one cell against the facing direction.
    MoveBackward,
    /// Turn a quarter turn counter-clockwise (+π/2).
    RotateLeft,
    /// Turn a quarter turn clockwise (−π/2).
    RotateRight,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Player input routed from keyboard, on-screen buttons or touch.
    Input {
        /// Logical input that was triggered.
        input: Input,
    },
    /// Advances animations and evaluates collisions once per rendered frame.
    Tick {
        /// Wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Fired by the host's one-second interval, independent of frame rate.
    SecondElapsed,
    /// Dismisses the collection modal and resumes real-time progression.
    Resume,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The resting facing direction changed after a rotation completed.
    CompassChanged {
        /// Cardinal direction the player now faces.
        heading: Direction,
    },
    /// Score changed in untimed sessions.
    ScoreChanged {
        /// Collectibles consumed so far.
        score: u32,
    },
    /// Remaining time changed in timed sessions.
    TimeChanged {
        /// Whole seconds left on the countdown.
        remaining: u32,
    },
    /// A collectible was consumed by the player.
    CollectibleCollected {
        /// Identifier of the consumed collectible.
        collectible: CollectibleId,
        /// Shape the collectible was rendered with.
        shape: Shape,
    },
    /// The player reached the goal tile.
    GameWon,
    /// The countdown reached zero before the goal was reached.
    GameOverByTimeout,
    /// Real-time progression halted until [`Command::Resume`] arrives.
    Suspended,
    /// Real-time progression resumed.
    Resumed,
}

/// Cardinal directions used for walls, movement and the compass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y` (world `-z`).
    #[default]
    North,
    /// Toward increasing `x` (world `+x`).
    East,
    /// Toward increasing `y` (world `+z`).
    South,
    /// Toward decreasing `x` (world `-x`).
    West,
}

impl Direction {
    /// Neighbour visiting order used by every breadth-first search over the maze.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Resting rotation, in radians, of a player facing this direction.
    ///
    /// North is `0`, west `π/2`, south `π` and east `−π/2`.
    #[must_use]
    pub fn rotation(self) -> f32 {
        match self {
            Self::North => 0.0,
            Self::West => FRAC_PI_2,
            Self::South => PI,
            Self::East => -FRAC_PI_2,
        }
    }

    /// Number of counter-clockwise quarter turns from north.
    #[must_use]
    pub const fn quarter_turns(self) -> i32 {
        match self {
            Self::North => 0,
            Self::West => 1,
            Self::South => 2,
            Self::East => -1,
        }
    }

    /// Cardinal direction reached after `quarters` counter-clockwise quarter turns from north.
    #[must_use]
    pub const fn from_quarter_turns(quarters: i32) -> Self {
        match quarters.rem_euclid(4) {
            0 => Self::North,
            1 => Self::West,
            2 => Self::South,
            _ => Self::East,
        }
    }

    /// Unit step along this direction in world space (`x`, `z`).
    #[must_use]
    pub fn world_step(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }

    /// Single-letter compass label.
    #[must_use]
    pub const fn label(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }
}

/// Location of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Adjacent cell in `direction`, if it lies inside a `size × size` grid.
    #[must_use]
    pub fn step(self, direction: Direction, size: u32) -> Option<Self> {
        let (x, y) = match direction {
            Direction::North => (Some(self.x), self.y.checked_sub(1)),
            Direction::South => (Some(self.x), self.y.checked_add(1)),
            Direction::East => (self.x.checked_add(1), Some(self.y)),
            Direction::West => (self.x.checked_sub(1), Some(self.y)),
        };
        match (x, y) {
            (Some(x), Some(y)) if x < size && y < size => Some(Self::new(x, y)),
            _ => None,
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier assigned to a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleId(u32);

impl CollectibleId {
    /// Creates a new collectible identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Concrete shape of a placed collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Four-sided pyramid.
    Pyramid,
    /// Sphere.
    Sphere,
    /// Upright cylinder.
    Cylinder,
    /// Cube.
    Cube,
}

impl Shape {
    /// Every concrete shape, in the order mixed sessions draw from.
    pub const ALL: [Shape; 4] = [Shape::Pyramid, Shape::Sphere, Shape::Cylinder, Shape::Cube];
}

/// Placed collectible descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    /// Identifier allocated at placement time.
    pub id: CollectibleId,
    /// World-space ground position (`x`, `z`).
    pub position: Vec2,
    /// Shape tag used by renderers and reported on collection.
    pub shape: Shape,
}

/// Classification of a maze cell for tile colouring and placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Dead end nearest to the generation root; the player spawns here (blue).
    Spawn,
    /// Dead end farthest from the generation root; reaching it wins (green).
    Goal,
    /// Any other dead end; eligible for collectibles (red).
    Red,
    /// Corridor or junction cell.
    Plain,
}

/// Terminal state reached by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player reached the goal tile.
    Won,
    /// The countdown expired first.
    TimedOut,
}
