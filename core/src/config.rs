//! Immutable per-session configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Shape;

/// Smallest maze edge length that still yields distinct spawn and goal tiles.
pub const MIN_MAZE_SIZE: u32 = 2;

/// Largest accepted maze edge length.
pub const MAX_MAZE_SIZE: u32 = 1024;

/// Policy used to choose which red tiles receive collectibles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Every red tile.
    #[default]
    All,
    /// One red tile drawn uniformly at random.
    Random,
    /// The red tile with the fewest hops from the spawn cell.
    Closest,
}

/// Shape selection for placed collectibles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectShape {
    /// Each collectible draws its own shape at random.
    #[default]
    Mixed,
    /// Every collectible is a pyramid.
    Pyramid,
    /// Every collectible is a sphere.
    Sphere,
    /// Every collectible is a cylinder.
    Cylinder,
    /// Every collectible is a cube.
    Cube,
}

impl ObjectShape {
    /// Shape shared by every collectible, or `None` for mixed sessions.
    #[must_use]
    pub const fn fixed(self) -> Option<Shape> {
        match self {
            Self::Mixed => None,
            Self::Pyramid => Some(Shape::Pyramid),
            Self::Sphere => Some(Shape::Sphere),
            Self::Cylinder => Some(Shape::Cylinder),
            Self::Cube => Some(Shape::Cube),
        }
    }
}

/// Settings fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Policy used to place collectibles on red tiles.
    pub placement_mode: PlacementMode,
    /// Number of cells along each edge of the square maze.
    pub maze_size: u32,
    /// Whether the session runs a countdown instead of keeping score.
    pub timed: bool,
    /// Starting countdown, in seconds, for timed sessions.
    pub initial_time: u32,
    /// Seconds added to the countdown per collected object.
    pub time_bonus: u32,
    /// Shape selection for placed collectibles.
    pub object_shape: ObjectShape,
    /// Suspend the session after each collection until it is resumed.
    pub pause_on_collect: bool,
    /// Seed for maze and placement randomness; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            placement_mode: PlacementMode::All,
            maze_size: 8,
            timed: false,
            initial_time: 60,
            time_bonus: 10,
            object_shape: ObjectShape::Mixed,
            pause_on_collect: false,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Checks every field that cannot be repaired once a session is running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_maze_size(self.maze_size)?;
        if self.timed && self.initial_time == 0 {
            return Err(ConfigError::ZeroInitialTime);
        }
        Ok(())
    }
}

/// Rejects maze sizes the generator does not support.
pub fn validate_maze_size(size: u32) -> Result<(), ConfigError> {
    if size < MIN_MAZE_SIZE {
        return Err(ConfigError::MazeTooSmall {
            size,
            min: MIN_MAZE_SIZE,
        });
    }
    if size > MAX_MAZE_SIZE {
        return Err(ConfigError::MazeTooLarge {
            size,
            max: MAX_MAZE_SIZE,
        });
    }
    Ok(())
}

/// Configuration problems reported synchronously at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The maze is too small to hold distinct spawn and goal tiles.
    #[error("maze size {size} is below the minimum of {min}")]
    MazeTooSmall {
        /// Requested edge length.
        size: u32,
        /// Smallest supported edge length.
        min: u32,
    },
    /// The maze exceeds the supported edge length.
    #[error("maze size {size} exceeds the maximum of {max}")]
    MazeTooLarge {
        /// Requested edge length.
        size: u32,
        /// Largest supported edge length.
        max: u32,
    },
    /// Timed sessions must start with time on the clock.
    #[error("timed sessions require a positive initial time")]
    ZeroInitialTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn size_bounds_are_enforced() {
        assert_eq!(
            validate_maze_size(1),
            Err(ConfigError::MazeTooSmall { size: 1, min: 2 })
        );
        assert_eq!(
            validate_maze_size(0),
            Err(ConfigError::MazeTooSmall { size: 0, min: 2 })
        );
        assert_eq!(validate_maze_size(2), Ok(()));
        assert_eq!(validate_maze_size(MAX_MAZE_SIZE), Ok(()));
        assert!(matches!(
            validate_maze_size(MAX_MAZE_SIZE + 1),
            Err(ConfigError::MazeTooLarge { .. })
        ));
    }

    #[test]
    fn timed_sessions_need_time_on_the_clock() {
        let config = SessionConfig {
            timed: true,
            initial_time: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInitialTime));

        let untimed = SessionConfig {
            initial_time: 0,
            ..SessionConfig::default()
        };
        assert_eq!(untimed.validate(), Ok(()));
    }

    #[test]
    fn fixed_shape_collapses_mixed() {
        assert_eq!(ObjectShape::Mixed.fixed(), None);
        assert_eq!(ObjectShape::Cube.fixed(), Some(Shape::Cube));
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = SessionConfig {
            placement_mode: PlacementMode::Closest,
            timed: true,
            seed: Some(0x5eed),
            ..SessionConfig::default()
        };
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: SessionConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }
}
