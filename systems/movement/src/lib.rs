#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discrete movement and rotation controller driven by wall-clock time.
//!
//! The player rests on cell centres facing one of four cardinal directions.
//! Inputs start one of two mutually exclusive animations: a step of one cell
//! along the facing axis, or a quarter turn. Animations interpolate linearly
//! over fixed durations and always run to completion, after which position
//! and rotation snap to their exact targets.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use glam::Vec2;
use maze_walk_core::{
    coords::{self, CELL_SPAN},
    CellCoord, Direction, Event, Input, MOVE_DURATION, ROTATION_DURATION,
};
use maze_walk_world::Maze;
use tracing::trace;

/// Player position and orientation state machine.
#[derive(Clone, Debug)]
pub struct Movement {
    size: u32,
    position: Vec2,
    quarter_turns: i32,
    motion: Option<Motion>,
    turn: Option<Turn>,
}

impl Movement {
    /// Places the player at rest on `cell`, facing `heading`.
    #[must_use]
    pub fn new(size: u32, cell: CellCoord, heading: Direction) -> Self {
        Self {
            size,
            position: coords::world_position_of(cell, size),
            quarter_turns: heading.quarter_turns(),
            motion: None,
            turn: None,
        }
    }

    /// Places the player on the spawn tile, facing its single open side.
    #[must_use]
    pub fn spawn(maze: &Maze) -> Self {
        let spawn = maze.center_dead_end();
        let heading = maze
            .cell(spawn)
            .and_then(|cell| cell.open_side())
            .unwrap_or(Direction::North);
        Self::new(maze.size(), spawn, heading)
    }

    /// Current world-space ground position, interpolated while moving.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current rotation in radians, interpolated while turning.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        match &self.turn {
            Some(turn) => {
                let from = turn.from as f32 * FRAC_PI_2;
                let to = turn.to as f32 * FRAC_PI_2;
                from + (to - from) * turn.fraction()
            }
            None => self.quarter_turns as f32 * FRAC_PI_2,
        }
    }

    /// Resting cardinal heading; only changes once a turn completes.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        Direction::from_quarter_turns(self.quarter_turns)
    }

    /// Cell nearest to the current position, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self) -> Option<CellCoord> {
        coords::cell_at(self.position, self.size)
    }

    /// Reports whether a step animation is in progress.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Reports whether a turn animation is in progress.
    #[must_use]
    pub const fn is_rotating(&self) -> bool {
        self.turn.is_some()
    }

    /// Reports whether any animation blocks new input.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.is_moving() || self.is_rotating()
    }

    /// Reports whether the cell under the player is open toward `direction`.
    ///
    /// Positions outside the grid can never move.
    #[must_use]
    pub fn can_move(&self, maze: &Maze, direction: Direction) -> bool {
        self.cell()
            .map_or(false, |cell| maze.is_open(cell, direction))
    }

    /// Starts the animation requested by `input`.
    ///
    /// Returns `false` without touching any state when an animation is already
    /// running or a wall blocks the requested step.
    pub fn request(&mut self, input: Input, maze: &Maze) -> bool {
        if self.is_busy() {
            trace!(?input, "input ignored while animating");
            return false;
        }

        match input {
            Input::MoveForward => self.start_motion(self.heading(), maze),
            Input::MoveBackward => self.start_motion(self.heading().opposite(), maze),
            Input::RotateLeft => self.start_turn(1),
            Input::RotateRight => self.start_turn(-1),
        }
    }

    fn start_motion(&mut self, direction: Direction, maze: &Maze) -> bool {
        if !self.can_move(maze, direction) {
            trace!(?direction, "step blocked by wall");
            return false;
        }

        self.motion = Some(Motion {
            from: self.position,
            to: self.position + direction.world_step() * CELL_SPAN,
            elapsed: Duration::ZERO,
        });
        true
    }

    fn start_turn(&mut self, quarters: i32) -> bool {
        self.turn = Some(Turn {
            from: self.quarter_turns,
            to: self.quarter_turns + quarters,
            elapsed: Duration::ZERO,
        });
        true
    }

    /// Advances running animations by `dt` of wall-clock time.
    ///
    /// Emits [`Event::CompassChanged`] when a turn completes.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if let Some(motion) = &mut self.motion {
            motion.elapsed = motion.elapsed.saturating_add(dt);
            if motion.is_complete() {
                self.position = motion.to;
                self.motion = None;
            } else {
                self.position = motion.from.lerp(motion.to, motion.fraction());
            }
        }

        if let Some(turn) = &mut self.turn {
            turn.elapsed = turn.elapsed.saturating_add(dt);
            if turn.is_complete() {
                self.quarter_turns = Direction::from_quarter_turns(turn.to).quarter_turns();
                self.turn = None;
                out.push(Event::CompassChanged {
                    heading: self.heading(),
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Motion {
    from: Vec2,
    to: Vec2,
    elapsed: Duration,
}

impl Motion {
    fn fraction(&self) -> f32 {
        fraction(self.elapsed, MOVE_DURATION)
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= MOVE_DURATION
    }
}

#[derive(Clone, Copy, Debug)]
struct Turn {
    from: i32,
    to: i32,
    elapsed: Duration,
}

impl Turn {
    fn fraction(&self) -> f32 {
        fraction(self.elapsed, ROTATION_DURATION)
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= ROTATION_DURATION
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}
