#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration for a single maze run.
//!
//! A session owns the generated maze, the player's movement state and the
//! scoring evaluator. Hosts drive it exclusively through [`apply`] and read
//! it back through [`query`].

use maze_walk_core::{Command, ConfigError, Event, Input, Outcome, SessionConfig, WELCOME_BANNER};
use maze_walk_system_movement::Movement;
use maze_walk_system_placement::{place_collectibles, select_positions};
use maze_walk_system_scoring::Scoring;
pub use maze_walk_system_scoring::Tally;
use maze_walk_world::Maze;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

/// A running game: maze, player and tally.
#[derive(Debug)]
pub struct Session {
    banner: &'static str,
    config: SessionConfig,
    maze: Maze,
    movement: Movement,
    scoring: Scoring,
    suspended: bool,
    tick_index: u64,
}

impl Session {
    /// Validates `config`, generates the maze and places the player and collectibles.
    ///
    /// Uses the configured seed when present, fresh entropy otherwise.
    pub fn start(config: SessionConfig) -> Result<Self, ConfigError> {
        match config.seed {
            Some(seed) => Self::start_with_rng(config, &mut ChaCha8Rng::seed_from_u64(seed)),
            None => Self::start_with_rng(config, &mut ChaCha8Rng::from_entropy()),
        }
    }

    /// Starts a session drawing every random decision from `rng`.
    pub fn start_with_rng<R>(config: SessionConfig, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;

        let maze = Maze::generate(config.maze_size, rng)?;
        let spawn = maze.center_dead_end();
        let red_tiles = maze.red_tiles();
        let positions = select_positions(config.placement_mode, &red_tiles, spawn, &maze, rng);
        let collectibles = place_collectibles(&positions, config.object_shape, rng);
        let scoring = Scoring::from_config(&config, maze.farthest_dead_end(), collectibles);
        let movement = Movement::spawn(&maze);

        info!(
            size = config.maze_size,
            spawn = %spawn,
            goal = %maze.farthest_dead_end(),
            collectibles = scoring.collectibles().len(),
            timed = config.timed,
            "session started"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            maze,
            movement,
            scoring,
            suspended: false,
            tick_index: 0,
        })
    }

    /// Events a host should process before the first frame: initial compass and tally.
    #[must_use]
    pub fn opening_events(&self) -> Vec<Event> {
        vec![
            Event::CompassChanged {
                heading: self.movement.heading(),
            },
            self.scoring.tally_event(),
        ]
    }

    /// Tears the session down, returning its outcome if one was reached.
    pub fn dispose(self) -> Option<Outcome> {
        info!(
            outcome = ?self.scoring.outcome(),
            ticks = self.tick_index,
            "session disposed"
        );
        self.scoring.outcome()
    }

    fn suspend(&mut self, out_events: &mut Vec<Event>) {
        self.suspended = true;
        self.scoring.pause_timer();
        debug!("session suspended");
        out_events.push(Event::Suspended);
    }
}

/// Applies a command to the session, appending any resulting events.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Input { input } => handle_input(session, input),
        Command::Tick { dt } => {
            if session.suspended {
                return;
            }
            session.tick_index = session.tick_index.saturating_add(1);
            session.movement.advance(dt, out_events);

            let evaluation = session
                .scoring
                .evaluate(session.movement.position(), out_events);
            if evaluation.collected > 0
                && session.config.pause_on_collect
                && !session.scoring.is_over()
            {
                session.suspend(out_events);
            }
        }
        Command::SecondElapsed => {
            if session.suspended {
                return;
            }
            let _ = session.scoring.second_elapsed(out_events);
        }
        Command::Resume => {
            if !session.suspended {
                return;
            }
            session.suspended = false;
            session.scoring.resume_timer();
            debug!("session resumed");
            out_events.push(Event::Resumed);
        }
    }
}

fn handle_input(session: &mut Session, input: Input) {
    if session.suspended || session.scoring.is_over() {
        trace!(?input, "input ignored outside of play");
        return;
    }
    let _ = session.movement.request(input, &session.maze);
}

/// Read-only accessors over a [`Session`].
pub mod query {
    use glam::Vec2;
    use maze_walk_core::{CellCoord, Collectible, Direction, Outcome, SessionConfig};
    use maze_walk_world::Maze;

    use super::{Session, Tally};

    /// Greeting shown when the session starts.
    #[must_use]
    pub fn welcome_banner(session: &Session) -> &'static str {
        session.banner
    }

    /// Configuration the session was started with.
    #[must_use]
    pub fn config(session: &Session) -> &SessionConfig {
        &session.config
    }

    /// The generated maze.
    #[must_use]
    pub fn maze(session: &Session) -> &Maze {
        &session.maze
    }

    /// Player position on the ground plane, possibly mid-animation.
    #[must_use]
    pub fn player_position(session: &Session) -> Vec2 {
        session.movement.position()
    }

    /// Player yaw in radians, possibly mid-animation.
    #[must_use]
    pub fn player_rotation(session: &Session) -> f32 {
        session.movement.rotation()
    }

    /// Heading of the last completed rotation.
    #[must_use]
    pub fn heading(session: &Session) -> Direction {
        session.movement.heading()
    }

    /// Cell currently containing the player.
    #[must_use]
    pub fn player_cell(session: &Session) -> Option<CellCoord> {
        session.movement.cell()
    }

    /// Reports whether a move or rotation animation is in flight.
    #[must_use]
    pub fn is_animating(session: &Session) -> bool {
        session.movement.is_busy()
    }

    /// Collectibles still present in the maze.
    #[must_use]
    pub fn collectibles(session: &Session) -> &[Collectible] {
        session.scoring.collectibles()
    }

    /// Current score or countdown.
    #[must_use]
    pub fn tally(session: &Session) -> Tally {
        session.scoring.tally()
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub fn outcome(session: &Session) -> Option<Outcome> {
        session.scoring.outcome()
    }

    /// Reports whether the session waits for [`maze_walk_core::Command::Resume`].
    #[must_use]
    pub fn is_suspended(session: &Session) -> bool {
        session.suspended
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(session: &Session) -> u64 {
        session.tick_index
    }
}
