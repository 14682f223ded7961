#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score, countdown and win-condition evaluation.
//!
//! Untimed sessions keep a score; timed sessions keep a countdown instead.
//! Both end in a set-once [`Outcome`]. Once an outcome is recorded every
//! entry point becomes a no-op, so terminal effects fire exactly once.

use glam::Vec2;
use maze_walk_core::{
    coords, CellCoord, Collectible, Event, Outcome, SessionConfig, COLLECT_RADIUS,
};
use tracing::{debug, info};

/// Running tally kept by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tally {
    /// Collectibles consumed so far.
    Score(u32),
    /// Whole seconds left before the session times out.
    Countdown(u32),
}

/// Result of evaluating one player position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Collectibles consumed during this evaluation.
    pub collected: usize,
    /// Outcome reached during this evaluation, if any.
    pub outcome: Option<Outcome>,
}

/// Game-state evaluator for one session.
#[derive(Clone, Debug)]
pub struct Scoring {
    size: u32,
    goal: CellCoord,
    tally: Tally,
    time_bonus: u32,
    timer_paused: bool,
    collectibles: Vec<Collectible>,
    outcome: Option<Outcome>,
}

impl Scoring {
    /// Creates an untimed evaluator that counts collected objects.
    #[must_use]
    pub fn untimed(size: u32, goal: CellCoord, collectibles: Vec<Collectible>) -> Self {
        Self {
            size,
            goal,
            tally: Tally::Score(0),
            time_bonus: 0,
            timer_paused: false,
            collectibles,
            outcome: None,
        }
    }

    /// Creates a timed evaluator with a countdown and a per-collection bonus.
    #[must_use]
    pub fn timed(
        size: u32,
        goal: CellCoord,
        collectibles: Vec<Collectible>,
        initial_time: u32,
        time_bonus: u32,
    ) -> Self {
        Self {
            tally: Tally::Countdown(initial_time),
            time_bonus,
            ..Self::untimed(size, goal, collectibles)
        }
    }

    /// Creates the evaluator described by a session configuration.
    #[must_use]
    pub fn from_config(
        config: &SessionConfig,
        goal: CellCoord,
        collectibles: Vec<Collectible>,
    ) -> Self {
        if config.timed {
            Self::timed(
                config.maze_size,
                goal,
                collectibles,
                config.initial_time,
                config.time_bonus,
            )
        } else {
            Self::untimed(config.maze_size, goal, collectibles)
        }
    }

    /// Event announcing the initial tally to the UI.
    #[must_use]
    pub const fn tally_event(&self) -> Event {
        match self.tally {
            Tally::Score(score) => Event::ScoreChanged { score },
            Tally::Countdown(remaining) => Event::TimeChanged { remaining },
        }
    }

    /// Current tally.
    #[must_use]
    pub const fn tally(&self) -> Tally {
        self.tally
    }

    /// Collectibles that have not been consumed yet.
    #[must_use]
    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Holds the countdown until [`Scoring::resume_timer`] is called.
    pub fn pause_timer(&mut self) {
        self.timer_paused = true;
    }

    /// Releases a held countdown.
    pub fn resume_timer(&mut self) {
        self.timer_paused = false;
    }

    /// Consumes nearby collectibles, then checks whether the goal was reached.
    ///
    /// `position` may be mid-animation so fast steps never skip a collision.
    pub fn evaluate(&mut self, position: Vec2, out: &mut Vec<Event>) -> Evaluation {
        let mut evaluation = Evaluation::default();
        if self.is_over() {
            return evaluation;
        }

        let mut index = 0;
        while index < self.collectibles.len() {
            if self.collectibles[index].position.distance(position) < COLLECT_RADIUS {
                let collectible = self.collectibles.remove(index);
                self.consume(collectible, out);
                evaluation.collected += 1;
            } else {
                index += 1;
            }
        }

        if coords::cell_at(position, self.size) == Some(self.goal) {
            self.outcome = Some(Outcome::Won);
            evaluation.outcome = self.outcome;
            info!(goal = %self.goal, tally = ?self.tally, "goal reached");
            out.push(Event::GameWon);
        }

        evaluation
    }

    fn consume(&mut self, collectible: Collectible, out: &mut Vec<Event>) {
        debug!(id = collectible.id.get(), shape = ?collectible.shape, "collected");
        out.push(Event::CollectibleCollected {
            collectible: collectible.id,
            shape: collectible.shape,
        });

        match &mut self.tally {
            Tally::Score(score) => {
                *score = score.saturating_add(1);
                out.push(Event::ScoreChanged { score: *score });
            }
            Tally::Countdown(remaining) => {
                *remaining = remaining.saturating_add(self.time_bonus);
                out.push(Event::TimeChanged {
                    remaining: *remaining,
                });
            }
        }
    }

    /// Decrements the countdown once; fired by the host's one-second interval.
    ///
    /// Does nothing in untimed sessions, while paused, or after the session ended.
    pub fn second_elapsed(&mut self, out: &mut Vec<Event>) -> Option<Outcome> {
        if self.is_over() || self.timer_paused {
            return None;
        }
        let Tally::Countdown(remaining) = &mut self.tally else {
            return None;
        };

        *remaining = remaining.saturating_sub(1);
        out.push(Event::TimeChanged {
            remaining: *remaining,
        });

        if *remaining == 0 {
            self.outcome = Some(Outcome::TimedOut);
            info!("countdown expired");
            out.push(Event::GameOverByTimeout);
        }
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_walk_core::{CollectibleId, Shape};

    fn collectible_at(cell: CellCoord, id: u32) -> Collectible {
        Collectible {
            id: CollectibleId::new(id),
            position: coords::world_position_of(cell, 8),
            shape: Shape::Cube,
        }
    }

    #[test]
    fn collection_requires_proximity() {
        let target = collectible_at(CellCoord::new(2, 2), 0);
        let mut scoring = Scoring::untimed(8, CellCoord::new(7, 7), vec![target]);
        let mut events = Vec::new();

        let outside = target.position + Vec2::new(COLLECT_RADIUS + 0.01, 0.0);
        assert_eq!(scoring.evaluate(outside, &mut events).collected, 0);
        assert!(events.is_empty());

        let inside = target.position + Vec2::new(COLLECT_RADIUS - 0.01, 0.0);
        assert_eq!(scoring.evaluate(inside, &mut events).collected, 1);
        assert_eq!(
            events,
            vec![
                Event::CollectibleCollected {
                    collectible: CollectibleId::new(0),
                    shape: Shape::Cube,
                },
                Event::ScoreChanged { score: 1 },
            ]
        );
        assert!(scoring.collectibles().is_empty());
    }

    #[test]
    fn collectibles_are_consumed_once() {
        let target = collectible_at(CellCoord::new(2, 2), 0);
        let mut scoring = Scoring::untimed(8, CellCoord::new(7, 7), vec![target]);
        let mut events = Vec::new();

        let _ = scoring.evaluate(target.position, &mut events);
        let _ = scoring.evaluate(target.position, &mut events);

        assert_eq!(scoring.tally(), Tally::Score(1));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn untimed_sessions_ignore_the_interval() {
        let mut scoring = Scoring::untimed(8, CellCoord::new(7, 7), Vec::new());
        let mut events = Vec::new();
        assert_eq!(scoring.second_elapsed(&mut events), None);
        assert!(events.is_empty());
        assert_eq!(scoring.tally_event(), Event::ScoreChanged { score: 0 });
    }

    #[test]
    fn paused_countdown_holds() {
        let mut scoring = Scoring::timed(8, CellCoord::new(7, 7), Vec::new(), 5, 2);
        let mut events = Vec::new();
        scoring.pause_timer();
        for _ in 0..10 {
            let _ = scoring.second_elapsed(&mut events);
        }
        assert_eq!(scoring.tally(), Tally::Countdown(5));

        scoring.resume_timer();
        let _ = scoring.second_elapsed(&mut events);
        assert_eq!(scoring.tally(), Tally::Countdown(4));
        assert_eq!(events, vec![Event::TimeChanged { remaining: 4 }]);
    }

    #[test]
    fn config_selects_the_tally() {
        let timed = SessionConfig {
            timed: true,
            initial_time: 30,
            ..SessionConfig::default()
        };
        let scoring = Scoring::from_config(&timed, CellCoord::new(0, 0), Vec::new());
        assert_eq!(scoring.tally(), Tally::Countdown(30));

        let untimed = SessionConfig::default();
        let scoring = Scoring::from_config(&untimed, CellCoord::new(0, 0), Vec::new());
        assert_eq!(scoring.tally(), Tally::Score(0));
    }
}
