//! Interactive game sessions: status, timing, and lifecycle around [`Game`].
//!
//! The engine exposes predicates only; the session is the layer that polls
//! `is_solved` after each accepted move, runs the clock, and decides when
//! input is over.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::{Game, ShuffleOptions};

/// Grid sizes offered as difficulty presets.
pub const DIFFICULTY_SIZES: [usize; 3] = [3, 4, 5];

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Shuffled, waiting for the first move.
    Ready,
    /// At least one accepted move; the clock is running.
    Running,
    /// Solved. Clicks are ignored until `reset` or `new_game`.
    Complete,
}

/// One interactive game: a shuffled [`Game`] plus clock and status.
///
/// The session owns its RNG, so a seeded session replays identically:
/// the first shuffle and every reshuffle after it.
pub struct Session {
    game: Game,
    rng: ChaCha8Rng,
    shuffle: ShuffleOptions,
    status: Status,
    started: Option<Instant>,
    finished: Option<Duration>,
}

impl Session {
    /// Starts a session with a freshly shuffled game of the given size.
    ///
    /// Without a seed the RNG is seeded from the OS.
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut session = Self {
            game: Game::solved(size),
            rng,
            shuffle: ShuffleOptions::default(),
            status: Status::Ready,
            started: None,
            finished: None,
        };
        session.reset();
        session
    }

    /// Discards the current game and starts a fresh shuffled one, same size.
    pub fn reset(&mut self) {
        self.new_game(self.game.size());
    }

    /// Discards the current game and starts a fresh shuffled one at `size`.
    pub fn new_game(&mut self, size: usize) {
        let mut game = Game::solved(size);
        game.shuffle_with(&mut self.rng, &self.shuffle);
        self.game = game;
        self.status = Status::Ready;
        self.started = None;
        self.finished = None;
    }

    /// Forwards a click to the engine, returning whether the move was
    /// accepted. Rejected clicks and clicks after completion do nothing.
    pub fn click(&mut self, target: usize) -> bool {
        if self.status == Status::Complete {
            return false;
        }
        if self.game.attempt_move(target).is_err() {
            return false;
        }

        if self.started.is_none() {
            self.started = Some(Instant::now());
            self.status = Status::Running;
        }
        if self.game.is_solved() {
            self.finished = Some(self.elapsed());
            self.status = Status::Complete;
        }
        true
    }

    /// Time played: zero until the first accepted move, frozen once solved.
    pub fn elapsed(&self) -> Duration {
        if let Some(frozen) = self.finished {
            return frozen;
        }
        self.started.map_or(Duration::ZERO, |started| started.elapsed())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Accepted moves in the current game.
    pub fn moves(&self) -> u32 {
        self.game.move_count()
    }
}
