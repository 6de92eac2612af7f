//! The puzzle engine: solved construction, solvable shuffling, move
//! validation, and solved detection.
//!
//! The arrangement is a flat slot -> tile-id array in row-major order.
//! Tile ids are 1-based; id 0 is the blank, whose home slot is the
//! bottom-right corner. Every operation preserves the permutation
//! invariant: the cells are always a permutation of `0..size^2`.

use std::fmt;
use std::ops::RangeInclusive;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::board::{adjacent_positions, format_board, Cell, Neighbors};

/// A rejected move: the clicked slot is not adjacent to the blank.
///
/// An expected outcome of normal play, not a failure; callers may ignore it.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("slot {target} is not adjacent to the blank at slot {blank}")]
pub struct MoveRejected {
    /// The slot the player tried to slide.
    pub target: usize,
    /// Where the blank was at the time.
    pub blank: usize,
}

/// Tuning for the shuffle walk.
#[derive(Clone, Debug)]
pub struct ShuffleOptions {
    /// How many walk steps to take, sampled uniformly per shuffle.
    /// Must be non-empty.
    pub steps: RangeInclusive<u32>,
}

impl Default for ShuffleOptions {
    /// The original game's tuning: 200 steps plus up to 100 extra.
    fn default() -> Self {
        Self { steps: 200..=300 }
    }
}

/// One tile of the read-only projection exposed to UIs.
///
/// `correct_position` is fixed for the lifetime of a game; renderers use it
/// to pick the image crop for the tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Tile id; 0 is the blank.
    pub id: Cell,
    /// The slot the tile currently occupies.
    pub current_position: usize,
    /// The slot the tile occupies when the puzzle is solved.
    pub correct_position: usize,
}

/// A sliding puzzle: an N x N grid of numbered tiles with one blank.
///
/// Created solved via [`Game::solved`], then randomized with
/// [`Game::shuffle`]. Gameplay mutates it in place through
/// [`Game::attempt_move`]; a "new game" constructs a fresh value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    size: usize,
    /// Slot -> tile id, row-major.
    cells: Vec<Cell>,
    /// Cached slot of the blank (tile 0).
    blank: usize,
    /// Accepted moves since construction.
    move_count: u32,
}

impl Game {
    /// Creates a solved puzzle: tile `i + 1` in slot `i`, blank bottom-right.
    ///
    /// Panics if `size < 2` or the grid holds more tiles than ids fit in a
    /// [`Cell`].
    pub fn solved(size: usize) -> Self {
        assert!(size >= 2, "puzzle size must be at least 2");
        assert!(
            size * size <= Cell::MAX as usize + 1,
            "puzzle size {size} overflows tile ids"
        );

        let total = size * size;
        let mut cells: Vec<Cell> = (1..total).map(|id| id as Cell).collect();
        cells.push(0);

        Self {
            size,
            cells,
            blank: total - 1,
            move_count: 0,
        }
    }

    /// Grid dimension N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Accepted moves since construction. Shuffling does not count.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// The slot currently holding the blank.
    pub fn blank_position(&self) -> usize {
        self.blank
    }

    /// Slot -> tile id view of the arrangement.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether every tile sits in its home slot.
    pub fn is_solved(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells[last] == 0
            && self.cells[..last]
                .iter()
                .enumerate()
                .all(|(slot, &id)| id as usize == slot + 1)
    }

    /// The slots a player can currently slide: those adjacent to the blank.
    pub fn movable_positions(&self) -> Neighbors {
        adjacent_positions(self.blank, self.size)
    }

    /// Read-only per-tile projection: id, current slot, home slot.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let blank_home = self.cells.len() - 1;
        self.cells.iter().enumerate().map(move |(slot, &id)| Tile {
            id,
            current_position: slot,
            correct_position: if id == 0 { blank_home } else { id as usize - 1 },
        })
    }

    /// Attempts to slide the tile in `target` into the blank.
    ///
    /// Legal iff `target` is orthogonally adjacent to the blank. A legal
    /// move swaps the two slots and counts one move; an illegal move leaves
    /// the game untouched and reports [`MoveRejected`].
    ///
    /// Panics if `target` is outside the grid.
    pub fn attempt_move(&mut self, target: usize) -> Result<(), MoveRejected> {
        assert!(
            target < self.cells.len(),
            "slot {target} is outside a {0}x{0} grid",
            self.size
        );

        if !self.movable_positions().contains(target) {
            return Err(MoveRejected {
                target,
                blank: self.blank,
            });
        }

        self.cells.swap(self.blank, target);
        self.blank = target;
        self.move_count += 1;
        Ok(())
    }

    /// Randomizes the arrangement with the default walk length.
    ///
    /// See [`Game::shuffle_with`].
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.shuffle_with(rng, &ShuffleOptions::default());
    }

    /// Randomizes the arrangement by walking the blank through a sampled
    /// number of random legal moves.
    ///
    /// Walking the move graph keeps the arrangement reachable from the
    /// solved state; half of all free permutations are not. Each step
    /// excludes the slot the blank just came from, so a step is never
    /// immediately undone. Shuffling does not count as moves.
    pub fn shuffle_with<R: Rng>(&mut self, rng: &mut R, options: &ShuffleOptions) {
        let steps = rng.gen_range(options.steps.clone());
        let mut previous_blank = None;

        for _ in 0..steps {
            previous_blank = Some(self.walk_step(rng, previous_blank));
        }

        debug!("shuffled {0}x{0} board with {steps} walk steps", self.size);
    }

    /// One shuffle step: moves the blank to a random neighbor other than
    /// `previous_blank`, returning the slot the blank vacated.
    fn walk_step<R: Rng>(&mut self, rng: &mut R, previous_blank: Option<usize>) -> usize {
        let neighbors = adjacent_positions(self.blank, self.size);
        let mut candidates = [0usize; 4];
        let mut count = 0;

        for &slot in neighbors.as_slice() {
            if Some(slot) != previous_blank {
                candidates[count] = slot;
                count += 1;
            }
        }

        // every slot has at least two neighbors, so excluding one leaves one
        let &target = candidates[..count].choose(rng).unwrap();

        let vacated = self.blank;
        self.cells.swap(self.blank, target);
        self.blank = target;
        vacated
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_board(&self.cells, self.size))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Every id in `0..size^2` exactly once; implies a single blank.
    fn assert_permutation(game: &Game) {
        let mut seen = vec![false; game.cells().len()];
        for &id in game.cells() {
            assert!(!seen[id as usize], "tile {id} appears twice");
            seen[id as usize] = true;
        }
    }

    #[test]
    fn test_solved_layout_3x3() {
        let game = Game::solved(3);
        assert_eq!(game.cells(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(game.blank_position(), 8);
        assert_eq!(game.move_count(), 0);
        assert!(game.is_solved());
        assert_permutation(&game);
    }

    #[test]
    #[should_panic(expected = "at least 2")]
    fn test_size_one_panics() {
        Game::solved(1);
    }

    #[test]
    fn test_click_adjacent_then_non_adjacent() {
        let mut game = Game::solved(3);

        // slot 7 is adjacent to the blank at 8: tile 8 slides right
        game.attempt_move(7).unwrap();
        assert_eq!(game.blank_position(), 7);
        assert_eq!(game.cells()[8], 8);
        assert_eq!(game.move_count(), 1);
        assert!(!game.is_solved());

        // slot 0 is nowhere near the blank at 7
        let rejected = game.attempt_move(0).unwrap_err();
        assert_eq!(rejected, MoveRejected { target: 0, blank: 7 });
        assert_eq!(game.move_count(), 1);
        assert_permutation(&game);
    }

    #[test]
    fn test_rejected_move_leaves_state_untouched() {
        let mut game = Game::solved(4);
        game.attempt_move(11).unwrap();
        let before = game.clone();

        assert!(game.attempt_move(0).is_err());
        assert_eq!(game, before);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_target_panics() {
        Game::solved(3).attempt_move(9).unwrap();
    }

    #[test]
    fn test_move_count_tracks_accepted_moves_only() {
        let mut game = Game::solved(3);
        assert!(game.attempt_move(7).is_ok());
        assert!(game.attempt_move(7).is_err()); // blank itself
        assert!(game.attempt_move(4).is_ok());
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn test_is_solved_is_idempotent() {
        let mut game = Game::solved(3);
        assert_eq!(game.is_solved(), game.is_solved());

        game.shuffle(&mut rng(3));
        assert_eq!(game.is_solved(), game.is_solved());
    }

    #[test]
    fn test_shuffle_preserves_permutation() {
        for size in 2..=5 {
            for seed in 0..5 {
                let mut game = Game::solved(size);
                game.shuffle(&mut rng(seed));
                assert_permutation(&game);
            }
        }
    }

    #[test]
    fn test_shuffle_does_not_count_moves() {
        let mut game = Game::solved(4);
        game.shuffle(&mut rng(1));
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_fixed_seed_shuffle_is_not_solved() {
        let mut game = Game::solved(3);
        game.shuffle(&mut rng(42));
        assert!(!game.is_solved());
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut first = Game::solved(4);
        first.shuffle(&mut rng(7));
        let mut second = Game::solved(4);
        second.shuffle(&mut rng(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_walk_never_backtracks() {
        let mut game = Game::solved(4);
        let mut rng = rng(9);
        let mut previous = None;

        for _ in 0..500 {
            let before = game.blank_position();
            let vacated = game.walk_step(&mut rng, previous);
            assert_eq!(vacated, before);
            if let Some(two_steps_ago) = previous {
                assert_ne!(
                    game.blank_position(),
                    two_steps_ago,
                    "walk undid its previous step"
                );
            }
            previous = Some(vacated);
        }
    }

    #[test]
    fn test_custom_walk_length() {
        // a single-step walk moves exactly one tile
        let mut game = Game::solved(3);
        let options = ShuffleOptions { steps: 1..=1 };
        game.shuffle_with(&mut rng(5), &options);

        let displaced = game
            .tiles()
            .filter(|t| t.current_position != t.correct_position)
            .count();
        assert_eq!(displaced, 2); // the blank and one tile swapped
    }

    #[test]
    fn test_tiles_projection() {
        let mut game = Game::solved(3);
        game.attempt_move(5).unwrap();

        let tiles: Vec<Tile> = game.tiles().collect();
        assert_eq!(tiles.len(), 9);

        let blank = tiles.iter().find(|t| t.id == 0).unwrap();
        assert_eq!(blank.current_position, 5);
        assert_eq!(blank.correct_position, 8);

        let moved = tiles.iter().find(|t| t.id == 6).unwrap();
        assert_eq!(moved.current_position, 8);
        assert_eq!(moved.correct_position, 5);

        // home slots never change
        for tile in &tiles {
            let expected = if tile.id == 0 { 8 } else { tile.id as usize - 1 };
            assert_eq!(tile.correct_position, expected);
        }
    }

    #[test]
    fn test_movable_positions_follow_the_blank() {
        let mut game = Game::solved(3);
        assert_eq!(game.movable_positions().as_slice(), &[5, 7]);

        game.attempt_move(7).unwrap();
        assert_eq!(game.movable_positions().as_slice(), &[4, 6, 8]);
    }
}
