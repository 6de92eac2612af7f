//! Solvability analysis and an IDA* solver for puzzle arrangements.
//!
//! The solver searches over blank positions: a solution is the sequence of
//! slots to feed to `Game::attempt_move` in order. Arrangements produced by
//! the engine's walk shuffle are always solvable; the parity predicate is
//! the independent check, and it rejects hand-built arrangements before any
//! search starts.

use log::debug;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::board::{adjacent_positions, position_to_row_col, Cell};

/// Hard cap on the IDA* bound before giving up.
///
/// Optimal solutions top out at 31 moves for 3x3 and 80 for 4x4, so the cap
/// only triggers on larger grids.
const MAX_BOUND: usize = 128;

/// Why an arrangement could not be solved.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// The arrangement's permutation parity is wrong: no sequence of legal
    /// moves reaches the solved state.
    #[error("arrangement is not reachable from the solved state")]
    Unsolvable,
    /// The search bound grew past the hard cap.
    #[error("no solution found within {0} moves")]
    LimitExceeded(usize),
}

/// Outcome of one bounded depth-first pass.
enum Search {
    Found,
    /// The smallest estimate that exceeded the bound.
    Exceeded(usize),
}

/// Counts pairs of tiles in the wrong relative order, ignoring the blank.
fn count_inversions(cells: &[Cell]) -> usize {
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &id)| id != 0)
        .map(|(slot, &id)| {
            cells[slot + 1..]
                .iter()
                .filter(|&&later| later != 0 && later < id)
                .count()
        })
        .sum()
}

/// Whether an arrangement can reach the solved state by legal moves.
///
/// Odd grid widths: solvable iff the inversion count is even. Even widths:
/// solvable iff inversions plus the blank's row (from the top) is odd.
pub fn is_solvable(cells: &[Cell], size: usize) -> bool {
    assert_eq!(cells.len(), size * size, "cell count must match the grid");

    let inversions = count_inversions(cells);
    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank = cells.iter().position(|&id| id == 0).expect("board has a blank");
        let (blank_row, _) = position_to_row_col(blank, size);
        (inversions + blank_row) % 2 == 1
    }
}

fn is_goal(cells: &[Cell]) -> bool {
    let last = cells.len() - 1;
    cells[last] == 0
        && cells[..last]
            .iter()
            .enumerate()
            .all(|(slot, &id)| id as usize == slot + 1)
}

/// Sum of every tile's distance from its home slot.
fn manhattan_distance(cells: &[Cell], size: usize) -> usize {
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &id)| id != 0)
        .map(|(slot, &id)| {
            let (row, col) = position_to_row_col(slot, size);
            let (home_row, home_col) = position_to_row_col(id as usize - 1, size);
            row.abs_diff(home_row) + col.abs_diff(home_col)
        })
        .sum()
}

/// Counts tiles that sit in their home row (or column) behind a larger
/// tile that also belongs there.
fn linear_conflicts(cells: &[Cell], size: usize) -> usize {
    let mut conflicts = 0;

    for row in 0..size {
        let mut max_seen = 0;
        for col in 0..size {
            let id = cells[row * size + col];
            if id != 0 && (id as usize - 1) / size == row {
                if id > max_seen {
                    max_seen = id;
                } else {
                    conflicts += 1;
                }
            }
        }
    }

    for col in 0..size {
        let mut max_seen = 0;
        for row in 0..size {
            let id = cells[row * size + col];
            if id != 0 && (id as usize - 1) % size == col {
                if id > max_seen {
                    max_seen = id;
                } else {
                    conflicts += 1;
                }
            }
        }
    }

    conflicts
}

/// Distance estimate: Manhattan plus two moves per linear conflict.
fn heuristic(cells: &[Cell], size: usize) -> usize {
    manhattan_distance(cells, size) + 2 * linear_conflicts(cells, size)
}

/// Finds a sequence of slots that solves `cells` when fed to
/// `Game::attempt_move` in order.
///
/// Iterative-deepening A*: depth-first passes with an increasing bound on
/// `depth + heuristic`. Within a pass, the blank never returns to the slot
/// it just left, and a set of every arrangement on the current path prunes
/// longer cycles.
pub fn solve(cells: &[Cell], size: usize) -> Result<Vec<usize>, SolveError> {
    assert_eq!(cells.len(), size * size, "cell count must match the grid");

    if is_goal(cells) {
        return Ok(Vec::new());
    }
    if !is_solvable(cells, size) {
        return Err(SolveError::Unsolvable);
    }

    let mut board = cells.to_vec();
    let blank = board.iter().position(|&id| id == 0).expect("board has a blank");

    let mut path = Vec::new();
    let mut on_path: FxHashSet<Vec<Cell>> = FxHashSet::default();
    on_path.insert(board.clone());

    let mut bound = heuristic(&board, size);
    loop {
        debug!("searching with bound {bound}");
        match search(&mut board, size, blank, None, 0, bound, &mut path, &mut on_path) {
            Search::Found => return Ok(path),
            Search::Exceeded(next) => {
                if next > MAX_BOUND {
                    return Err(SolveError::LimitExceeded(MAX_BOUND));
                }
                bound = next;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn search(
    board: &mut Vec<Cell>,
    size: usize,
    blank: usize,
    previous_blank: Option<usize>,
    depth: usize,
    bound: usize,
    path: &mut Vec<usize>,
    on_path: &mut FxHashSet<Vec<Cell>>,
) -> Search {
    let estimate = depth + heuristic(board, size);
    if estimate > bound {
        return Search::Exceeded(estimate);
    }
    if is_goal(board) {
        return Search::Found;
    }

    let mut minimum = usize::MAX;
    for &target in adjacent_positions(blank, size).as_slice() {
        if Some(target) == previous_blank {
            continue;
        }

        board.swap(blank, target);
        if !on_path.insert(board.clone()) {
            // already visited on this path
            board.swap(blank, target);
            continue;
        }
        path.push(target);

        match search(board, size, target, Some(blank), depth + 1, bound, path, on_path) {
            Search::Found => return Search::Found,
            Search::Exceeded(value) => minimum = minimum.min(value),
        }

        path.pop();
        on_path.remove(board);
        board.swap(blank, target);
    }

    Search::Exceeded(minimum)
}
