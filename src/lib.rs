//! Sliding Puzzle Engine
//!
//! Core rules for an N x N sliding puzzle (the 15-puzzle family): solved
//! construction, a shuffle that only walks legal moves so every game is
//! solvable, click-driven move validation, and solved detection. A solver
//! and an interactive session layer sit on top; rendering stays outside
//! the library.

pub mod board;
pub mod game;
pub mod session;
pub mod solver;

pub use game::{Game, MoveRejected, ShuffleOptions, Tile};
pub use session::{Session, Status};
