//! Sliding puzzle for the terminal.
//!
//! An N x N grid of numbered tiles with one blank. Boards are shuffled by
//! walking the blank through a few hundred random legal moves, so every
//! game is solvable. Play interactively, print shuffled boards, or watch
//! the solver work.

mod render;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use slider::game::Game;
use slider::session::Session;
use slider::solver;

/// An N x N sliding puzzle with a solvable-by-construction shuffle.
#[derive(Parser)]
#[command(name = "slider")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play interactively in the terminal.
    Play {
        /// Grid size; 3-5 are the usual difficulties.
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=8))]
        size: u8,
        /// Seed for reproducible shuffles.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Shuffle a board and print it.
    Shuffle {
        /// Grid size; 3-5 are the usual difficulties.
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=8))]
        size: u8,
        /// Seed for reproducible shuffles.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Shuffle a board, solve it, and print the moves step by step.
    Solve {
        /// Grid size. Optimal solving is practical for 3, usually fine
        /// for 4, and slow beyond that.
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=8))]
        size: u8,
        /// Seed for reproducible shuffles.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Play { size, seed }) => run_play(size as usize, seed),
        Some(Command::Shuffle { size, seed }) => run_shuffle(size as usize, seed),
        Some(Command::Solve { size, seed }) => run_solve(size as usize, seed),
        None => run_play(3, None),
    }
}

/// Runs the interactive terminal game.
fn run_play(size: usize, seed: Option<u64>) {
    let session = Session::new(size, seed);
    if let Err(e) = render::play(session) {
        eprintln!("terminal error: {e}");
    }
}

/// Prints one shuffled board.
fn run_shuffle(size: usize, seed: Option<u64>) {
    println!("{}", shuffled_game(size, seed));
}

/// Shuffles a board, solves it, and replays the solution move by move.
fn run_solve(size: usize, seed: Option<u64>) {
    let mut game = shuffled_game(size, seed);
    println!("Shuffled board:\n{game}\n");

    match solver::solve(game.cells(), game.size()) {
        Ok(moves) => {
            println!("Solved in {} moves:", moves.len());
            for (step, &slot) in moves.iter().enumerate() {
                game.attempt_move(slot).expect("solver only emits legal moves");
                println!("\nstep {}: slide slot {slot}\n{game}", step + 1);
            }
        }
        Err(e) => eprintln!("could not solve: {e}"),
    }
}

/// Builds a shuffled game outside a session (no clock, no status).
fn shuffled_game(size: usize, seed: Option<u64>) -> Game {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut game = Game::solved(size);
    game.shuffle(&mut rng);
    game
}
