//! Sliding-tile puzzle solver for arbitrary `rows x cols` boards.
//!
//! [`Board`] validates a layout and generates moves, [`Solver`] runs A* with
//! the Manhattan heuristic and returns the move list, and [`replay`] plays
//! that list back in a terminal.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod replay;
pub mod solver;

pub use config::{default_scramble_steps, Level, SolverConfig};
pub use error::BoardError;
pub use puzzle::{Board, Direction, Move, Position};
pub use solver::{AbortReason, SearchStats, SolveOutcome, Solver};

/// Validates `grid` and solves it with the default (unbounded) configuration.
pub fn solve(grid: Vec<Vec<u32>>) -> Result<SolveOutcome, BoardError> {
    let board = Board::new(grid)?;
    Ok(Solver::default().solve(&board))
}
