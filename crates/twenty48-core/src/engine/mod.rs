//! Engine module: the N x N grid, the pure merge engine and the tile spawner.
//!
//! - `Grid` is the board value with convenience methods (`merge`, `shift`, ...).
//! - Free functions mirror the methods when convenient (e.g., `merge`, `spawn`).
//! - Nothing in here holds state between calls; randomness is always passed in.

mod ops;
pub mod spawn;
pub mod state;

pub use state::{Grid, Move, Score, Tile};

pub use ops::{can_move, is_game_over, legal_moves, merge, shift};
pub use spawn::{FOUR_PROBABILITY, insert_random_tile, spawn};
