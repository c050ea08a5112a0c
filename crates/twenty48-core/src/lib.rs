//! twenty48-core: the 2048 sliding-tile engine and an undoable game session.
//!
//! This crate provides:
//! - A square `Grid` value with the pure merge engine (`merge`, `shift`, ...)
//! - A weighted tile spawner driven by a caller-supplied RNG (`engine::spawn`)
//! - `Session`, which owns score, high score and undo history
//! - A blocking `game_loop::run` plus the `Presenter` trait a UI implements
//!
//! Quick start:
//! ```
//! use twenty48_core::{GameConfig, Move, Session};
//!
//! // Seeded session so spawns are reproducible
//! let mut session = Session::seeded(GameConfig::default(), 42).unwrap();
//! session.start();
//! assert_eq!(session.grid().count_empty(), 14);
//!
//! // At least one direction always moves on a fresh board
//! let moved = Move::ALL.into_iter().any(|dir| session.apply_move(dir));
//! assert!(moved);
//! assert!(session.undo());
//! assert_eq!(session.grid().count_empty(), 14);
//! ```
//!
//! Merge engine only (no randomness):
//! ```
//! use twenty48_core::engine::{merge, Grid, Move};
//!
//! let g = Grid::from_rows(vec![
//!     vec![2, 2, 2, 2],
//!     vec![2, 2, 4, 0],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 0],
//! ]).unwrap();
//! let (next, gained) = merge(&g, Move::Left);
//! assert_eq!(next.row(0), &[4, 4, 0, 0]);
//! assert_eq!(next.row(1), &[4, 4, 0, 0]);
//! assert_eq!(gained, 8 + 4);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod session;

pub use config::{DEFAULT_BOARD_SIZE, DEFAULT_INITIAL_TILES, GameConfig};
pub use engine::{Grid, Move, Score, Tile};
pub use error::GameError;
pub use game_loop::{Input, Presenter, Summary};
pub use session::{Session, SessionState, Snapshot};
