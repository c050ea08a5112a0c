//! Undoable game session: owns the grid, score, high score and snapshot history,
//! and runs the merge engine + spawner once per accepted move.

use std::collections::VecDeque;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::{self, Grid, Move, Score};
use crate::error::GameError;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Built but `start` not yet called.
    Idle,
    Running,
    /// Grid full and no direction changes it.
    Over,
}

/// Saved (grid, score) pair restored by `undo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: Score,
}

/// One player's game: current board, scores and the undo stack.
#[derive(Debug, Clone)]
pub struct Session<R = StdRng> {
    config: GameConfig,
    rng: R,
    grid: Grid,
    score: Score,
    high_score: Score,
    history: VecDeque<Snapshot>,
    moves: u64,
    state: SessionState,
}

impl Session<StdRng> {
    /// Session whose spawns replay identically for the same seed.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: GameConfig) -> Result<Self, GameError> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// Build an `Idle` session with an empty grid. Call `start` to deal tiles.
    pub fn new(config: GameConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::empty(config.board_size),
            config,
            rng,
            score: 0,
            high_score: 0,
            history: VecDeque::new(),
            moves: 0,
            state: SessionState::Idle,
        })
    }

    /// Fresh board with the initial tiles, score 0, empty history.
    pub fn start(&mut self) {
        self.deal();
        debug!(
            "session started: {n}x{n}, {} initial tiles",
            self.config.initial_tiles,
            n = self.config.board_size
        );
    }

    /// Like `start`, but the high score carries over.
    pub fn reset(&mut self) {
        self.deal();
        debug!("session reset, high score {}", self.high_score);
    }

    /// A full deal can already be stuck, in which case the session starts `Over`.
    fn deal(&mut self) {
        self.score = 0;
        self.moves = 0;
        self.history.clear();
        let mut grid = Grid::empty(self.config.board_size);
        for _ in 0..self.config.initial_tiles {
            grid = engine::spawn(&grid, &mut self.rng);
        }
        self.grid = grid;
        self.state = if engine::is_game_over(&self.grid) {
            SessionState::Over
        } else {
            SessionState::Running
        };
    }

    /// Slide the board in `direction`.
    ///
    /// Returns true when the move changed the board; the previous grid and
    /// score are pushed onto the history, the score and high score are updated
    /// and one tile is spawned. Returns false, with no state change, when the
    /// merge leaves the grid as it was or the session is not running.
    pub fn apply_move(&mut self, direction: Move) -> bool {
        if self.state != SessionState::Running {
            trace!("{direction} ignored in state {:?}", self.state);
            return false;
        }
        let (merged, gained) = engine::merge(&self.grid, direction);
        if merged == self.grid {
            trace!("{direction} rejected: nothing moves");
            return false;
        }

        let previous = std::mem::replace(&mut self.grid, merged);
        self.push_snapshot(Snapshot {
            grid: previous,
            score: self.score,
        });
        self.score += gained;
        self.moves += 1;
        self.high_score = self.high_score.max(self.score);
        self.grid = engine::spawn(&self.grid, &mut self.rng);

        if engine::is_game_over(&self.grid) {
            self.state = SessionState::Over;
        }
        debug!(
            "{direction}: +{gained} (score {}, high {}), state {:?}",
            self.score, self.high_score, self.state
        );
        true
    }

    /// Parse `direction` and apply it; unknown text is `InvalidArgument`.
    pub fn apply_direction(&mut self, direction: &str) -> Result<bool, GameError> {
        let dir: Move = direction.parse()?;
        Ok(self.apply_move(dir))
    }

    /// Restore the most recent snapshot. False when there is nothing to undo.
    ///
    /// The tile spawned by the undone move disappears with it; the high score
    /// is left alone.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_back() else {
            trace!("undo with empty history");
            return false;
        };
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.moves -= 1;
        self.state = SessionState::Running;
        debug!(
            "undo: score back to {}, {} snapshot(s) left",
            self.score,
            self.history.len()
        );
        true
    }

    fn push_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(limit) = self.config.undo_limit {
            if self.history.len() >= limit {
                self.history.pop_front();
            }
        }
        self.history.push_back(snapshot);
    }

    /// Put `grid` on the board of a running session, keeping score and history.
    #[cfg(test)]
    pub(crate) fn force_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.state = SessionState::Running;
    }
}

impl<R> Session<R> {
    /// Current board, read-only.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn high_score(&self) -> Score {
        self.high_score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Over
    }

    /// Number of moves `undo` can currently take back.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Snapshots, oldest first.
    pub fn history(&self) -> &VecDeque<Snapshot> {
        &self.history
    }

    /// Accepted moves since the last deal, minus the ones undone.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seed: u64) -> Session {
        let mut s = Session::seeded(GameConfig::default(), seed).unwrap();
        s.start();
        s
    }

    /// Force a known board onto a running session.
    fn with_grid(rows: Vec<Vec<u32>>) -> Session {
        let mut s = running(1);
        s.force_grid(Grid::from_rows(rows).unwrap());
        s
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let s = Session::seeded(GameConfig::default(), 0).unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.grid().count_empty(), 16);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GameConfig::with_board_size(0);
        assert!(matches!(
            Session::seeded(cfg, 0),
            Err(GameError::InvalidArgument(_))
        ));
    }

    #[test]
    fn idle_session_rejects_moves() {
        let mut s = Session::seeded(GameConfig::default(), 0).unwrap();
        for dir in Move::ALL {
            assert!(!s.apply_move(dir));
        }
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn start_deals_initial_tiles() {
        let s = running(3);
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.grid().count_empty(), 14);
        assert!(s.grid().tiles().all(|v| matches!(v, 0 | 2 | 4)));
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn accepted_move_records_snapshot_and_spawns() {
        let mut s = with_grid(vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let before = s.grid().clone();
        assert!(s.apply_move(Move::Left));
        assert_eq!(s.score(), 4);
        assert_eq!(s.high_score(), 4);
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.moves(), 1);
        assert_eq!(s.history()[0].grid, before);
        assert_eq!(s.history()[0].score, 0);
        assert_eq!(s.grid().get(0, 0), 4);
        assert_eq!(s.grid().count_empty(), 14);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut s = with_grid(vec![
            vec![2, 4, 0, 0],
            vec![8, 16, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let grid = s.grid().clone();
        assert!(!s.apply_move(Move::Left));
        assert!(!s.apply_move(Move::Up));
        assert_eq!(s.grid(), &grid);
        assert_eq!(s.score(), 0);
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn apply_direction_validates_text() {
        let mut s = running(5);
        assert!(matches!(
            s.apply_direction("north"),
            Err(GameError::InvalidArgument(_))
        ));
        assert_eq!(s.history_len(), 0);
        let moved = Move::ALL
            .iter()
            .any(|d| s.apply_direction(d.as_str()).unwrap());
        assert!(moved);
    }

    #[test]
    fn undo_restores_snapshot_but_keeps_high_score() {
        let mut s = with_grid(vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let before = s.grid().clone();
        assert!(s.apply_move(Move::Left));
        assert!(s.undo());
        assert_eq!(s.grid(), &before);
        assert_eq!(s.score(), 0);
        assert_eq!(s.high_score(), 4);
        assert!(!s.undo());
    }

    #[test]
    fn reset_keeps_high_score() {
        let mut s = with_grid(vec![
            vec![8, 8, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        assert!(s.apply_move(Move::Right));
        assert_eq!(s.high_score(), 16);
        s.reset();
        assert_eq!(s.score(), 0);
        assert_eq!(s.high_score(), 16);
        assert_eq!(s.history_len(), 0);
        assert_eq!(s.grid().count_empty(), 14);
    }

    #[test]
    fn filling_the_last_gap_without_merges_ends_the_game() {
        // Right slides the last row over and the freed corner takes the spawn.
        let mut s = with_grid(vec![
            vec![2, 4, 8, 16],
            vec![16, 8, 4, 2],
            vec![8, 4, 8, 16],
            vec![64, 32, 128, 0],
        ]);
        assert!(s.apply_move(Move::Right));
        assert_eq!(&s.grid().row(3)[1..], &[64, 32, 128]);
        let spawned = s.grid().get(3, 0);
        assert!(spawned == 2 || spawned == 4);
        // [2|4, 64, 32, 128] under [8, 4, 8, 16]: nothing pairs up.
        assert!(s.is_over());
        assert_eq!(s.state(), SessionState::Over);

        for dir in Move::ALL {
            assert!(!s.apply_move(dir));
        }
        assert_eq!(s.history_len(), 1);

        assert!(s.undo());
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.grid().get(3, 3), 0);
    }

    #[test]
    fn undo_limit_drops_oldest() {
        let cfg = GameConfig {
            undo_limit: Some(2),
            ..GameConfig::default()
        };
        let mut s = Session::seeded(cfg, 11).unwrap();
        s.start();
        let mut accepted = 0;
        for dir in Move::ALL.iter().cycle().take(40) {
            if s.apply_move(*dir) {
                accepted += 1;
            }
            assert!(s.history_len() <= 2);
            if s.is_over() {
                break;
            }
        }
        assert!(accepted >= 2);
        assert_eq!(s.history_len(), 2);
        assert!(s.undo());
        assert!(s.undo());
        assert!(!s.undo());
    }

    #[test]
    fn moves_count_accepted_minus_undone() {
        let mut s = running(21);
        assert_eq!(s.moves(), 0);
        let mut accepted = 0;
        for dir in Move::ALL.iter().cycle().take(12) {
            if s.apply_move(*dir) {
                accepted += 1;
            }
            assert_eq!(s.moves(), accepted);
        }
        assert!(accepted >= 2);
        assert!(s.undo());
        assert!(s.undo());
        assert_eq!(s.moves(), accepted - 2);
        // Rejected moves and empty undos leave the count alone.
        let mut idle = Session::seeded(GameConfig::default(), 0).unwrap();
        assert!(!idle.apply_move(Move::Left));
        assert!(!idle.undo());
        assert_eq!(idle.moves(), 0);
        s.reset();
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn capped_history_keeps_the_latest_snapshots() {
        let cfg = GameConfig {
            undo_limit: Some(1),
            ..GameConfig::default()
        };
        let mut s = Session::seeded(cfg, 8).unwrap();
        s.start();
        s.force_grid(
            Grid::from_rows(vec![
                vec![2, 2, 4, 4],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ])
            .unwrap(),
        );
        assert!(s.apply_move(Move::Left));
        let second_from = s.grid().clone();
        let score = s.score();
        let moved = Move::ALL.iter().any(|d| s.apply_move(*d));
        assert!(moved);
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.history()[0].grid, second_from);
        assert_eq!(s.history()[0].score, score);
        assert!(s.undo());
        assert_eq!(s.grid(), &second_from);
        assert_eq!(s.moves(), 1);
        assert!(!s.undo());
    }

    #[test]
    fn stuck_deal_starts_over() {
        // Four tiles fill a 2x2 board; some deals have no merge at all.
        let cfg = GameConfig {
            board_size: 2,
            initial_tiles: 4,
            undo_limit: None,
        };
        let mut stuck = 0;
        for seed in 0..1000 {
            let mut s = Session::seeded(cfg.clone(), seed).unwrap();
            s.start();
            assert!(s.grid().is_full());
            assert_eq!(s.is_over(), engine::is_game_over(s.grid()), "seed {seed}");
            if s.is_over() {
                stuck += 1;
                assert_eq!(s.state(), SessionState::Over);
                for dir in Move::ALL {
                    assert!(!s.apply_move(dir));
                }
            }
        }
        assert!(stuck > 0);
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = running(77);
        let mut b = running(77);
        for dir in Move::ALL.iter().cycle().take(30) {
            assert_eq!(a.apply_move(*dir), b.apply_move(*dir));
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.score(), b.score());
    }
}
