//! Blocking play loop that drives a `Session` through a `Presenter`.
//!
//! The presenter owns every blocking concern (waiting for a key, drawing a
//! frame). The loop only translates its inputs into session calls and asks
//! it to redraw afterwards.

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::engine::{Grid, Move, Score, Tile};
use crate::session::{Session, SessionState};

/// What the player asked for on one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Move(Move),
    Undo,
    Reset,
    /// Nothing recognisable this time around.
    None,
}

/// Rendering and input side of the game, implemented outside the core.
pub trait Presenter {
    /// Block until the player does something.
    fn poll_input(&mut self) -> Result<Input>;
    fn draw_board(&mut self, grid: &Grid) -> Result<()>;
    fn display_score(&mut self, score: Score) -> Result<()>;
    fn display_high_score(&mut self, high_score: Score) -> Result<()>;
    /// Called once each time the session reaches `Over`.
    fn display_game_over(&mut self, _score: Score) -> Result<()> {
        Ok(())
    }
}

/// Final numbers once the player quits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: Score,
    pub high_score: Score,
    /// Moves accepted over the whole run, including ones later undone.
    pub moves: u64,
    pub highest_tile: Tile,
}

/// Full redraw, plus the game-over notice when the session has just ended.
fn render<R, P: Presenter + ?Sized>(session: &Session<R>, presenter: &mut P) -> Result<()> {
    presenter.draw_board(session.grid())?;
    presenter.display_score(session.score())?;
    presenter.display_high_score(session.high_score())?;
    if session.is_over() {
        info!("game over with score {}", session.score());
        presenter.display_game_over(session.score())?;
    }
    Ok(())
}

/// Run until the presenter reports `Quit`.
///
/// An idle session is started first. A rejected move redraws the unchanged
/// board only. Every accepted move, undo or reset redraws everything, so an
/// ending (including a deal with no legal move) is announced once per
/// transition, and the loop keeps polling so the player can still undo,
/// reset or quit.
pub fn run<R, P>(session: &mut Session<R>, presenter: &mut P) -> Result<Summary>
where
    R: Rng,
    P: Presenter + ?Sized,
{
    if session.state() == SessionState::Idle {
        session.start();
    }
    render(session, presenter)?;

    let mut moves = 0u64;
    loop {
        match presenter.poll_input()? {
            Input::Quit => break,
            Input::None => continue,
            Input::Move(dir) => {
                if session.apply_move(dir) {
                    moves += 1;
                    render(session, presenter)?;
                } else {
                    presenter.draw_board(session.grid())?;
                }
            }
            Input::Undo => {
                if session.undo() {
                    render(session, presenter)?;
                } else {
                    debug!("nothing to undo");
                }
            }
            Input::Reset => {
                session.reset();
                render(session, presenter)?;
            }
        }
    }

    Ok(Summary {
        score: session.score(),
        high_score: session.high_score(),
        moves,
        highest_tile: session.grid().highest_tile(),
    })
}
