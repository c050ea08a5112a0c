use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::warn;
use twenty48_core::{Grid, Input, Move, Presenter, Score, Tile};

use crate::palette::{Palette, Rgb};

const CELL_WIDTH: usize = 7;

/// Map one line of player input to an `Input`.
///
/// Accepts arrow words, wasd and vim keys. Unknown text maps to `Input::None`.
pub fn parse_command(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Input::Quit,
        "w" | "k" | "up" => Input::Move(Move::Up),
        "s" | "j" | "down" => Input::Move(Move::Down),
        "a" | "h" | "left" => Input::Move(Move::Left),
        "d" | "l" | "right" => Input::Move(Move::Right),
        "u" | "undo" => Input::Undo,
        "r" | "reset" => Input::Reset,
        _ => Input::None,
    }
}

/// Line-driven terminal presenter.
///
/// Reads one command per line from `input` (blocking) and draws to `out`.
/// With a palette the board is painted with 24-bit ANSI colours; without one
/// it falls back to the grid's plain text rendering.
pub struct TermPresenter<R, W> {
    input: R,
    out: W,
    palette: Option<Palette>,
    line: String,
}

impl<R: BufRead, W: Write> TermPresenter<R, W> {
    pub fn new(input: R, out: W, palette: Option<Palette>) -> Self {
        Self {
            input,
            out,
            palette,
            line: String::new(),
        }
    }

    pub fn print_help(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "moves: w/a/s/d, h/j/k/l or up/down/left/right; u = undo, r = reset, q = quit"
        )?;
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

fn draw_colored<W: Write>(out: &mut W, grid: &Grid, palette: &Palette) -> Result<()> {
    let text = palette.text();
    for row in grid.rows() {
        // Three terminal lines per cell row so tiles read as blocks.
        for band in 0..3 {
            for &tile in row {
                let label = if band == 1 { label(tile) } else { String::new() };
                write!(
                    out,
                    "{}{}{:^width$}\x1b[0m",
                    bg(palette.background(tile)),
                    fg(text),
                    label,
                    width = CELL_WIDTH
                )?;
                write!(out, "{} \x1b[0m", bg(palette.board()))?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn label(tile: Tile) -> String {
    if tile == 0 { String::new() } else { tile.to_string() }
}

fn bg([r, g, b]: Rgb) -> String {
    format!("\x1b[48;2;{r};{g};{b}m")
}

fn fg([r, g, b]: Rgb) -> String {
    format!("\x1b[38;2;{r};{g};{b}m")
}

impl<R: BufRead, W: Write> Presenter for TermPresenter<R, W> {
    fn poll_input(&mut self) -> Result<Input> {
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            self.line.clear();
            let read = self
                .input
                .read_line(&mut self.line)
                .context("reading player input")?;
            if read == 0 {
                return Ok(Input::Quit);
            }
            if self.line.trim().is_empty() {
                continue;
            }
            let input = parse_command(&self.line);
            if input == Input::None {
                warn!("unrecognised command {:?}", self.line.trim());
            }
            return Ok(input);
        }
    }

    fn draw_board(&mut self, grid: &Grid) -> Result<()> {
        writeln!(self.out)?;
        match &self.palette {
            Some(palette) => draw_colored(&mut self.out, grid, palette)?,
            None => write!(self.out, "{grid}")?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn display_score(&mut self, score: Score) -> Result<()> {
        writeln!(self.out, "Score: {score}")?;
        Ok(())
    }

    fn display_high_score(&mut self, high_score: Score) -> Result<()> {
        writeln!(self.out, "High Score: {high_score}")?;
        self.out.flush()?;
        Ok(())
    }

    fn display_game_over(&mut self, score: Score) -> Result<()> {
        writeln!(
            self.out,
            "Game over! Final score {score}. u = undo, r = reset, q = quit"
        )?;
        self.out.flush()?;
        Ok(())
    }
}
