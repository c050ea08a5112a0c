use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::{ops, spawn};
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// Value held by a cell: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;
/// Points accumulated from merges.
pub type Score = u64;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in the order the engine probes them.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `up`/`down`/`left`/`right` (case-insensitive, surrounding whitespace ignored).
///
/// Anything else is rejected here so it never reaches the merge engine.
///
/// ```
/// use twenty48_core::engine::Move;
/// assert_eq!("Left".parse::<Move>().unwrap(), Move::Left);
/// assert!("sideways".parse::<Move>().is_err());
/// ```
impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            other => Err(GameError::invalid(format!("unknown direction '{other}'"))),
        }
    }
}

/// Square N x N board stored row-major.
///
/// Cells hold 0 (empty) or a power of two. The side length is fixed once the
/// grid is built; every transformation returns a grid of the same size, so two
/// grids can be compared by value to tell whether a move did anything.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An all-empty grid of side `size`.
    pub fn empty(size: usize) -> Self {
        debug_assert!(size > 0, "grid side must be positive");
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from explicit rows.
    ///
    /// Rows must form a non-empty square and every value must be 0 or a power
    /// of two >= 2.
    ///
    /// ```
    /// use twenty48_core::engine::Grid;
    /// let g = Grid::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
    /// assert_eq!(g.size(), 2);
    /// assert!(Grid::from_rows(vec![vec![3, 0], vec![0, 0]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GameError> {
        let size = rows.len();
        if size == 0 {
            return Err(GameError::invalid("grid must have at least one row"));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(GameError::invalid(format!(
                    "row {r} has {} cells, expected {size}",
                    row.len()
                )));
            }
            if let Some(&bad) = row.iter().find(|&&v| !is_valid_tile(v)) {
                return Err(GameError::invalid(format!(
                    "row {r} holds {bad}, which is not 0 or a power of two >= 2"
                )));
            }
            cells.extend(row);
        }
        Ok(Grid { size, cells })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at (`row`, `col`). Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        debug_assert!(is_valid_tile(value));
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) outside {n}x{n} grid",
            n = self.size
        );
        row * self.size + col
    }

    /// Borrow row `idx`.
    pub fn row(&self, idx: usize) -> &[Tile] {
        let start = idx * self.size;
        &self.cells[start..start + self.size]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.size)
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Tile> {
        self.cells.chunks_mut(self.size)
    }

    /// Copy out the rows, e.g. for rendering.
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    /// Iterate tile values in row-major order.
    #[inline]
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().copied()
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Count the number of empty cells on the board.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Return the highest tile value (e.g., 2048) present on the board, 0 if empty.
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Rows become columns.
    pub fn transpose(&self) -> Grid {
        let n = self.size;
        let mut out = Grid::empty(n);
        for r in 0..n {
            for c in 0..n {
                out.cells[c * n + r] = self.cells[r * n + c];
            }
        }
        out
    }

    /// Mirror every row left-to-right.
    pub fn reverse_rows(&self) -> Grid {
        let mut out = self.clone();
        for row in out.rows_mut() {
            row.reverse();
        }
        out
    }

    /// Slide/merge in `dir` and report the points gained. No randomness.
    ///
    /// ```
    /// use twenty48_core::engine::{Grid, Move};
    /// let g = Grid::from_rows(vec![vec![2, 2], vec![0, 0]]).unwrap();
    /// let (next, gained) = g.merge(Move::Left);
    /// assert_eq!(next.row(0), &[4, 0]);
    /// assert_eq!(gained, 4);
    /// ```
    #[inline]
    pub fn merge(&self, dir: Move) -> (Grid, Score) {
        ops::merge(self, dir)
    }

    /// Return the grid resulting from sliding/merging tiles in `dir` (no random insert).
    #[inline]
    pub fn shift(&self, dir: Move) -> Grid {
        ops::shift(self, dir)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty slot, using the provided RNG.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_core::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::empty(4).with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        spawn::spawn(self, rng)
    }

    /// True when the grid is full and no direction changes it.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }
}

#[inline]
pub(crate) fn is_valid_tile(v: Tile) -> bool {
    v == 0 || (v >= 2 && v.is_power_of_two())
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = GameError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(g: Grid) -> Self {
        g.to_rows()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("rows", &self.to_rows())
            .finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8 - 1);
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

pub(crate) fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{x:^7}"),
    }
}
