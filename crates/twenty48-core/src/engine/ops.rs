use super::state::{Grid, Move, Score, Tile};

/// Slide/merge tiles in `direction` and return the new grid plus the points gained.
///
/// Pure: no randomness, the input is left untouched. Up/down are handled by
/// transposing so that every direction reduces to a leftward pass over rows;
/// right/down additionally mirror each row around that pass.
pub fn merge(grid: &Grid, direction: Move) -> (Grid, Score) {
    let mut work = to_leftward(grid, direction);
    let mut gained = 0;
    for row in work.rows_mut() {
        gained += merge_line_left(row);
    }
    (from_leftward(work, direction), gained)
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn shift(grid: &Grid, direction: Move) -> Grid {
    merge(grid, direction).0
}

/// True if sliding in `direction` would change the grid.
pub fn can_move(grid: &Grid, direction: Move) -> bool {
    shift(grid, direction) != *grid
}

/// Directions that change the grid, in `Move::ALL` order.
pub fn legal_moves(grid: &Grid) -> Vec<Move> {
    Move::ALL
        .into_iter()
        .filter(|&dir| can_move(grid, dir))
        .collect()
}

/// True if the grid is full and no move in any direction changes it.
pub fn is_game_over(grid: &Grid) -> bool {
    // A free cell always leaves some direction that moves a tile into it.
    if !grid.is_full() {
        return false;
    }
    Move::ALL.into_iter().all(|dir| !can_move(grid, dir))
}

fn to_leftward(grid: &Grid, direction: Move) -> Grid {
    match direction {
        Move::Left => grid.clone(),
        Move::Right => grid.reverse_rows(),
        Move::Up => grid.transpose(),
        Move::Down => grid.transpose().reverse_rows(),
    }
}

fn from_leftward(work: Grid, direction: Move) -> Grid {
    match direction {
        Move::Left => work,
        Move::Right => work.reverse_rows(),
        Move::Up => work.transpose(),
        Move::Down => work.reverse_rows().transpose(),
    }
}

/// Compact, combine once, compact again. Returns the points scored by the line.
pub(crate) fn merge_line_left(line: &mut [Tile]) -> Score {
    compact(line);
    let gained = combine(line);
    compact(line);
    gained
}

/// Move non-zero tiles to the front keeping their order; zero-fill the tail.
fn compact(line: &mut [Tile]) {
    let mut write = 0;
    for read in 0..line.len() {
        let val = line[read];
        if val != 0 {
            line[write] = val;
            write += 1;
        }
    }
    line[write..].fill(0);
}

/// Single left-to-right pass merging equal neighbours into the left cell.
///
/// The right cell of a merged pair becomes 0, which also stops the freshly
/// doubled tile from merging again in the same pass. A pair whose sum does
/// not fit in `Tile` stays put.
fn combine(line: &mut [Tile]) -> Score {
    let mut gained = 0;
    for i in 1..line.len() {
        let left = line[i - 1];
        if left == 0 || left != line[i] {
            continue;
        }
        let Some(doubled) = left.checked_mul(2) else {
            continue;
        };
        line[i - 1] = doubled;
        line[i] = 0;
        gained += Score::from(doubled);
    }
    gained
}
