use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{Grid, Tile};

/// Chance that a spawned tile is a 4 rather than a 2.
pub const FOUR_PROBABILITY: f64 = 0.1;

/// Insert a random 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
///
/// A full grid comes back unchanged; callers that care about the board being
/// full check `Grid::is_full` (or `is_game_over`) themselves.
pub fn spawn<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    let empties = grid.empty_cells();
    let Some(&(row, col)) = empties.choose(rng) else {
        return grid.clone();
    };
    let mut out = grid.clone();
    out.set(row, col, generate_random_tile(rng));
    out
}

/// Convenience: like `spawn` but uses thread-local RNG.
///
/// For reproducible behavior, prefer `spawn(&grid, &mut impl Rng)`.
pub fn insert_random_tile(grid: &Grid) -> Grid {
    let mut rng = rand::thread_rng();
    spawn(grid, &mut rng)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_bool(FOUR_PROBABILITY) { 4 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_test_insert_random_tile() {
        let mut game = Grid::empty(4);
        for _ in 0..16 {
            game = insert_random_tile(&game);
        }
        assert_eq!(game.count_empty(), 0);
        assert!(game.tiles().all(|v| v == 2 || v == 4));
    }

    #[test]
    fn single_empty_cell_is_the_one_filled() {
        let full_but_one = Grid::from_rows(vec![
            vec![2, 4, 8, 16],
            vec![32, 64, 128, 256],
            vec![512, 1024, 0, 2],
            vec![4, 8, 16, 32],
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let next = spawn(&full_but_one, &mut rng);
            assert!(matches!(next.get(2, 2), 2 | 4));
            for (r, c) in (0..4).flat_map(|r| (0..4).map(move |c| (r, c))) {
                if (r, c) != (2, 2) {
                    assert_eq!(next.get(r, c), full_but_one.get(r, c));
                }
            }
        }
    }

    #[test]
    fn full_grid_is_returned_unchanged() {
        let full = Grid::from_rows(vec![vec![2, 4], vec![8, 16]]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(spawn(&full, &mut rng), full);
    }

    #[test]
    fn seeded_spawns_are_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let mut ga = Grid::empty(4);
        let mut gb = Grid::empty(4);
        for _ in 0..10 {
            ga = spawn(&ga, &mut a);
            gb = spawn(&gb, &mut b);
        }
        assert_eq!(ga, gb);
    }

    #[test]
    fn four_ratio_is_roughly_one_in_ten() {
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 20_000;
        let fours = (0..n).filter(|_| generate_random_tile(&mut rng) == 4).count();
        let ratio = fours as f64 / n as f64;
        assert!((0.08..0.12).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn every_empty_cell_gets_picked_eventually() {
        let mut rng = StdRng::seed_from_u64(99);
        let empty = Grid::empty(3);
        let mut seen = [false; 9];
        for _ in 0..500 {
            let g = spawn(&empty, &mut rng);
            let (idx, _) = g.tiles().enumerate().find(|&(_, v)| v != 0).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
