use rand::{rngs::SmallRng, Rng};

use super::Opponent;
use crate::core::{Board, BoardError, Coord};

/// Shoots at random and never learns from the outcome.
#[derive(Debug, Clone, Default)]
pub struct EasyAi;

impl EasyAi {
    pub fn new() -> Self {
        Self
    }
}

/// Next cell of the raster scan used after a refused shot: step one column
/// right, wrapping into the next row, and from the last cell back to the
/// first. Visits all `n²` cells before repeating.
pub fn raster_next(c: Coord, n: usize) -> Coord {
    let mut x = c.x;
    let mut y = c.y;
    y += x / n;
    y %= n + 1;
    if y == 0 {
        y = 1;
    }
    x += 1;
    x %= n + 1;
    if x == 0 {
        x = 1;
    }
    Coord::new(x, y)
}

impl Opponent for EasyAi {
    fn next_shot(&mut self, rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        Some(Coord::new(
            rng.random_range(1..=grid_size),
            rng.random_range(1..=grid_size),
        ))
    }

    fn retry_shot(&mut self, rejected: Coord, _rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        Some(raster_next(rejected, grid_size))
    }

    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        board.place_fleet_randomly(rng)
    }
}
