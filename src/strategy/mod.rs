//! Opponent strategies
//!
//! Every decision-maker that can fire at a board implements [`Opponent`]:
//! - RelayStrategy: forwards coordinates a human sent over the wire
//! - EasyAi: random shots with a raster fallback
//! - MediumAi: hunts around hits before searching again
//! - HardAi: Medium plus a ship-placement heatmap
//!
//! [`Strategy`] is the closed set of these variants chosen at match setup.

use rand::rngs::SmallRng;

use crate::core::{BitGrid, Board, BoardError, Coord, Difficulty, Outcome};

pub mod easy;
pub mod hard;
pub mod heatmap;
pub mod medium;
pub mod relay;

pub use easy::{raster_next, EasyAi};
pub use hard::HardAi;
pub use heatmap::density;
pub use medium::MediumAi;
pub use relay::RelayStrategy;

/// Interface implemented by every opponent type.
pub trait Opponent: Send {
    /// Choose the next coordinate to fire at, `None` if there is nothing to
    /// fire yet (a relay waiting for its human).
    fn next_shot(&mut self, rng: &mut SmallRng, grid_size: usize) -> Option<Coord>;

    /// The resolver refused `rejected`; choose another target.
    fn retry_shot(&mut self, _rejected: Coord, rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        self.next_shot(rng, grid_size)
    }

    /// Place the full fleet for the board's grid size.
    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError>;

    /// Inform the opponent of how one of its shots resolved. May arrive
    /// long after the shot was chosen.
    fn process_answer(&mut self, _target: Coord, _outcome: Outcome) {}
}

/// The opponent variants a match can be set up with.
#[derive(Debug, Clone)]
pub enum Strategy {
    Relay(RelayStrategy),
    Easy(EasyAi),
    Medium(MediumAi),
    Hard(HardAi),
}

impl Strategy {
    /// Computer opponent for an `n`×`n` grid.
    pub fn computer(difficulty: Difficulty, grid_size: usize) -> Result<Self, BoardError> {
        Ok(match difficulty {
            Difficulty::Easy => Strategy::Easy(EasyAi::new()),
            Difficulty::Medium => Strategy::Medium(MediumAi::new(grid_size)?),
            Difficulty::Hard => Strategy::Hard(HardAi::new(grid_size)?),
        })
    }

    /// Pass-through for a human on the other end of the wire.
    pub fn relay() -> Self {
        Strategy::Relay(RelayStrategy::new())
    }

    /// Difficulty tier, `None` for the relay.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            Strategy::Relay(_) => None,
            Strategy::Easy(_) => Some(Difficulty::Easy),
            Strategy::Medium(_) => Some(Difficulty::Medium),
            Strategy::Hard(_) => Some(Difficulty::Hard),
        }
    }

    /// The relay queue, if this is the human pass-through.
    pub fn as_relay_mut(&mut self) -> Option<&mut RelayStrategy> {
        match self {
            Strategy::Relay(relay) => Some(relay),
            _ => None,
        }
    }
}

impl Opponent for Strategy {
    fn next_shot(&mut self, rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        match self {
            Strategy::Relay(s) => s.next_shot(rng, grid_size),
            Strategy::Easy(s) => s.next_shot(rng, grid_size),
            Strategy::Medium(s) => s.next_shot(rng, grid_size),
            Strategy::Hard(s) => s.next_shot(rng, grid_size),
        }
    }

    fn retry_shot(&mut self, rejected: Coord, rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        match self {
            Strategy::Relay(s) => s.retry_shot(rejected, rng, grid_size),
            Strategy::Easy(s) => s.retry_shot(rejected, rng, grid_size),
            Strategy::Medium(s) => s.retry_shot(rejected, rng, grid_size),
            Strategy::Hard(s) => s.retry_shot(rejected, rng, grid_size),
        }
    }

    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        match self {
            Strategy::Relay(s) => s.place_ships(rng, board),
            Strategy::Easy(s) => s.place_ships(rng, board),
            Strategy::Medium(s) => s.place_ships(rng, board),
            Strategy::Hard(s) => s.place_ships(rng, board),
        }
    }

    fn process_answer(&mut self, target: Coord, outcome: Outcome) {
        match self {
            Strategy::Relay(s) => s.process_answer(target, outcome),
            Strategy::Easy(s) => s.process_answer(target, outcome),
            Strategy::Medium(s) => s.process_answer(target, outcome),
            Strategy::Hard(s) => s.process_answer(target, outcome),
        }
    }
}

/// Fire with `opponent` until `shoot` accepts a target.
///
/// Stops after `grid_size²` attempts, enough for the raster fallback to
/// visit every cell once. Returns `None` if the opponent has nothing to fire
/// or every attempt was rejected.
pub fn fire_until_accepted<O, F>(
    opponent: &mut O,
    rng: &mut SmallRng,
    grid_size: usize,
    mut shoot: F,
) -> Option<(Coord, Outcome)>
where
    O: Opponent + ?Sized,
    F: FnMut(Coord) -> Outcome,
{
    let mut target = opponent.next_shot(rng, grid_size)?;
    for attempt in 1..=grid_size * grid_size {
        let outcome = shoot(target);
        if outcome != Outcome::AlreadyShot {
            return Some((target, outcome));
        }
        if attempt == grid_size * grid_size {
            break;
        }
        target = opponent.retry_shot(target, rng, grid_size)?;
    }
    None
}

/// Set a cell in an AI's bookkeeping grid. Callers only pass shots the
/// resolver accepted or `surrounding(n)` of those, so the cell is in bounds.
pub(crate) fn mark(grid: &mut BitGrid, c: Coord) {
    let marked = grid.set(c);
    debug_assert!(marked.is_ok(), "{} outside {}x{} tracking grid", c, grid.size(), grid.size());
}

/// Clear a cell; same bounds contract as [`mark`].
pub(crate) fn unmark(grid: &mut BitGrid, c: Coord) {
    let cleared = grid.clear(c);
    debug_assert!(cleared.is_ok(), "{} outside {}x{} tracking grid", c, grid.size(), grid.size());
}
