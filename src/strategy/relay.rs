use alloc::collections::VecDeque;
use rand::rngs::SmallRng;

use super::Opponent;
use crate::core::{Board, BoardError, Coord};

/// Forwards shots a remote human made. Holds no decision logic.
#[derive(Debug, Clone, Default)]
pub struct RelayStrategy {
    incoming: VecDeque<Coord>,
}

impl RelayStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a coordinate received from the wire.
    pub fn push(&mut self, target: Coord) {
        self.incoming.push_back(target);
    }

    /// Number of relayed shots not yet consumed.
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }
}

impl Opponent for RelayStrategy {
    fn next_shot(&mut self, _rng: &mut SmallRng, _grid_size: usize) -> Option<Coord> {
        self.incoming.pop_front()
    }

    /// A refused human shot is dropped; the human has to fire again.
    fn retry_shot(&mut self, _rejected: Coord, _rng: &mut SmallRng, _grid_size: usize) -> Option<Coord> {
        None
    }

    /// The remote places its own ships.
    fn place_ships(&mut self, _rng: &mut SmallRng, _board: &mut Board) -> Result<(), BoardError> {
        Ok(())
    }
}
