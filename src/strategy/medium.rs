use alloc::vec::Vec;
use rand::{rngs::SmallRng, Rng};

use super::{easy::raster_next, mark, Opponent};
use crate::core::{BitGrid, Board, BoardError, Coord, Outcome};

/// Hunts around every hit before going back to random search.
#[derive(Debug, Clone)]
pub struct MediumAi {
    tried: BitGrid,
    probes: Vec<Coord>,
}

impl MediumAi {
    pub fn new(grid_size: usize) -> Result<Self, BoardError> {
        Ok(Self {
            tried: BitGrid::try_new(grid_size)?,
            probes: Vec::new(),
        })
    }

    /// Cells this AI has already chosen.
    pub fn tried(&self) -> &BitGrid {
        &self.tried
    }

    /// Neighbours of earlier hits still queued for probing.
    pub fn probes(&self) -> impl Iterator<Item = Coord> + '_ {
        self.probes.iter().copied().filter(|&c| !self.tried.contains(c))
    }

    pub(crate) fn has_probes(&self) -> bool {
        self.probes().next().is_some()
    }

    pub(crate) fn mark_tried(&mut self, c: Coord) {
        mark(&mut self.tried, c);
        self.probes.retain(|&p| p != c);
    }

    fn reset_if_resized(&mut self, grid_size: usize) {
        if self.tried.size() != grid_size {
            if let Ok(fresh) = BitGrid::try_new(grid_size) {
                self.tried = fresh;
            }
            self.probes.clear();
        }
    }

    /// Random cell not tried yet, falling back to any cell once the whole
    /// grid has been covered.
    pub(crate) fn random_untried(&self, rng: &mut SmallRng, grid_size: usize) -> Coord {
        let mut c = Coord::new(
            rng.random_range(1..=grid_size),
            rng.random_range(1..=grid_size),
        );
        for _ in 0..grid_size * grid_size {
            if !self.tried.contains(c) {
                break;
            }
            c = raster_next(c, grid_size);
        }
        c
    }
}

impl Opponent for MediumAi {
    fn next_shot(&mut self, rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        self.reset_if_resized(grid_size);
        while let Some(c) = self.probes.pop() {
            if !self.tried.contains(c) {
                self.mark_tried(c);
                return Some(c);
            }
        }
        let c = self.random_untried(rng, grid_size);
        self.mark_tried(c);
        Some(c)
    }

    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        board.place_fleet_randomly(rng)
    }

    fn process_answer(&mut self, target: Coord, outcome: Outcome) {
        self.mark_tried(target);
        match outcome {
            Outcome::Hit => {
                let n = self.tried.size();
                for nb in target.orthogonal(n) {
                    if !self.tried.contains(nb) && !self.probes.contains(&nb) {
                        self.probes.push(nb);
                    }
                }
            }
            Outcome::Sunk(_) => self.probes.clear(),
            Outcome::Miss | Outcome::AlreadyShot => {}
        }
    }
}
