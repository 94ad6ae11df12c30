use alloc::vec;
use alloc::vec::Vec;
use rand::{rngs::SmallRng, Rng};

use super::{heatmap, mark, medium::MediumAi, unmark, Opponent};
use crate::core::{fleet_for, BitGrid, Board, BoardError, Coord, Outcome};

/// Medium's hunting plus a heatmap over the ships still afloat.
#[derive(Debug, Clone)]
pub struct HardAi {
    hunter: MediumAi,
    hits: BitGrid,
    blocked: BitGrid,
    remaining: Vec<usize>,
    cluster: Vec<Coord>,
}

impl HardAi {
    pub fn new(grid_size: usize) -> Result<Self, BoardError> {
        Ok(Self {
            hunter: MediumAi::new(grid_size)?,
            hits: BitGrid::try_new(grid_size)?,
            blocked: BitGrid::try_new(grid_size)?,
            remaining: fleet_for(grid_size),
            cluster: Vec::new(),
        })
    }

    /// Lengths of enemy ships not yet reported sunk.
    pub fn remaining_lengths(&self) -> &[usize] {
        &self.remaining
    }

    /// Current probability density over the grid.
    pub fn heat(&self) -> Vec<f64> {
        heatmap::density(self.hits.size(), &self.hits, &self.blocked, &self.remaining)
    }

    fn reset_if_resized(&mut self, grid_size: usize) -> Result<(), BoardError> {
        if self.hits.size() != grid_size {
            *self = HardAi::new(grid_size)?;
        }
        Ok(())
    }

    fn pick_hottest<I>(&self, rng: &mut SmallRng, heat: &[f64], candidates: I) -> Option<Coord>
    where
        I: Iterator<Item = Coord>,
    {
        let n = self.hits.size();
        let mut best: Vec<Coord> = Vec::new();
        let mut best_heat = f64::NEG_INFINITY;
        for c in candidates {
            let h = heat[(c.y - 1) * n + (c.x - 1)];
            if h > best_heat + f64::EPSILON {
                best_heat = h;
                best.clear();
                best.push(c);
            } else if libm::fabs(h - best_heat) <= f64::EPSILON {
                best.push(c);
            }
        }
        if best.is_empty() {
            return None;
        }
        Some(best[rng.random_range(0..best.len())])
    }

    /// Cells of the ship sunk at `target`: the longest straight run of
    /// unsunk hits through it. Ships never touch, so the run is exactly one
    /// ship even while other ships are partly hit.
    fn sunk_run(&self, target: Coord) -> Vec<Coord> {
        let n = self.hits.size();
        let mut best = vec![target];
        for (dx, dy) in [(1isize, 0isize), (0, 1)] {
            let mut run = vec![target];
            for sign in [1isize, -1] {
                let mut c = target;
                while let Some(next) = c.offset(dx * sign, dy * sign, n) {
                    if !self.cluster.contains(&next) {
                        break;
                    }
                    run.push(next);
                    c = next;
                }
            }
            if run.len() > best.len() {
                best = run;
            }
        }
        best
    }

    fn record_sunk(&mut self, target: Coord) {
        let n = self.hits.size();
        let ship = self.sunk_run(target);
        let len = ship.len();
        if let Some(pos) = self.remaining.iter().position(|&l| l == len) {
            self.remaining.remove(pos);
        } else if !self.remaining.is_empty() {
            log::warn!("sunk ship of length {} not in the expected fleet", len);
            // assume the shortest ship that could still contain the run
            if let Some(pos) = self.remaining.iter().rposition(|&l| l >= len) {
                self.remaining.remove(pos);
            }
        }
        self.cluster.retain(|c| !ship.contains(c));
        for c in ship {
            unmark(&mut self.hits, c);
            mark(&mut self.blocked, c);
            for nb in c.surrounding(n) {
                mark(&mut self.blocked, nb);
            }
        }
    }
}

impl Opponent for HardAi {
    fn next_shot(&mut self, rng: &mut SmallRng, grid_size: usize) -> Option<Coord> {
        if self.reset_if_resized(grid_size).is_err() {
            return None;
        }
        let heat = self.heat();
        let choice = if self.hunter.has_probes() {
            let probes: Vec<Coord> = self.hunter.probes().collect();
            self.pick_hottest(rng, &heat, probes.into_iter())
        } else {
            let tried = self.hunter.tried();
            let open = tried
                .iter_unset()
                .filter(|&c| !self.blocked.contains(c))
                .collect::<Vec<_>>();
            if open.is_empty() {
                None
            } else {
                self.pick_hottest(rng, &heat, open.into_iter())
            }
        };
        let target = match choice {
            Some(c) => c,
            None => self.hunter.random_untried(rng, grid_size),
        };
        self.hunter.mark_tried(target);
        Some(target)
    }

    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        board.place_fleet_randomly(rng)
    }

    fn process_answer(&mut self, target: Coord, outcome: Outcome) {
        self.hunter.process_answer(target, outcome);
        match outcome {
            Outcome::Miss => {
                mark(&mut self.blocked, target);
            }
            Outcome::Hit => {
                mark(&mut self.hits, target);
                if !self.cluster.contains(&target) {
                    self.cluster.push(target);
                }
            }
            Outcome::Sunk(_) => {
                if !self.cluster.contains(&target) {
                    self.cluster.push(target);
                }
                self.record_sunk(target);
                // hits on ships still afloat go back on the probe list
                for c in self.cluster.clone() {
                    self.hunter.process_answer(c, Outcome::Hit);
                }
            }
            Outcome::AlreadyShot => {}
        }
    }
}
