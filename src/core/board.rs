//! One side's grid: cell states and ship placements.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::core::{
    common::{BoardError, Coord, ShipId},
    config::{
        fleet_for, is_valid_grid_size, ship_counts, MAX_LAYOUT_ATTEMPTS, MAX_SHIP_ATTEMPTS,
        SHIP_LENGTHS,
    },
    placement::check_placement,
    ship::{Facing, Ship},
};

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    Empty,
    Ship(ShipId),
    Hit,
    Miss,
    SunkShip(ShipId),
}

/// Cell grid plus the ships placed on it.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    n: usize,
    cells: Vec<Cell>,
    ships: Vec<Ship>,
    next_id: ShipId,
}

impl Board {
    /// Create an empty `n`×`n` board.
    pub fn new(n: usize) -> Result<Self, BoardError> {
        if !is_valid_grid_size(n) {
            return Err(BoardError::InvalidGridSize(n));
        }
        Ok(Board {
            n,
            cells: vec![Cell::Empty; n * n],
            ships: Vec::new(),
            next_id: 0,
        })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    fn index(&self, c: Coord) -> Option<usize> {
        if c.in_grid(self.n) {
            Some((c.y - 1) * self.n + (c.x - 1))
        } else {
            None
        }
    }

    /// State of the cell at `c`, `None` outside the grid.
    pub fn cell(&self, c: Coord) -> Option<Cell> {
        self.index(c).map(|i| self.cells[i])
    }

    pub(crate) fn set_cell(&mut self, c: Coord, cell: Cell) {
        if let Some(i) = self.index(c) {
            self.cells[i] = cell;
        }
    }

    /// Ships placed on this board.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Ship with the given id.
    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id() == id)
    }

    pub(crate) fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id() == id)
    }

    /// Ship covering `c`, if any.
    pub fn ship_at(&self, c: Coord) -> Option<&Ship> {
        self.ships.iter().find(|s| s.cells().contains(&c))
    }

    /// Place a ship at `origin` extending towards `facing`.
    pub fn place(&mut self, origin: Coord, length: usize, facing: Facing) -> Result<ShipId, BoardError> {
        if self.remaining_of(length) == 0 {
            return Err(BoardError::FleetQuotaExceeded(length));
        }
        let cells = check_placement(self, origin, length, facing)?;
        let id = self.next_id;
        self.next_id += 1;
        for &c in cells.iter() {
            self.set_cell(c, Cell::Ship(id));
        }
        self.ships.push(Ship::new(id, origin, facing, cells));
        Ok(id)
    }

    /// Take an untouched ship off the board so it can be placed again.
    pub fn remove_ship_at(&mut self, c: Coord) -> Result<Ship, BoardError> {
        let pos = self
            .ships
            .iter()
            .position(|s| s.cells().contains(&c) && s.hit_count() == 0)
            .ok_or(BoardError::NoShipAt(c))?;
        let ship = self.ships.remove(pos);
        for &cell in ship.cells() {
            self.set_cell(cell, Cell::Empty);
        }
        Ok(ship)
    }

    /// Remove every ship and reset all cells.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = Cell::Empty);
        self.ships.clear();
        self.next_id = 0;
    }

    /// How many more ships of `length` the fleet allows.
    pub fn remaining_of(&self, length: usize) -> usize {
        let Some(idx) = SHIP_LENGTHS.iter().position(|&l| l == length) else {
            return 0;
        };
        let placed = self.ships.iter().filter(|s| s.length() == length).count();
        ship_counts(self.n)[idx].saturating_sub(placed)
    }

    /// Lengths still to be placed, longest first.
    pub fn unplaced_fleet(&self) -> Vec<usize> {
        let mut remaining = fleet_for(self.n);
        for ship in self.ships.iter() {
            if let Some(pos) = remaining.iter().position(|&l| l == ship.length()) {
                remaining.remove(pos);
            }
        }
        remaining
    }

    /// Returns `true` once every ship of the fleet is on the board.
    pub fn is_fleet_complete(&self) -> bool {
        self.unplaced_fleet().is_empty()
    }

    /// Number of ships already sunk.
    pub fn sunk_count(&self) -> usize {
        self.ships.iter().filter(|s| s.is_sunk()).count()
    }

    /// Returns `true` when a placed fleet has been sunk entirely.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(|s| s.is_sunk())
    }

    /// Returns a random fitting `(origin, facing)` for a ship of `length`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<(Coord, Facing), BoardError> {
        for _ in 0..MAX_SHIP_ATTEMPTS {
            let facing = Facing::ALL[rng.random_range(0..Facing::ALL.len())];
            let origin = Coord::new(rng.random_range(1..=self.n), rng.random_range(1..=self.n));
            if check_placement(self, origin, length, facing).is_ok() {
                return Ok((origin, facing));
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Replace any existing ships with a complete random fleet.
    ///
    /// A layout that paints itself into a corner is thrown away and a fresh
    /// one started; the board is never left partially placed on success.
    pub fn place_fleet_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        for attempt in 1..=MAX_LAYOUT_ATTEMPTS {
            self.clear();
            if self.try_fill_fleet(rng).is_ok() {
                return Ok(());
            }
            log::debug!("fleet layout attempt {} failed on {}x{} grid", attempt, self.n, self.n);
        }
        self.clear();
        Err(BoardError::UnableToPlaceShip)
    }

    fn try_fill_fleet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        for length in self.unplaced_fleet() {
            let (origin, facing) = self.random_placement(rng, length)?;
            self.place(origin, length, facing)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{} {{", self.n, self.n)?;
        for y in 1..=self.n {
            write!(f, "  ")?;
            for x in 1..=self.n {
                let ch = match self.cells[(y - 1) * self.n + (x - 1)] {
                    Cell::Empty => '.',
                    Cell::Ship(_) => '#',
                    Cell::Hit => 'X',
                    Cell::Miss => 'o',
                    Cell::SunkShip(_) => '*',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ships: {:?}\n}}", self.ships)
    }
}
