//! Ship definitions: facing, occupied cells and hit tracking.

use alloc::vec::Vec;
use core::fmt;

use crate::core::common::{Coord, ShipId};

/// Direction a ship extends from its origin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Unit step `(dx, dy)` from one cell of the ship to the next.
    pub fn step(self) -> (isize, isize) {
        match self {
            Facing::North => (0, -1),
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
        }
    }
}

/// Cells covered by a ship of `length` starting at `origin`, in order from
/// the origin. Cells may fall outside any grid; callers bound-check.
pub fn ship_cells(origin: Coord, length: usize, facing: Facing) -> Vec<(isize, isize)> {
    let (dx, dy) = facing.step();
    (0..length as isize)
        .map(|i| (origin.x as isize + dx * i, origin.y as isize + dy * i))
        .collect()
}

/// A ship placed on a board.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    id: ShipId,
    origin: Coord,
    facing: Facing,
    cells: Vec<Coord>,
    hits: usize,
}

impl Ship {
    pub(crate) fn new(id: ShipId, origin: Coord, facing: Facing, cells: Vec<Coord>) -> Self {
        Self {
            id,
            origin,
            facing,
            cells,
            hits: 0,
        }
    }

    /// Id of the ship on its board.
    pub fn id(&self) -> ShipId {
        self.id
    }

    /// Number of cells the ship covers.
    pub fn length(&self) -> usize {
        self.cells.len()
    }

    /// Origin (bow) of the ship.
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Direction the ship extends from its origin.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Occupied cells, starting at the origin.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Number of segments hit so far.
    pub fn hit_count(&self) -> usize {
        self.hits
    }

    /// Record a hit on one segment. Saturates at the ship length.
    pub(crate) fn register_hit(&mut self) {
        if self.hits < self.length() {
            self.hits += 1;
        }
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits == self.length()
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ id: {}, origin: {}, facing: {:?}, length: {}, hits: {} }}",
            self.id,
            self.origin,
            self.facing,
            self.length(),
            self.hits,
        )
    }
}
