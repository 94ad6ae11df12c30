//! Common types for the match core: coordinates, shot outcomes and board errors.

use crate::core::bitgrid::BitGridError;

/// Identifier of a ship within one board.
pub type ShipId = usize;

/// A 1-based grid coordinate; `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the coordinate lies inside an `n`×`n` grid.
    pub fn in_grid(&self, n: usize) -> bool {
        (1..=n).contains(&self.x) && (1..=n).contains(&self.y)
    }

    /// Zero-based `(col, row)` as carried on the wire.
    pub fn to_wire(self) -> (usize, usize) {
        (self.x - 1, self.y - 1)
    }

    /// Build a coordinate from zero-based wire values. Values too large to
    /// convert saturate and land outside every grid.
    pub fn from_wire(col: usize, row: usize) -> Self {
        Self::new(col.saturating_add(1), row.saturating_add(1))
    }

    /// Moves by `(dx, dy)`, returning `None` when the result would leave an
    /// `n`×`n` grid.
    pub fn offset(self, dx: isize, dy: isize, n: usize) -> Option<Coord> {
        let x = self.x as isize + dx;
        let y = self.y as isize + dy;
        if x < 1 || y < 1 || x > n as isize || y > n as isize {
            return None;
        }
        Some(Coord::new(x as usize, y as usize))
    }

    /// The four orthogonal neighbours that lie inside the grid.
    pub fn orthogonal(self, n: usize) -> impl Iterator<Item = Coord> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy, n))
    }

    /// The eight surrounding cells that lie inside the grid.
    pub fn surrounding(self, n: usize) -> impl Iterator<Item = Coord> {
        (-1isize..=1)
            .flat_map(|dy| (-1isize..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| self.offset(dx, dy, n))
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Result of resolving a shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Shot landed in open water.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot sank the ship, carrying its id on the resolving board.
    Sunk(ShipId),
    /// Cell was already resolved; nothing changed.
    AlreadyShot,
}

impl Outcome {
    /// Wire code used by the `answer` command, `None` for a rejected shot.
    pub fn answer_code(&self) -> Option<u8> {
        match self {
            Outcome::Miss => Some(0),
            Outcome::Hit => Some(1),
            Outcome::Sunk(_) => Some(2),
            Outcome::AlreadyShot => None,
        }
    }

    /// Returns `true` for outcomes that struck a ship.
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit | Outcome::Sunk(_))
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bit-grid error.
    BitGrid(BitGridError),
    /// Grid size outside the playable range.
    InvalidGridSize(usize),
    /// Ship would leave the grid.
    ShipOutOfBounds,
    /// Ship overlaps or touches another ship.
    ShipOverlaps,
    /// No more ships of this length may be placed.
    FleetQuotaExceeded(usize),
    /// No ship occupies the given cell.
    NoShipAt(Coord),
    /// Unable to place ship (random or manual placement failed).
    UnableToPlaceShip,
}

impl From<BitGridError> for BoardError {
    fn from(err: BitGridError) -> Self {
        BoardError::BitGrid(err)
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::BitGrid(e) => write!(f, "BitGrid error: {}", e),
            BoardError::InvalidGridSize(n) => write!(f, "Grid size {} is not playable", n),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps or touches another ship"),
            BoardError::FleetQuotaExceeded(len) => {
                write!(f, "No ship of length {} left to place", len)
            }
            BoardError::NoShipAt(c) => write!(f, "No ship at {}", c),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
