//! A square bit grid sized at runtime.
//!
//! Each row is packed into one unsigned word `T`, so a grid of size `n` needs
//! `n <= T::BITS`. The default `u32` word covers every playable grid size.
//! Coordinates are the 1-based [`Coord`]s used throughout the core.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use num_traits::{PrimInt, Unsigned, Zero};

use crate::core::common::Coord;

/// Errors returned by bit-grid operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitGridError {
    /// Requested width `n` exceeds the bits available in one row word.
    SizeTooLarge { n: usize, capacity: usize },
    /// Coordinate lies outside `[1, n]`.
    OutOfBounds { x: usize, y: usize },
}

impl fmt::Display for BitGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitGridError::SizeTooLarge { n, capacity } => {
                write!(f, "SizeTooLarge: n={} exceeds row capacity {}", n, capacity)
            }
            BitGridError::OutOfBounds { x, y } => write!(f, "OutOfBounds: x={}, y={}", x, y),
        }
    }
}

/// An `n`×`n` set of cells, one word per row.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BitGrid<T = u32>
where
    T: PrimInt + Unsigned + Zero,
{
    n: usize,
    rows: Vec<T>,
}

impl<T> BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Create an empty grid, failing if one row does not fit in `T`.
    pub fn try_new(n: usize) -> Result<Self, BitGridError> {
        let capacity = core::mem::size_of::<T>() * 8;
        if n > capacity {
            return Err(BitGridError::SizeTooLarge { n, capacity });
        }
        Ok(Self {
            n,
            rows: vec![T::zero(); n],
        })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.rows.iter().map(|r| r.count_ones() as usize).sum()
    }

    /// Returns true if no cell is set.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_zero())
    }

    /// Gets the cell at `c`.
    pub fn get(&self, c: Coord) -> Result<bool, BitGridError> {
        self.check_bounds(c)?;
        Ok(((self.rows[c.y - 1] >> (c.x - 1)) & T::one()) != T::zero())
    }

    /// Gets the cell at `c`, treating out-of-grid cells as unset.
    pub fn contains(&self, c: Coord) -> bool {
        self.get(c).unwrap_or(false)
    }

    /// Sets the cell at `c`.
    pub fn set(&mut self, c: Coord) -> Result<(), BitGridError> {
        self.check_bounds(c)?;
        let row = &mut self.rows[c.y - 1];
        *row = *row | (T::one() << (c.x - 1));
        Ok(())
    }

    /// Clears the cell at `c`.
    pub fn clear(&mut self, c: Coord) -> Result<(), BitGridError> {
        self.check_bounds(c)?;
        let row = &mut self.rows[c.y - 1];
        *row = *row & !(T::one() << (c.x - 1));
        Ok(())
    }

    #[inline]
    fn check_bounds(&self, c: Coord) -> Result<(), BitGridError> {
        if c.in_grid(self.n) {
            Ok(())
        } else {
            Err(BitGridError::OutOfBounds { x: c.x, y: c.y })
        }
    }

    /// Iterator over the unset cells in row-major order.
    pub fn iter_unset(&self) -> impl Iterator<Item = Coord> + '_ {
        let n = self.n;
        (1..=n)
            .flat_map(move |y| (1..=n).map(move |x| Coord::new(x, y)))
            .filter(move |&c| !self.contains(c))
    }
}

impl<T> fmt::Debug for BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid<{}>:", self.n)?;
        for y in 1..=self.n {
            for x in 1..=self.n {
                let bit = if self.contains(Coord::new(x, y)) { '■' } else { '□' };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
