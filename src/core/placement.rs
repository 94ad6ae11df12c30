//! Placement rules: a ship must lie inside the grid and may neither overlap
//! nor touch (including diagonally) another ship.

use alloc::vec::Vec;

use crate::core::{
    board::{Board, Cell},
    common::{BoardError, Coord},
    config::is_supported_length,
    ship::{ship_cells, Facing},
};

/// Decide whether a ship of `length` fits on `board` at `origin`.
///
/// # Panics
///
/// Panics if `length` is not a supported ship length. That is a caller bug,
/// not a rule violation.
pub fn can_place(board: &Board, origin: Coord, length: usize, facing: Facing) -> bool {
    check_placement(board, origin, length, facing).is_ok()
}

/// Like [`can_place`] but reports why a placement is refused and, on
/// success, returns the cells the ship would occupy.
///
/// # Panics
///
/// Panics if `length` is not a supported ship length.
pub fn check_placement(
    board: &Board,
    origin: Coord,
    length: usize,
    facing: Facing,
) -> Result<Vec<Coord>, BoardError> {
    assert!(
        is_supported_length(length),
        "unsupported ship length {}",
        length
    );
    let n = board.size();
    let mut cells = Vec::with_capacity(length);
    for (x, y) in ship_cells(origin, length, facing) {
        if x < 1 || y < 1 || x > n as isize || y > n as isize {
            return Err(BoardError::ShipOutOfBounds);
        }
        cells.push(Coord::new(x as usize, y as usize));
    }
    for &c in cells.iter() {
        if occupied(board, c) || c.surrounding(n).any(|nb| occupied(board, nb)) {
            return Err(BoardError::ShipOverlaps);
        }
    }
    Ok(cells)
}

fn occupied(board: &Board, c: Coord) -> bool {
    matches!(
        board.cell(c),
        Some(Cell::Ship(_)) | Some(Cell::Hit) | Some(Cell::SunkShip(_))
    )
}
