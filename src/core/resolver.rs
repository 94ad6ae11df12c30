//! Shot resolution against a single board.

use crate::core::{
    board::{Board, Cell},
    common::{Coord, Outcome},
};

/// Apply a shot at `target` and report what it struck.
///
/// Re-shooting a resolved cell (or shooting outside the grid) returns
/// [`Outcome::AlreadyShot`] and leaves the board untouched.
pub fn resolve_shot(board: &mut Board, target: Coord) -> Outcome {
    match board.cell(target) {
        None | Some(Cell::Hit) | Some(Cell::Miss) | Some(Cell::SunkShip(_)) => Outcome::AlreadyShot,
        Some(Cell::Empty) => {
            board.set_cell(target, Cell::Miss);
            Outcome::Miss
        }
        Some(Cell::Ship(id)) => {
            board.set_cell(target, Cell::Hit);
            let sunk_cells = match board.ship_mut(id) {
                Some(ship) => {
                    ship.register_hit();
                    if ship.is_sunk() {
                        Some(ship.cells().to_vec())
                    } else {
                        None
                    }
                }
                None => {
                    log::error!("cell {} maps to unknown ship {}", target, id);
                    None
                }
            };
            match sunk_cells {
                Some(cells) => {
                    for c in cells {
                        board.set_cell(c, Cell::SunkShip(id));
                    }
                    Outcome::Sunk(id)
                }
                None => Outcome::Hit,
            }
        }
    }
}
