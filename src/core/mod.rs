//! Core match logic (no_std compatible)
//!
//! Boards, placement rules, shot resolution, the turn state machine and the
//! save snapshot. Needs only `alloc`, so it runs unchanged inside the
//! session runtime, the simulator or an embedded front end.

pub mod bitgrid;
pub mod board;
pub mod common;
pub mod config;
pub mod game;
pub mod placement;
pub mod resolver;
pub mod ship;
pub mod turn;

// Re-export commonly used types
pub use bitgrid::{BitGrid, BitGridError};
pub use board::{Board, Cell};
pub use common::{BoardError, Coord, Outcome, ShipId};
pub use config::*;
pub use game::{Difficulty, MatchState, Mode, Role, TargetView};
pub use placement::{can_place, check_placement};
pub use resolver::resolve_shot;
pub use ship::{ship_cells, Facing, Ship};
pub use turn::{Phase, Side, TurnCoordinator, TurnError};
