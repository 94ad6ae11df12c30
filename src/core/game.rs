//! Match-level state shared by every mode: the local record of shots at the
//! enemy and the serializable snapshot used for save/load.

use alloc::vec::Vec;

use crate::core::{
    bitgrid::BitGrid,
    board::Board,
    common::{BoardError, Coord, Outcome},
    config::fleet_for,
    turn::TurnCoordinator,
};

/// Who the local player is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Computer opponent of the given difficulty on this machine.
    Computer(Difficulty),
    /// Human (or remote autopilot) over the wire.
    Networked,
}

/// AI difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Which end of a networked match this endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Announces size or load and fires first.
    Host,
    /// Follows the host's announcements.
    Guest,
}

/// What the local side knows about the enemy grid from its own shots.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetView {
    shots: BitGrid,
    hits: BitGrid,
    sunk: usize,
    fleet_size: usize,
}

impl TargetView {
    pub fn new(n: usize) -> Result<Self, BoardError> {
        Ok(Self {
            shots: BitGrid::try_new(n)?,
            hits: BitGrid::try_new(n)?,
            sunk: 0,
            fleet_size: fleet_for(n).len(),
        })
    }

    pub fn size(&self) -> usize {
        self.shots.size()
    }

    /// Returns `true` if the local side already fired at `c`.
    pub fn is_shot(&self, c: Coord) -> bool {
        self.shots.contains(c)
    }

    /// Cells fired at so far.
    pub fn shots(&self) -> &BitGrid {
        &self.shots
    }

    /// Cells that struck a ship.
    pub fn hits(&self) -> &BitGrid {
        &self.hits
    }

    /// Number of enemy ships reported sunk.
    pub fn sunk_count(&self) -> usize {
        self.sunk
    }

    /// Returns `true` once every enemy ship is reported sunk.
    pub fn fleet_destroyed(&self) -> bool {
        self.sunk >= self.fleet_size
    }

    /// Record the answer to a shot.
    pub fn record(&mut self, c: Coord, outcome: Outcome) -> Result<(), BoardError> {
        match outcome {
            Outcome::AlreadyShot => return Ok(()),
            Outcome::Miss => {}
            Outcome::Hit => self.hits.set(c)?,
            Outcome::Sunk(_) => {
                self.hits.set(c)?;
                self.sunk += 1;
            }
        }
        self.shots.set(c)?;
        Ok(())
    }
}

/// Complete serializable state of a match, as written by a save.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub grid_size: usize,
    pub mode: Mode,
    pub role: Role,
    pub own_board: Board,
    /// The computer's board; absent for networked matches.
    pub enemy_board: Option<Board>,
    pub view: TargetView,
    pub coordinator: TurnCoordinator,
}

impl MatchState {
    /// Basic consistency checks run before a loaded state replaces the
    /// current match.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut sizes: Vec<usize> = Vec::new();
        sizes.push(self.own_board.size());
        sizes.push(self.view.size());
        if let Some(enemy) = &self.enemy_board {
            sizes.push(enemy.size());
        }
        if sizes.iter().any(|&s| s != self.grid_size) {
            return Err(BoardError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }
}
