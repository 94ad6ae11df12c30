//! Phase and turn state machine for one match.

use crate::core::common::Coord;

/// Stage of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Placement,
    WaitingForConfirmation,
    Combat,
    Finished,
}

/// One of the two participants, seen from this endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Local,
    Remote,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }
}

/// Reasons the coordinator refuses a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// Request is not valid in the current phase.
    WrongPhase(Phase),
    /// It is the other side's turn.
    NotYourTurn,
    /// A local shot is still waiting for its answer.
    ShotOutstanding(Coord),
    /// An answer arrived without a shot in flight.
    NoShotOutstanding,
}

impl core::fmt::Display for TurnError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TurnError::WrongPhase(p) => write!(f, "Not allowed during {:?}", p),
            TurnError::NotYourTurn => write!(f, "It is not your turn"),
            TurnError::ShotOutstanding(c) => write!(f, "Shot at {} still awaits an answer", c),
            TurnError::NoShotOutstanding => write!(f, "No shot is awaiting an answer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TurnError {}

/// Phase, turn ownership and the confirmation handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnCoordinator {
    phase: Phase,
    active_turn: Side,
    first_turn: Side,
    local_confirmed: bool,
    remote_confirmed: bool,
    confirm_sent: bool,
    confirm_owed: bool,
    pending_shot: Option<Coord>,
}

impl TurnCoordinator {
    /// Start a match in `Placement`; `first_turn` fires first in combat.
    pub fn new(first_turn: Side) -> Self {
        Self {
            phase: Phase::Placement,
            active_turn: first_turn,
            first_turn,
            local_confirmed: false,
            remote_confirmed: false,
            confirm_sent: false,
            confirm_owed: false,
            pending_shot: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side expected to shoot next. Meaningful only in `Combat`.
    pub fn active_turn(&self) -> Side {
        self.active_turn
    }

    pub fn local_confirmed(&self) -> bool {
        self.local_confirmed
    }

    pub fn remote_confirmed(&self) -> bool {
        self.remote_confirmed
    }

    /// Local shot awaiting its answer.
    pub fn pending_shot(&self) -> Option<Coord> {
        self.pending_shot
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Local player finished placing. Returns `true` if combat just began.
    pub fn confirm_local(&mut self) -> Result<bool, TurnError> {
        match self.phase {
            Phase::Placement | Phase::WaitingForConfirmation => {}
            other => return Err(TurnError::WrongPhase(other)),
        }
        if self.local_confirmed {
            return Ok(false);
        }
        self.local_confirmed = true;
        self.phase = Phase::WaitingForConfirmation;
        if !self.confirm_sent {
            self.confirm_owed = true;
        }
        Ok(self.try_start_combat())
    }

    /// Remote player finished placing. Returns `true` if combat just began.
    ///
    /// A confirmation arriving outside placement is stale and ignored.
    pub fn confirm_remote(&mut self) -> bool {
        if !matches!(self.phase, Phase::Placement | Phase::WaitingForConfirmation) {
            log::debug!("ignoring remote confirmation during {:?}", self.phase);
            return false;
        }
        self.remote_confirmed = true;
        if self.local_confirmed && !self.confirm_sent {
            self.confirm_owed = true;
        }
        self.try_start_combat()
    }

    /// Returns `true` exactly once per placement round when a `confirmed`
    /// message must go out to the peer.
    pub fn take_outgoing_confirm(&mut self) -> bool {
        if self.confirm_owed && !self.confirm_sent {
            self.confirm_owed = false;
            self.confirm_sent = true;
            true
        } else {
            false
        }
    }

    fn try_start_combat(&mut self) -> bool {
        if !(self.local_confirmed && self.remote_confirmed) {
            return false;
        }
        self.local_confirmed = false;
        self.remote_confirmed = false;
        self.phase = Phase::Combat;
        self.active_turn = self.first_turn;
        true
    }

    /// Reserve the local turn for a shot at `target`.
    pub fn begin_local_shot(&mut self, target: Coord) -> Result<(), TurnError> {
        if self.phase != Phase::Combat {
            return Err(TurnError::WrongPhase(self.phase));
        }
        if let Some(pending) = self.pending_shot {
            return Err(TurnError::ShotOutstanding(pending));
        }
        if self.active_turn != Side::Local {
            return Err(TurnError::NotYourTurn);
        }
        self.pending_shot = Some(target);
        Ok(())
    }

    /// The pending local shot was refused; the turn stays local.
    pub fn reject_local_shot(&mut self) -> Option<Coord> {
        self.pending_shot.take()
    }

    /// The pending local shot was resolved; the turn passes to the remote.
    pub fn complete_local_shot(&mut self) -> Result<Coord, TurnError> {
        let target = self.pending_shot.take().ok_or(TurnError::NoShotOutstanding)?;
        self.active_turn = Side::Remote;
        Ok(target)
    }

    /// Check that the remote may shoot now.
    pub fn accept_remote_shot(&self) -> Result<(), TurnError> {
        if self.phase != Phase::Combat {
            return Err(TurnError::WrongPhase(self.phase));
        }
        if self.active_turn != Side::Remote {
            return Err(TurnError::NotYourTurn);
        }
        Ok(())
    }

    /// The remote shot was resolved and answered; the turn passes back.
    pub fn complete_remote_shot(&mut self) -> Result<(), TurnError> {
        self.accept_remote_shot()?;
        self.active_turn = Side::Local;
        Ok(())
    }

    /// Enter the terminal phase.
    pub fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.pending_shot = None;
        self.local_confirmed = false;
        self.remote_confirmed = false;
    }
}
