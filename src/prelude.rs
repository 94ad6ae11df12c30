//! Commonly used types and utilities for ease of import.

pub use crate::core::{
    Board, Coord, Difficulty, Facing, MatchState, Mode, Outcome, Phase, Role, Side, TurnCoordinator,
};
pub use crate::protocol::{Command, Reply};
pub use crate::strategy::{Opponent, Strategy};

#[cfg(feature = "std")]
pub use crate::{
    FileStore, Frontend, MatchEvent, MatchSession, MemoryStore, Persistence, SessionConfig, Spectator,
};

#[cfg(feature = "std")]
pub use crate::transport::{in_memory, spawn_listener, tcp::TcpTransport, LineReader, LineWriter};
