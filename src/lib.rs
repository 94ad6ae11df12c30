#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod core;
pub mod protocol;
pub mod strategy;

#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod persistence;
#[cfg(feature = "std")]
pub mod runtime;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub mod prelude;

pub use crate::core::*;
pub use protocol::{decode, encode, Command, DecodeError, Reply};
pub use strategy::{fire_until_accepted, Opponent, Strategy};

#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with, level_from_env};
#[cfg(feature = "std")]
pub use persistence::{FileStore, MemoryStore, PersistError, Persistence};
#[cfg(feature = "std")]
pub use runtime::{run_local, run_networked, Frontend, MatchReport, Spectator};
#[cfg(feature = "std")]
pub use session::{Link, MatchEvent, MatchSession, SessionConfig, SessionError};
