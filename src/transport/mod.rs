//! Line transports between two endpoints.
//!
//! A connection is split into a reading half, owned by the listener task,
//! and a writing half, owned by whoever drives the session. Lines travel
//! without their `\n` terminator.

#[async_trait::async_trait]
pub trait LineReader: Send {
    /// Next line from the peer, `Ok(None)` once the peer has hung up.
    async fn read_line(&mut self) -> anyhow::Result<Option<String>>;
}

#[async_trait::async_trait]
pub trait LineWriter: Send {
    async fn write_line(&mut self, line: &str) -> anyhow::Result<()>;
    /// Hang up; the peer's reader sees end of stream.
    async fn shutdown(&mut self) -> anyhow::Result<()>;
}

pub mod in_memory;
pub mod listener;
pub mod tcp;

pub use in_memory::{MemoryReader, MemoryWriter};
pub use listener::{spawn_listener, InboundQueue, ListenerHandle};
pub use tcp::{TcpReader, TcpTransport, TcpWriter};
