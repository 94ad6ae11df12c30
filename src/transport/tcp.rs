#![cfg(feature = "std")]

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::transport::{LineReader, LineWriter};

/// Longest line we accept; real commands are a few bytes.
const MAX_LINE_LEN: usize = 1024;

/// Entry points for TCP connections.
pub struct TcpTransport;

impl TcpTransport {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<(TcpReader, TcpWriter)> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::split(stream))
    }

    /// Wait for exactly one peer on `bind`.
    pub async fn accept_one<A: ToSocketAddrs>(bind: A) -> anyhow::Result<(TcpReader, TcpWriter)> {
        let listener = TcpListener::bind(bind).await?;
        log::info!("waiting for a peer on {}", listener.local_addr()?);
        let (stream, addr) = listener.accept().await?;
        log::info!("peer connected from {}", addr);
        Ok(Self::split(stream))
    }

    pub fn split(stream: TcpStream) -> (TcpReader, TcpWriter) {
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("could not disable Nagle: {}", e);
        }
        let (read, write) = stream.into_split();
        (
            TcpReader {
                inner: BufReader::new(read),
                buf: String::new(),
            },
            TcpWriter { inner: write },
        )
    }
}

pub struct TcpReader {
    inner: BufReader<OwnedReadHalf>,
    buf: String,
}

#[async_trait::async_trait]
impl LineReader for TcpReader {
    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        self.buf.clear();
        let n = self.inner.read_line(&mut self.buf).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionReset {
                anyhow::anyhow!("Connection reset by peer")
            } else {
                anyhow::anyhow!("Read error: {}", e)
            }
        })?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.len() > MAX_LINE_LEN {
            return Err(anyhow::anyhow!(
                "Line too long: {} bytes (max: {})",
                self.buf.len(),
                MAX_LINE_LEN
            ));
        }
        Ok(Some(self.buf.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

pub struct TcpWriter {
    inner: OwnedWriteHalf,
}

#[async_trait::async_trait]
impl LineWriter for TcpWriter {
    async fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.inner.write_all(&data).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::BrokenPipe
                || e.kind() == std::io::ErrorKind::ConnectionReset
            {
                anyhow::anyhow!("Connection closed by peer")
            } else {
                anyhow::anyhow!("Write error: {}", e)
            }
        })
    }

    async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.inner.shutdown().await?;
        Ok(())
    }
}
