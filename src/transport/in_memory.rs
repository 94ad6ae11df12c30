#![cfg(feature = "std")]

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::{LineReader, LineWriter};

pub struct MemoryReader {
    rx: UnboundedReceiver<String>,
}

pub struct MemoryWriter {
    tx: Option<UnboundedSender<String>>,
}

/// Two connected endpoints: `(reader, writer)` for each side.
pub fn pair() -> ((MemoryReader, MemoryWriter), (MemoryReader, MemoryWriter)) {
    let (tx1, rx1) = unbounded_channel();
    let (tx2, rx2) = unbounded_channel();
    (
        (MemoryReader { rx: rx1 }, MemoryWriter { tx: Some(tx2) }),
        (MemoryReader { rx: rx2 }, MemoryWriter { tx: Some(tx1) }),
    )
}

#[async_trait::async_trait]
impl LineReader for MemoryReader {
    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.rx.recv().await)
    }
}

#[async_trait::async_trait]
impl LineWriter for MemoryWriter {
    async fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Transport is shut down"))?;
        tx.send(line.to_string())
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.tx = None;
        Ok(())
    }
}
