#![cfg(feature = "std")]
//! Background task that turns incoming lines into commands.
//!
//! The listener never touches session state. It decodes, forwards over an
//! unbounded channel and stops after the first `Close`; the session owner
//! applies the commands in arrival order.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::persistence::Persistence;
use crate::protocol::{self, Command};
use crate::session::MatchSession;
use crate::transport::LineReader;

/// Controls a running listener task.
pub struct ListenerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Stop reading, even if a read is blocked, and wait for the task.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            log::warn!("listener task failed: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Receiving end of the listener's channel.
pub struct InboundQueue {
    rx: UnboundedReceiver<Command>,
}

impl InboundQueue {
    /// Wait for the next command; `None` once the listener is gone.
    pub async fn recv(&mut self) -> Option<Command> {
        self.rx.recv().await
    }

    /// Next command if one is already queued.
    pub fn try_next(&mut self) -> Option<Command> {
        match self.rx.try_recv() {
            Ok(cmd) => Some(cmd),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Apply every queued command to `session` without waiting.
    pub fn drain_into<P: Persistence>(&mut self, session: &mut MatchSession<P>) -> usize {
        let mut applied = 0;
        while let Some(cmd) = self.try_next() {
            session.receive(cmd);
            applied += 1;
        }
        applied
    }
}

/// Start reading `reader` on its own task.
pub fn spawn_listener<R>(reader: R) -> (ListenerHandle, InboundQueue)
where
    R: LineReader + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(listen(reader, tx, shutdown_rx));
    (
        ListenerHandle {
            shutdown: Some(shutdown_tx),
            task,
        },
        InboundQueue { rx },
    )
}

async fn listen<R: LineReader>(
    mut reader: R,
    tx: UnboundedSender<Command>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        let line = tokio::select! {
            _ = &mut shutdown => {
                log::debug!("listener shut down");
                return;
            }
            line = reader.read_line() => line,
        };
        let cmd = match line {
            Ok(Some(line)) => match protocol::decode(&line) {
                Ok(cmd) => cmd,
                Err(e) => {
                    log::warn!("dropping malformed line: {}", e);
                    continue;
                }
            },
            Ok(None) => {
                log::info!("peer hung up");
                Command::Close
            }
            Err(e) => {
                log::warn!("read failed, treating as close: {}", e);
                Command::Close
            }
        };
        let closing = cmd == Command::Close;
        if tx.send(cmd).is_err() {
            log::debug!("inbound queue dropped, listener exiting");
            return;
        }
        if closing {
            return;
        }
    }
}
