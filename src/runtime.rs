#![cfg(feature = "std")]
//! Async drivers that bind a [`MatchSession`] to a front end and, for
//! networked play, to a transport.

use crate::core::{Coord, Phase, Side};
use crate::persistence::Persistence;
use crate::protocol::{self, Command};
use crate::session::{Link, MatchEvent, MatchSession};
use crate::transport::{InboundQueue, LineWriter};

/// Whatever plays the local side when no autopilot is set, and watches
/// the match.
pub trait Frontend<P: Persistence> {
    fn on_event(&mut self, _event: &MatchEvent) {}

    /// The local side has to act (place and confirm, or fire). Return
    /// `false` when nothing was done.
    fn local_move(&mut self, _session: &mut MatchSession<P>) -> anyhow::Result<bool> {
        Ok(false)
    }
}

/// Front end that only watches; use with an autopilot.
pub struct Spectator;

impl<P: Persistence> Frontend<P> for Spectator {}

/// How a driven match ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub winner: Option<Side>,
    pub shots_fired: usize,
    pub shots_taken: usize,
    /// The match ended by close rather than by sinking a fleet.
    pub closed: bool,
    pub last_shot: Option<Coord>,
}

impl MatchReport {
    fn record(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::CellResolved { board: Side::Remote, target, .. } => {
                self.shots_fired += 1;
                self.last_shot = Some(*target);
            }
            MatchEvent::CellResolved { board: Side::Local, .. } => self.shots_taken += 1,
            MatchEvent::MatchFinished { winner } => self.winner = Some(*winner),
            MatchEvent::ReturnToLobby => self.closed = self.winner.is_none(),
            _ => {}
        }
    }
}

/// Write every queued outbound command. Returns `true` once `Close` went
/// out and the writer hung up.
pub async fn flush_outgoing<P, W>(session: &mut MatchSession<P>, writer: &mut W) -> anyhow::Result<bool>
where
    P: Persistence,
    W: LineWriter + ?Sized,
{
    for cmd in session.take_outgoing() {
        writer.write_line(&protocol::encode(&cmd)).await?;
        if cmd == Command::Close {
            writer.shutdown().await?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn local_move_due<P: Persistence>(session: &MatchSession<P>) -> bool {
    if session.autopilot().is_some() {
        return false;
    }
    let Some(coordinator) = session.coordinator() else {
        return false;
    };
    match coordinator.phase() {
        Phase::Placement => !coordinator.local_confirmed(),
        Phase::Combat => coordinator.active_turn() == Side::Local && coordinator.pending_shot().is_none(),
        _ => false,
    }
}

/// Run automatic actions and, if due, one front-end move. Returns whether
/// anything happened.
fn step<P, F>(session: &mut MatchSession<P>, frontend: &mut F, report: &mut MatchReport) -> anyhow::Result<bool>
where
    P: Persistence,
    F: Frontend<P>,
{
    let mut progressed = session.advance() > 0;
    if local_move_due(session) {
        progressed |= frontend.local_move(session)?;
        progressed |= session.advance() > 0;
    }
    for event in session.drain_events() {
        report.record(&event);
        frontend.on_event(&event);
    }
    Ok(progressed)
}

fn is_over<P: Persistence>(session: &MatchSession<P>) -> bool {
    !session.has_match() || session.phase() == Some(Phase::Finished)
}

/// Play an already started computer match to its end.
pub fn run_local<P, F>(session: &mut MatchSession<P>, frontend: &mut F) -> anyhow::Result<MatchReport>
where
    P: Persistence,
    F: Frontend<P>,
{
    let mut report = MatchReport::default();
    loop {
        let progressed = step(session, frontend, &mut report)?;
        if is_over(session) {
            break;
        }
        if !progressed {
            log::warn!("local match stalled");
            break;
        }
    }
    Ok(report)
}

/// Drive a networked session until the match finishes or the link closes.
///
/// The caller attaches the link and, as host, starts or loads the match
/// before calling this.
pub async fn run_networked<P, F, W>(
    session: &mut MatchSession<P>,
    frontend: &mut F,
    writer: &mut W,
    inbound: &mut InboundQueue,
) -> anyhow::Result<MatchReport>
where
    P: Persistence,
    F: Frontend<P>,
    W: LineWriter + ?Sized,
{
    let mut report = MatchReport::default();
    loop {
        step(session, frontend, &mut report)?;
        match flush_outgoing(session, writer).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) if session.phase() == Some(Phase::Finished) => {
                log::debug!("peer gone after the match ended: {}", e);
                break;
            }
            Err(e) => {
                log::warn!("write failed, closing: {}", e);
                session.receive(Command::Close);
                step(session, frontend, &mut report)?;
                break;
            }
        }
        if matches!(session.link(), Link::Closed | Link::Lost) {
            break;
        }
        if session.phase() == Some(Phase::Finished) {
            break;
        }
        match inbound.recv().await {
            Some(cmd) => session.receive(cmd),
            None => {
                session.receive(Command::Close);
                step(session, frontend, &mut report)?;
                break;
            }
        }
    }
    Ok(report)
}
