#![cfg(feature = "std")]
//! Per-connection match orchestrator.
//!
//! `MatchSession` is the single writer of all match state. Decoded commands
//! from the wire ([`MatchSession::receive`]) and user intents (the public
//! methods) are applied one at a time; outbound commands collect in an
//! outbox and presentation updates in an event queue, both drained by the
//! owner of the session.

use std::collections::VecDeque;

use rand::{rngs::SmallRng, SeedableRng};

use crate::core::{
    is_supported_length, is_valid_grid_size, placement, resolve_shot, Board, BoardError, Coord,
    Difficulty, Facing, MatchState, Mode, Outcome, Phase, Role, ShipId, Side, TargetView,
    TurnCoordinator, TurnError,
};
use crate::persistence::{PersistError, Persistence};
use crate::protocol::{self, Command, Reply};
use crate::strategy::{fire_until_accepted, Opponent, Strategy};

/// Upper bound on automatic actions per [`MatchSession::advance`] call.
const MAX_AUTO_ACTIONS: usize = 4 * crate::core::MAX_GRID_SIZE * crate::core::MAX_GRID_SIZE;

/// Runtime options for a session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Fixed RNG seed for reproducible matches.
    pub seed: Option<u64>,
    /// Let an AI of this difficulty play the local side.
    pub autopilot: Option<Difficulty>,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    MatchStarted { grid_size: usize, mode: Mode, role: Role },
    PhaseChanged(Phase),
    TurnChanged(Side),
    /// A shot resolved on `board`'s grid (`Local` is our own fleet).
    CellResolved { board: Side, target: Coord, outcome: Outcome },
    ShipSunk { board: Side, target: Coord },
    MatchFinished { winner: Side },
    Saved { id: String },
    /// The save can be retried; the match is still in memory.
    SaveFailed { id: String, reason: String },
    Loaded { id: String },
    LoadFailed { id: String, reason: String },
    ReturnToLobby,
}

/// State of the connection to the peer as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// No connection attached (computer matches).
    Offline,
    Open,
    /// Transport went away while a save was pending; close is deferred.
    Lost,
    Closed,
}

/// Errors returned to callers of session intents.
#[derive(Debug)]
pub enum SessionError {
    NoMatch,
    Board(BoardError),
    Turn(TurnError),
    Persist(PersistError),
    OutOfGrid(Coord),
    AlreadyShot(Coord),
    /// Ships still to place before confirming.
    FleetIncomplete(usize),
    LinkClosed,
    NoPendingSave,
    CorruptSave(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoMatch => write!(f, "No match in progress"),
            SessionError::Board(e) => write!(f, "{}", e),
            SessionError::Turn(e) => write!(f, "{}", e),
            SessionError::Persist(e) => write!(f, "{}", e),
            SessionError::OutOfGrid(c) => write!(f, "{} is outside the grid", c),
            SessionError::AlreadyShot(c) => write!(f, "{} was already shot", c),
            SessionError::FleetIncomplete(n) => write!(f, "{} ship(s) still to place", n),
            SessionError::LinkClosed => write!(f, "Not connected to an opponent"),
            SessionError::NoPendingSave => write!(f, "No save is pending"),
            SessionError::CorruptSave(msg) => write!(f, "Saved match is unusable: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        SessionError::Board(err)
    }
}

impl From<TurnError> for SessionError {
    fn from(err: TurnError) -> Self {
        SessionError::Turn(err)
    }
}

impl From<PersistError> for SessionError {
    fn from(err: PersistError) -> Self {
        SessionError::Persist(err)
    }
}

/// Everything that lives exactly as long as one match.
struct Match {
    mode: Mode,
    role: Role,
    grid_size: usize,
    own: Board,
    /// The computer's fleet; `None` when the enemy is across the wire.
    enemy: Option<Board>,
    view: TargetView,
    coordinator: TurnCoordinator,
    opponent: Strategy,
    pilot: Option<Strategy>,
    winner: Option<Side>,
}

impl Match {
    fn require_phase(&self, phase: Phase) -> Result<(), SessionError> {
        let current = self.coordinator.phase();
        if current == phase {
            Ok(())
        } else {
            Err(TurnError::WrongPhase(current).into())
        }
    }

    fn state(&self) -> MatchState {
        MatchState {
            grid_size: self.grid_size,
            mode: self.mode,
            role: self.role,
            own_board: self.own.clone(),
            enemy_board: self.enemy.clone(),
            view: self.view.clone(),
            coordinator: self.coordinator.clone(),
        }
    }
}

/// Top-level orchestrator for one endpoint of a match.
pub struct MatchSession<P: Persistence> {
    persistence: P,
    rng: SmallRng,
    autopilot: Option<Difficulty>,
    game: Option<Match>,
    link: Link,
    pending_save: Option<String>,
    outbox: VecDeque<Command>,
    events: VecDeque<MatchEvent>,
}

impl<P: Persistence> MatchSession<P> {
    pub fn new(persistence: P, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self {
            persistence,
            rng,
            autopilot: config.autopilot,
            game: None,
            link: Link::Offline,
            pending_save: None,
            outbox: VecDeque::new(),
            events: VecDeque::new(),
        }
    }

    // ----- read-only accessors -------------------------------------------

    pub fn link(&self) -> Link {
        self.link
    }

    pub fn autopilot(&self) -> Option<Difficulty> {
        self.autopilot
    }

    pub fn has_match(&self) -> bool {
        self.game.is_some()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.game.as_ref().map(|g| g.coordinator.phase())
    }

    pub fn active_turn(&self) -> Option<Side> {
        self.game.as_ref().map(|g| g.coordinator.active_turn())
    }

    pub fn mode(&self) -> Option<Mode> {
        self.game.as_ref().map(|g| g.mode)
    }

    pub fn role(&self) -> Option<Role> {
        self.game.as_ref().map(|g| g.role)
    }

    pub fn grid_size(&self) -> Option<usize> {
        self.game.as_ref().map(|g| g.grid_size)
    }

    pub fn coordinator(&self) -> Option<&TurnCoordinator> {
        self.game.as_ref().map(|g| &g.coordinator)
    }

    pub fn own_board(&self) -> Option<&Board> {
        self.game.as_ref().map(|g| &g.own)
    }

    /// The computer's board (computer matches only).
    pub fn opponent_board(&self) -> Option<&Board> {
        self.game.as_ref().and_then(|g| g.enemy.as_ref())
    }

    pub fn target_view(&self) -> Option<&TargetView> {
        self.game.as_ref().map(|g| &g.view)
    }

    /// Local shot still waiting for its answer.
    pub fn pending_shot(&self) -> Option<Coord> {
        self.game.as_ref().and_then(|g| g.coordinator.pending_shot())
    }

    pub fn pending_save(&self) -> Option<&str> {
        self.pending_save.as_deref()
    }

    pub fn winner(&self) -> Option<Side> {
        self.game.as_ref().and_then(|g| g.winner)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    /// Serializable copy of the current match.
    pub fn snapshot(&self) -> Option<MatchState> {
        self.game.as_ref().map(Match::state)
    }

    /// Outbound commands in send order.
    pub fn take_outgoing(&mut self) -> Vec<Command> {
        self.outbox.drain(..).collect()
    }

    /// Presentation events in the order they happened.
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.events.drain(..).collect()
    }

    // ----- connection ----------------------------------------------------

    /// A connection to a peer is up; commands will be accepted again.
    pub fn attach_link(&mut self) {
        log::info!("link attached");
        self.link = Link::Open;
    }

    fn require_link(&self) -> Result<(), SessionError> {
        if self.link == Link::Open {
            Ok(())
        } else {
            Err(SessionError::LinkClosed)
        }
    }

    fn send(&mut self, cmd: Command) {
        log::debug!("-> {:?}", protocol::encode(&cmd));
        self.outbox.push_back(cmd);
    }

    fn emit(&mut self, event: MatchEvent) {
        self.events.push_back(event);
    }

    // ----- match setup ---------------------------------------------------

    fn new_match(
        &self,
        mode: Mode,
        role: Role,
        grid_size: usize,
        opponent: Strategy,
    ) -> Result<Match, SessionError> {
        let first_turn = match (mode, role) {
            (Mode::Networked, Role::Guest) => Side::Remote,
            _ => Side::Local,
        };
        let pilot = match self.autopilot {
            Some(d) => Some(Strategy::computer(d, grid_size)?),
            None => None,
        };
        Ok(Match {
            mode,
            role,
            grid_size,
            own: Board::new(grid_size)?,
            enemy: None,
            view: TargetView::new(grid_size)?,
            coordinator: TurnCoordinator::new(first_turn),
            opponent,
            pilot,
            winner: None,
        })
    }

    /// Swap in a fully built match.
    fn begin(&mut self, game: Match) {
        if let Some(old) = &self.game {
            if !old.coordinator.is_finished() {
                log::info!("replacing unfinished match");
            }
        }
        let (grid_size, mode, role, phase) = (game.grid_size, game.mode, game.role, game.coordinator.phase());
        self.game = Some(game);
        self.pending_save = None;
        log::info!("match started: {:?} {:?} on {}x{}", mode, role, grid_size, grid_size);
        self.emit(MatchEvent::MatchStarted { grid_size, mode, role });
        self.emit(MatchEvent::PhaseChanged(phase));
    }

    /// Start a match against a computer opponent on this machine.
    pub fn start_computer_match(&mut self, grid_size: usize, difficulty: Difficulty) -> Result<(), SessionError> {
        let mut opponent = Strategy::computer(difficulty, grid_size)?;
        let mut enemy = Board::new(grid_size)?;
        opponent.place_ships(&mut self.rng, &mut enemy)?;
        let mut game = self.new_match(Mode::Computer(difficulty), Role::Host, grid_size, opponent)?;
        game.enemy = Some(enemy);
        // the computer is done placing as soon as the match exists
        game.coordinator.confirm_remote();
        self.begin(game);
        Ok(())
    }

    /// Start a networked match and announce the grid size to the peer.
    pub fn host_network_match(&mut self, grid_size: usize) -> Result<(), SessionError> {
        self.require_link()?;
        let game = self.new_match(Mode::Networked, Role::Host, grid_size, Strategy::relay())?;
        self.begin(game);
        self.send(Command::Size(grid_size));
        Ok(())
    }

    /// Let an AI play the local side from now on (`None` hands control back).
    pub fn set_autopilot(&mut self, difficulty: Option<Difficulty>) -> Result<(), SessionError> {
        self.autopilot = difficulty;
        if let Some(game) = self.game.as_mut() {
            game.pilot = match difficulty {
                Some(d) => Some(Strategy::computer(d, game.grid_size)?),
                None => None,
            };
        }
        Ok(())
    }

    // ----- placement -----------------------------------------------------

    /// Whether a ship fits on the local board. Unsupported lengths never fit.
    pub fn can_place(&self, origin: Coord, length: usize, facing: Facing) -> bool {
        match &self.game {
            Some(game) => {
                is_supported_length(length)
                    && game.own.remaining_of(length) > 0
                    && placement::can_place(&game.own, origin, length, facing)
            }
            None => false,
        }
    }

    pub fn place_ship(&mut self, origin: Coord, length: usize, facing: Facing) -> Result<ShipId, SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        game.require_phase(Phase::Placement)?;
        Ok(game.own.place(origin, length, facing)?)
    }

    /// Pick a placed ship back up so it can be placed elsewhere.
    pub fn remove_ship_at(&mut self, cell: Coord) -> Result<usize, SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        game.require_phase(Phase::Placement)?;
        Ok(game.own.remove_ship_at(cell)?.length())
    }

    /// Replace the local placement with a random complete fleet.
    pub fn auto_place(&mut self) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        game.require_phase(Phase::Placement)?;
        game.own.place_fleet_randomly(&mut self.rng)?;
        Ok(())
    }

    /// Local player is done placing.
    pub fn confirm_placement(&mut self) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        let missing = game.own.unplaced_fleet().len();
        if missing > 0 {
            return Err(SessionError::FleetIncomplete(missing));
        }
        let before = game.coordinator.phase();
        let started = game.coordinator.confirm_local()?;
        let owed = game.coordinator.take_outgoing_confirm();
        let networked = game.mode == Mode::Networked;
        let (phase, turn) = (game.coordinator.phase(), game.coordinator.active_turn());
        if owed && networked {
            self.send(Command::Confirm);
        }
        self.announce_phase(before, phase, started, turn);
        Ok(())
    }

    fn announce_phase(&mut self, before: Phase, after: Phase, started: bool, turn: Side) {
        if before != after {
            log::info!("phase {:?} -> {:?}", before, after);
            self.emit(MatchEvent::PhaseChanged(after));
        }
        if started {
            self.emit(MatchEvent::TurnChanged(turn));
        }
    }

    // ----- combat --------------------------------------------------------

    /// Fire at the enemy. Computer matches resolve immediately; networked
    /// matches return `None` and resolve when the answer arrives.
    pub fn fire(&mut self, target: Coord) -> Result<Option<Outcome>, SessionError> {
        if self.mode() == Some(Mode::Networked) {
            self.require_link()?;
        }
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        if !target.in_grid(game.grid_size) {
            return Err(SessionError::OutOfGrid(target));
        }
        if game.view.is_shot(target) {
            return Err(SessionError::AlreadyShot(target));
        }
        game.coordinator.begin_local_shot(target)?;
        match game.mode {
            Mode::Networked => {
                let (col, row) = target.to_wire();
                self.send(Command::Shoot { col, row });
                Ok(None)
            }
            Mode::Computer(_) => {
                let outcome = match game.enemy.as_mut() {
                    Some(enemy) => resolve_shot(enemy, target),
                    None => Outcome::AlreadyShot,
                };
                if outcome == Outcome::AlreadyShot {
                    game.coordinator.reject_local_shot();
                    return Err(SessionError::AlreadyShot(target));
                }
                self.conclude_local_shot(outcome)?;
                Ok(Some(outcome))
            }
        }
    }

    fn conclude_local_shot(&mut self, outcome: Outcome) -> Result<Coord, SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        let target = game.coordinator.complete_local_shot()?;
        game.view.record(target, outcome)?;
        if let Some(pilot) = game.pilot.as_mut() {
            pilot.process_answer(target, outcome);
        }
        log::debug!("our shot at {} -> {:?}", target, outcome);
        self.emit(MatchEvent::CellResolved { board: Side::Remote, target, outcome });
        if let Outcome::Sunk(_) = outcome {
            self.emit(MatchEvent::ShipSunk { board: Side::Remote, target });
        }
        if !self.check_finished() {
            self.emit(MatchEvent::TurnChanged(Side::Remote));
        }
        Ok(target)
    }

    /// Let the opponent strategy take its shot at our board. Returns the
    /// resolved shot, or `None` when it is not the opponent's turn or it had
    /// nothing acceptable to fire.
    fn play_opponent_turn(&mut self) -> Option<(Coord, Outcome)> {
        let game = self.game.as_mut()?;
        game.coordinator.accept_remote_shot().ok()?;
        let n = game.grid_size;
        let (target, outcome) =
            fire_until_accepted(&mut game.opponent, &mut self.rng, n, |c| resolve_shot(&mut game.own, c))?;
        game.opponent.process_answer(target, outcome);
        if let Err(e) = game.coordinator.complete_remote_shot() {
            log::error!("turn state diverged after opponent shot: {}", e);
        }
        let networked = game.mode == Mode::Networked;
        log::debug!("opponent shot at {} -> {:?}", target, outcome);
        if networked {
            if let Some(reply) = Reply::from_outcome(outcome) {
                self.send(Command::Answer(reply));
            }
        }
        self.emit(MatchEvent::CellResolved { board: Side::Local, target, outcome });
        if let Outcome::Sunk(_) = outcome {
            self.emit(MatchEvent::ShipSunk { board: Side::Local, target });
        }
        if !self.check_finished() {
            self.emit(MatchEvent::TurnChanged(Side::Local));
        }
        Some((target, outcome))
    }

    fn check_finished(&mut self) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        if game.coordinator.is_finished() {
            return true;
        }
        let enemy_sunk = game.view.fleet_destroyed() || game.enemy.as_ref().map_or(false, Board::all_sunk);
        let winner = if game.own.all_sunk() {
            Side::Remote
        } else if enemy_sunk {
            Side::Local
        } else {
            return false;
        };
        game.coordinator.finish();
        game.winner = Some(winner);
        log::info!("match finished, winner: {:?}", winner);
        self.emit(MatchEvent::PhaseChanged(Phase::Finished));
        self.emit(MatchEvent::MatchFinished { winner });
        true
    }

    /// Run every automatic action that is due: autopilot placement and shots,
    /// and computer-opponent turns. Returns how many actions ran.
    pub fn advance(&mut self) -> usize {
        let mut actions = 0;
        while actions < MAX_AUTO_ACTIONS {
            let progressed = self.pilot_step() || self.computer_step();
            if !progressed {
                break;
            }
            actions += 1;
        }
        actions
    }

    fn pilot_step(&mut self) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        let Some(pilot) = game.pilot.as_mut() else {
            return false;
        };
        match game.coordinator.phase() {
            Phase::Placement => {
                if !game.own.is_fleet_complete() {
                    if let Err(e) = pilot.place_ships(&mut self.rng, &mut game.own) {
                        log::error!("autopilot could not place its fleet: {}", e);
                        return false;
                    }
                }
                match self.confirm_placement() {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("autopilot confirmation refused: {}", e);
                        false
                    }
                }
            }
            Phase::Combat
                if game.coordinator.active_turn() == Side::Local
                    && game.coordinator.pending_shot().is_none() =>
            {
                let n = game.grid_size;
                let mut choice = pilot.next_shot(&mut self.rng, n);
                let mut attempts = 1;
                while let Some(c) = choice {
                    if !game.view.is_shot(c) {
                        break;
                    }
                    if attempts >= n * n {
                        choice = None;
                        break;
                    }
                    attempts += 1;
                    choice = pilot.retry_shot(c, &mut self.rng, n);
                }
                let Some(target) = choice else {
                    return false;
                };
                match self.fire(target) {
                    Ok(_) => true,
                    Err(e) => {
                        log::warn!("autopilot shot at {} refused: {}", target, e);
                        false
                    }
                }
            }
            _ => false,
        }
    }

    fn computer_step(&mut self) -> bool {
        match self.game.as_ref().map(|g| g.mode) {
            Some(Mode::Computer(_)) => self.play_opponent_turn().is_some(),
            _ => false,
        }
    }

    // ----- persistence ---------------------------------------------------

    /// Save the match under `id` and leave it. Networked matches tell the
    /// peer to save too. On failure the match keeps running.
    pub fn save(&mut self, id: &str) -> Result<(), SessionError> {
        let game = self.game.as_ref().ok_or(SessionError::NoMatch)?;
        if game.coordinator.is_finished() {
            return Err(TurnError::WrongPhase(Phase::Finished).into());
        }
        // the peer may already have resolved the shot and taken the turn
        if let Some(pending) = game.coordinator.pending_shot() {
            return Err(TurnError::ShotOutstanding(pending).into());
        }
        let state = game.state();
        let networked = game.mode == Mode::Networked;
        if let Err(e) = self.persistence.save(&state, id) {
            log::error!("saving match {:?} failed: {}", id, e);
            self.emit(MatchEvent::SaveFailed { id: id.to_string(), reason: e.to_string() });
            return Err(e.into());
        }
        self.emit(MatchEvent::Saved { id: id.to_string() });
        if networked && self.link == Link::Open {
            self.send(Command::Save(id.to_string()));
        }
        self.close(true);
        Ok(())
    }

    /// Retry a save the peer requested that failed earlier, optionally under
    /// a different id. Completes the deferred close on success.
    pub fn retry_save(&mut self, id: Option<&str>) -> Result<(), SessionError> {
        if self.pending_save.is_none() {
            return Err(SessionError::NoPendingSave);
        }
        if let Some(id) = id {
            self.pending_save = Some(id.to_string());
        }
        self.attempt_pending_save()
    }

    fn attempt_pending_save(&mut self) -> Result<(), SessionError> {
        let id = self.pending_save.clone().ok_or(SessionError::NoPendingSave)?;
        let state = self.snapshot().ok_or(SessionError::NoMatch)?;
        match self.persistence.save(&state, &id) {
            Ok(()) => {
                log::info!("match saved as {:?}", id);
                self.pending_save = None;
                self.emit(MatchEvent::Saved { id });
                self.close(true);
                Ok(())
            }
            Err(e) => {
                log::error!("saving match {:?} failed, close suppressed: {}", id, e);
                self.emit(MatchEvent::SaveFailed { id, reason: e.to_string() });
                Err(e.into())
            }
        }
    }

    /// Load a saved match. A networked save is resumed with the connected
    /// peer, who is asked to load its side under the same id.
    pub fn load(&mut self, id: &str) -> Result<(), SessionError> {
        let state = match self.persistence.load(id) {
            Ok(state) => state,
            Err(e) => {
                log::error!("loading match {:?} failed: {}", id, e);
                self.emit(MatchEvent::LoadFailed { id: id.to_string(), reason: e.to_string() });
                return Err(e.into());
            }
        };
        if state.mode == Mode::Networked {
            self.require_link()?;
        }
        let networked = state.mode == Mode::Networked;
        self.install(state, id, false)?;
        if networked {
            self.send(Command::Load(id.to_string()));
        }
        Ok(())
    }

    /// Replace the current match with `state` in one step.
    fn install(&mut self, mut state: MatchState, id: &str, force_networked: bool) -> Result<(), SessionError> {
        state.validate()?;
        if force_networked {
            state.mode = Mode::Networked;
            state.enemy_board = None;
        }
        let n = state.grid_size;
        let opponent = match state.mode {
            Mode::Computer(d) => {
                if state.enemy_board.is_none() {
                    return Err(SessionError::CorruptSave("computer match without computer board".into()));
                }
                Strategy::computer(d, n)?
            }
            Mode::Networked => Strategy::relay(),
        };
        let pilot = match self.autopilot {
            Some(d) => Some(Strategy::computer(d, n)?),
            None => None,
        };
        let mut coordinator = state.coordinator;
        if let Some(shot) = coordinator.reject_local_shot() {
            log::warn!("dropping unanswered shot at {} from saved match", shot);
        }
        let game = Match {
            mode: state.mode,
            role: state.role,
            grid_size: n,
            own: state.own_board,
            enemy: state.enemy_board,
            view: state.view,
            coordinator,
            opponent,
            pilot,
            winner: None,
        };
        self.begin(game);
        self.emit(MatchEvent::Loaded { id: id.to_string() });
        Ok(())
    }

    // ----- leaving -------------------------------------------------------

    /// Abandon the match and hang up.
    pub fn cancel_match(&mut self) {
        self.pending_save = None;
        self.close(true);
    }

    /// End the match: Finished, resources dropped, lobby notified.
    fn close(&mut self, hang_up: bool) {
        if let Some(game) = self.game.as_mut() {
            if !game.coordinator.is_finished() {
                game.coordinator.finish();
                self.emit(MatchEvent::PhaseChanged(Phase::Finished));
            }
        }
        self.game = None;
        self.pending_save = None;
        match self.link {
            Link::Open if hang_up => {
                self.send(Command::Close);
                self.link = Link::Closed;
            }
            Link::Open | Link::Lost => self.link = Link::Closed,
            Link::Offline | Link::Closed => {}
        }
        log::info!("match closed, returning to lobby");
        self.emit(MatchEvent::ReturnToLobby);
    }

    // ----- inbound -------------------------------------------------------

    /// Decode and apply one raw line. Malformed lines are logged and dropped.
    pub fn receive_line(&mut self, line: &str) {
        match protocol::decode(line) {
            Ok(cmd) => self.receive(cmd),
            Err(e) => log::warn!("dropping malformed message: {}", e),
        }
    }

    /// Apply one command from the peer.
    pub fn receive(&mut self, cmd: Command) {
        if self.link != Link::Open {
            log::debug!("dropping {:?}: link is {:?}", cmd, self.link);
            return;
        }
        log::debug!("<- {:?}", protocol::encode(&cmd));
        match cmd {
            Command::Shoot { col, row } => self.on_shoot(Coord::from_wire(col, row)),
            Command::Size(n) => self.on_size(n),
            Command::Confirm => self.on_confirm(),
            Command::Answer(reply) => self.on_answer(reply),
            Command::Save(id) => self.on_save(id),
            Command::Load(id) => self.on_load(id),
            Command::Pass => log::trace!("peer passed"),
            Command::Close => self.on_close(),
        }
    }

    fn networked_game(&mut self, what: &str) -> Option<&mut Match> {
        match self.game.as_mut() {
            Some(game) if game.mode == Mode::Networked => Some(game),
            Some(_) => {
                log::warn!("ignoring {} during a computer match", what);
                None
            }
            None => {
                log::warn!("ignoring {} with no match running", what);
                None
            }
        }
    }

    fn on_shoot(&mut self, target: Coord) {
        let Some(game) = self.networked_game("shot") else {
            return;
        };
        if !target.in_grid(game.grid_size) {
            log::warn!("ignoring shot at {} outside the {}x{} grid", target, game.grid_size, game.grid_size);
            return;
        }
        if let Err(e) = game.coordinator.accept_remote_shot() {
            log::warn!("ignoring shot at {}: {}", target, e);
            return;
        }
        if let Some(relay) = game.opponent.as_relay_mut() {
            relay.push(target);
        }
        if self.play_opponent_turn().is_none() {
            log::warn!("peer fired at resolved cell {}; turn stays with peer", target);
        }
    }

    fn on_size(&mut self, n: usize) {
        if !is_valid_grid_size(n) {
            log::warn!("peer announced unplayable grid size {}", n);
            return;
        }
        match self.new_match(Mode::Networked, Role::Guest, n, Strategy::relay()) {
            Ok(game) => self.begin(game),
            Err(e) => log::error!("could not start announced match: {}", e),
        }
    }

    fn on_confirm(&mut self) {
        let Some(game) = self.networked_game("confirmation") else {
            return;
        };
        let before = game.coordinator.phase();
        let started = game.coordinator.confirm_remote();
        let owed = game.coordinator.take_outgoing_confirm();
        let (phase, turn) = (game.coordinator.phase(), game.coordinator.active_turn());
        if owed {
            self.send(Command::Confirm);
        }
        self.announce_phase(before, phase, started, turn);
    }

    fn on_answer(&mut self, reply: Reply) {
        let Some(game) = self.networked_game("answer") else {
            return;
        };
        if game.coordinator.pending_shot().is_none() {
            log::warn!("answer {} without a shot in flight", reply.code());
            return;
        }
        let outcome = match reply {
            Reply::Miss => Outcome::Miss,
            Reply::Hit => Outcome::Hit,
            // the peer does not name the ship; number them in sinking order
            Reply::Sunk => Outcome::Sunk(game.view.sunk_count()),
        };
        if let Err(e) = self.conclude_local_shot(outcome) {
            log::error!("could not apply answer: {}", e);
            return;
        }
        self.send(Command::Pass);
    }

    fn on_save(&mut self, id: String) {
        let running = self.game.as_ref().map_or(false, |g| !g.coordinator.is_finished());
        if !running {
            log::warn!("peer saved {:?} with no match running; closing", id);
            self.close(true);
            return;
        }
        self.pending_save = Some(id);
        // failure is reported through events and keeps the match alive
        let _ = self.attempt_pending_save();
    }

    fn on_load(&mut self, id: String) {
        let state = match self.persistence.load(&id) {
            Ok(state) => state,
            Err(e) => {
                log::error!("peer asked to load {:?}: {}", id, e);
                self.emit(MatchEvent::LoadFailed { id, reason: e.to_string() });
                self.close(true);
                return;
            }
        };
        if let Err(e) = self.install(state, &id, true) {
            log::error!("peer asked to load {:?}: {}", id, e);
            self.emit(MatchEvent::LoadFailed { id, reason: e.to_string() });
            self.close(true);
        }
    }

    fn on_close(&mut self) {
        if let Some(id) = &self.pending_save {
            log::warn!("link lost while save {:?} is pending; close deferred", id);
            self.link = Link::Lost;
            return;
        }
        log::info!("peer closed the connection");
        self.close(false);
    }
}
