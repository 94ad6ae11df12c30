#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

#[cfg(feature = "std")]
use battleship_sync::{
    init_logging, run_local, run_networked, transport::spawn_listener, transport::tcp::TcpTransport,
    transport::LineReader, transport::LineWriter, Board, Cell, Coord, Difficulty as CoreDifficulty,
    FileStore, Frontend, MatchEvent, MatchReport, MatchSession, Phase, SessionConfig, Side, TargetView,
    DEFAULT_GRID_SIZE,
};

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Ai,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[cfg(feature = "std")]
impl From<Difficulty> for CoreDifficulty {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => CoreDifficulty::Easy,
            Difficulty::Medium => CoreDifficulty::Medium,
            Difficulty::Hard => CoreDifficulty::Hard,
        }
    }
}

#[derive(clap::Args, Clone, Debug)]
#[cfg(feature = "std")]
struct Common {
    #[arg(long, value_enum, default_value_t = PlayerType::Human)]
    player: PlayerType,
    #[arg(long, value_enum, default_value_t = Difficulty::Hard, help = "AI tier for the computer opponent and for --player ai")]
    difficulty: Difficulty,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value = "saves")]
    save_dir: String,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer on this machine.
    Local {
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        size: usize,
        #[arg(long, help = "Resume a saved match instead of starting one")]
        load: Option<String>,
        #[command(flatten)]
        common: Common,
    },
    /// Host a networked match and wait for a peer to connect.
    Host {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        size: usize,
        #[arg(long, help = "Resume a saved match with the peer")]
        load: Option<String>,
        #[command(flatten)]
        common: Common,
    },
    /// Join a networked match hosted by a peer.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[command(flatten)]
        common: Common,
    },
}

#[cfg(feature = "std")]
fn session_for(common: &Common) -> MatchSession<FileStore> {
    if let Some(s) = common.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }
    let autopilot = match common.player {
        PlayerType::Human => None,
        PlayerType::Ai => Some(common.difficulty.into()),
    };
    MatchSession::new(
        FileStore::new(&common.save_dir),
        SessionConfig {
            seed: common.seed,
            autopilot,
        },
    )
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut terminal = Terminal;

    let report = match cli.command {
        Commands::Local { size, load, common } => {
            let mut session = session_for(&common);
            match load {
                Some(id) => session.load(&id)?,
                None => session.start_computer_match(size, common.difficulty.into())?,
            }
            run_local(&mut session, &mut terminal)?
        }
        Commands::Host {
            bind,
            size,
            load,
            common,
        } => {
            println!("Hosting at {}...", bind);
            let (reader, mut writer) = TcpTransport::accept_one(&bind).await?;
            let mut session = session_for(&common);
            session.attach_link();
            match load {
                Some(id) => session.load(&id)?,
                None => session.host_network_match(size)?,
            }
            play_networked(&mut session, &mut terminal, reader, &mut writer).await?
        }
        Commands::Join { connect, common } => {
            println!("Connecting to {}...", connect);
            let (reader, mut writer) = TcpTransport::connect(&connect).await?;
            println!("Connected successfully!");
            let mut session = session_for(&common);
            session.attach_link();
            play_networked(&mut session, &mut terminal, reader, &mut writer).await?
        }
    };

    match report.winner {
        Some(Side::Local) => println!("\nVICTORY! You have sunk all enemy ships."),
        Some(Side::Remote) => println!("\nDEFEAT. All your ships have been destroyed."),
        None => println!("\nMatch closed."),
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn play_networked<R, W>(
    session: &mut MatchSession<FileStore>,
    terminal: &mut Terminal,
    reader: R,
    writer: &mut W,
) -> anyhow::Result<MatchReport>
where
    R: LineReader + 'static,
    W: LineWriter,
{
    let (listener, mut inbound) = spawn_listener(reader);
    let report = run_networked(session, terminal, writer, &mut inbound).await;
    if let Some(id) = session.pending_save().map(str::to_string) {
        println!("Saving {:?} failed; retrying once.", id);
        if let Err(e) = session.retry_save(None) {
            eprintln!("Save failed again: {}", e);
            session.cancel_match();
        }
    }
    listener.shutdown().await;
    report
}

/// Human player on stdin/stdout.
#[cfg(feature = "std")]
struct Terminal;

#[cfg(feature = "std")]
impl Frontend<FileStore> for Terminal {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::MatchStarted { grid_size, mode, .. } => {
                println!("New {:?} match on a {}x{} grid.", mode, grid_size, grid_size)
            }
            MatchEvent::PhaseChanged(Phase::WaitingForConfirmation) => {
                println!("Waiting for the opponent to finish placing...")
            }
            MatchEvent::PhaseChanged(Phase::Combat) => println!("All ships placed. Battle begins!"),
            MatchEvent::CellResolved {
                board: Side::Remote,
                target,
                outcome,
            } => println!("You fired at {}: {:?}", coord_to_string(*target), outcome),
            MatchEvent::CellResolved {
                board: Side::Local,
                target,
                outcome,
            } => println!("Opponent fired at {}: {:?}", coord_to_string(*target), outcome),
            MatchEvent::ShipSunk { board: Side::Remote, .. } => println!("You sank a ship!"),
            MatchEvent::ShipSunk { board: Side::Local, .. } => println!("One of your ships went down."),
            MatchEvent::Saved { id } => println!("Match saved as {:?}.", id),
            MatchEvent::SaveFailed { id, reason } => println!("Could not save {:?}: {}", id, reason),
            MatchEvent::LoadFailed { id, reason } => println!("Could not load {:?}: {}", id, reason),
            _ => {}
        }
    }

    fn local_move(&mut self, session: &mut MatchSession<FileStore>) -> anyhow::Result<bool> {
        match session.phase() {
            Some(Phase::Placement) => {
                session.auto_place()?;
                if let Some(board) = session.own_board() {
                    println!("\nYour fleet:");
                    print_board(board);
                }
                session.confirm_placement()?;
                Ok(true)
            }
            Some(Phase::Combat) => {
                if let (Some(board), Some(view)) = (session.own_board(), session.target_view()) {
                    println!("\nYour fleet:");
                    print_board(board);
                    println!("\nYour shots:");
                    print_view(view);
                }
                let n = session.grid_size().unwrap_or(DEFAULT_GRID_SIZE);
                loop {
                    print!("Enter target (e.g. B7), 'save <id>' or 'quit': ");
                    io::stdout().flush()?;
                    let mut line = String::new();
                    if io::stdin().lock().read_line(&mut line)? == 0 {
                        session.cancel_match();
                        return Ok(true);
                    }
                    let input = line.trim();
                    if input.eq_ignore_ascii_case("quit") {
                        session.cancel_match();
                        return Ok(true);
                    }
                    if let Some(id) = input.strip_prefix("save ") {
                        match session.save(id.trim()) {
                            Ok(()) => return Ok(true),
                            Err(e) => {
                                println!("{}", e);
                                continue;
                            }
                        }
                    }
                    let Some(target) = parse_coord(input).filter(|c| c.in_grid(n)) else {
                        println!("Invalid coordinate.");
                        continue;
                    };
                    match session.fire(target) {
                        Ok(_) => return Ok(true),
                        Err(e) => println!("{}", e),
                    }
                }
            }
            _ => Ok(false),
        }
    }
}

#[cfg(feature = "std")]
fn coord_to_string(c: Coord) -> String {
    let col = (b'A' + (c.x - 1) as u8) as char;
    format!("{}{}", col, c.y)
}

#[cfg(feature = "std")]
fn parse_coord(input: &str) -> Option<Coord> {
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize + 1;
    let row: usize = chars.as_str().trim().parse().ok()?;
    if row == 0 {
        return None;
    }
    Some(Coord::new(col, row))
}

#[cfg(feature = "std")]
fn print_header(n: usize) {
    print!("   ");
    for c in 0..n {
        print!(" {}", (b'A' + c as u8) as char);
    }
    println!();
}

#[cfg(feature = "std")]
fn print_board(board: &Board) {
    let n = board.size();
    print_header(n);
    for y in 1..=n {
        print!("{:2} ", y);
        for x in 1..=n {
            let ch = match board.cell(Coord::new(x, y)) {
                Some(Cell::Ship(_)) => 'S',
                Some(Cell::Hit) => 'X',
                Some(Cell::SunkShip(_)) => '#',
                Some(Cell::Miss) => 'o',
                _ => '.',
            };
            print!(" {}", ch);
        }
        println!();
    }
}

#[cfg(feature = "std")]
fn print_view(view: &TargetView) {
    let n = view.size();
    print_header(n);
    for y in 1..=n {
        print!("{:2} ", y);
        for x in 1..=n {
            let c = Coord::new(x, y);
            let ch = if view.hits().contains(c) {
                'X'
            } else if view.is_shot(c) {
                'o'
            } else {
                '.'
            };
            print!(" {}", ch);
        }
        println!();
    }
}
