use battleship_sync::{
    run_networked, transport::in_memory, transport::spawn_listener, Difficulty, MatchReport, MatchSession,
    MemoryStore, SessionConfig, Side, Spectator, DEFAULT_GRID_SIZE,
};
use serde_json::json;

fn session(seed: u64) -> MatchSession<MemoryStore> {
    let mut session = MatchSession::new(
        MemoryStore::new(),
        SessionConfig {
            seed: Some(seed),
            autopilot: Some(Difficulty::Hard),
        },
    );
    session.attach_link();
    session
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let ((r1, mut w1), (r2, mut w2)) = in_memory::pair();

    let mut host = session(seed1);
    host.host_network_match(DEFAULT_GRID_SIZE)?;
    let mut guest = session(seed2);

    let f1 = async move {
        let (listener, mut inbound) = spawn_listener(r1);
        let report = run_networked(&mut host, &mut Spectator, &mut w1, &mut inbound).await;
        listener.shutdown().await;
        report
    };

    let f2 = async move {
        let (listener, mut inbound) = spawn_listener(r2);
        let report = run_networked(&mut guest, &mut Spectator, &mut w2, &mut inbound).await;
        listener.shutdown().await;
        report
    };

    let (res1, res2): (MatchReport, MatchReport) = tokio::try_join!(f1, f2)?;

    let winner = match (res1.winner, res2.winner) {
        (Some(Side::Local), Some(Side::Remote)) => Some("player1"),
        (Some(Side::Remote), Some(Side::Local)) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "grid_size": DEFAULT_GRID_SIZE,
        "player1": {"winner": res1.winner.map(|s| format!("{:?}", s)), "shots": res1.shots_fired},
        "player2": {"winner": res2.winner.map(|s| format!("{:?}", s)), "shots": res2.shots_fired},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
