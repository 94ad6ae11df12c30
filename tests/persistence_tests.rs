use std::fs;
use std::path::PathBuf;

use battleship_sync::persistence::validate_id;
use battleship_sync::{
    Board, Coord, Difficulty, FileStore, MatchState, MemoryStore, Mode, Outcome, PersistError,
    Persistence, Role, Side, TargetView, TurnCoordinator,
};
use rand::{rngs::SmallRng, SeedableRng};

fn sample_state(seed: u64) -> MatchState {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut own = Board::new(10).unwrap();
    own.place_fleet_randomly(&mut rng).unwrap();
    let mut enemy = Board::new(10).unwrap();
    enemy.place_fleet_randomly(&mut rng).unwrap();
    let mut view = TargetView::new(10).unwrap();
    view.record(Coord::new(2, 3), Outcome::Miss).unwrap();
    view.record(Coord::new(4, 4), Outcome::Hit).unwrap();
    MatchState {
        grid_size: 10,
        mode: Mode::Computer(Difficulty::Medium),
        role: Role::Host,
        own_board: own,
        enemy_board: Some(enemy),
        view,
        coordinator: TurnCoordinator::new(Side::Local),
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("battleship-sync-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_memory_store_round_trip() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());
    let state = sample_state(1);
    store.save(&state, "slot-1").unwrap();
    assert!(store.contains("slot-1"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.load("slot-1").unwrap(), state);
}

#[test]
fn test_memory_store_overwrites() {
    let mut store = MemoryStore::new();
    store.save(&sample_state(1), "slot").unwrap();
    let newer = sample_state(2);
    store.save(&newer, "slot").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.load("slot").unwrap(), newer);
}

#[test]
fn test_memory_store_errors() {
    let mut store = MemoryStore::new();
    assert!(matches!(store.load("missing"), Err(PersistError::NotFound(id)) if id == "missing"));
    assert!(matches!(
        store.save(&sample_state(1), "Bad Id!"),
        Err(PersistError::InvalidId(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn test_validate_id() {
    assert!(validate_id("game1").is_ok());
    assert!(validate_id("my_save-2").is_ok());
    for bad in ["", "UPPER", "has space", "../escape", "a/b", "dot.sav"] {
        assert!(validate_id(bad).is_err(), "{:?} should be rejected", bad);
    }
    assert!(validate_id(&"x".repeat(64)).is_ok());
    assert!(validate_id(&"x".repeat(65)).is_err());
}

#[test]
fn test_file_store_round_trip() {
    let dir = scratch_dir("round-trip");
    let mut store = FileStore::new(&dir);
    let state = sample_state(3);
    store.save(&state, "game1").unwrap();

    assert!(dir.join("game1.sav").exists());
    assert!(!dir.join("game1.sav.tmp").exists());

    // a second store over the same directory sees the save
    let mut reopened = FileStore::new(&dir);
    assert_eq!(reopened.load("game1").unwrap(), state);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_file_store_not_found() {
    let dir = scratch_dir("not-found");
    let mut store = FileStore::new(&dir);
    assert!(matches!(store.load("nothing"), Err(PersistError::NotFound(_))));
}

#[test]
fn test_file_store_rejects_bad_id() {
    let dir = scratch_dir("bad-id");
    let mut store = FileStore::new(&dir);
    assert!(matches!(
        store.save(&sample_state(1), "../outside"),
        Err(PersistError::InvalidId(_))
    ));
    assert!(!dir.exists());
    assert!(matches!(store.load("../outside"), Err(PersistError::InvalidId(_))));
}

#[test]
fn test_file_store_corrupt_bytes() {
    let dir = scratch_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("broken.sav"), b"not a match").unwrap();
    let mut store = FileStore::new(&dir);
    assert!(matches!(store.load("broken"), Err(PersistError::Corrupt(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_file_store_rejects_inconsistent_state() {
    let dir = scratch_dir("inconsistent");
    let mut store = FileStore::new(&dir);
    let mut state = sample_state(4);
    state.view = TargetView::new(8).unwrap();
    store.save(&state, "mixed").unwrap();
    assert!(matches!(store.load("mixed"), Err(PersistError::Corrupt(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_persist_error_messages() {
    let err = PersistError::NotFound("abc".to_string());
    assert!(err.to_string().contains("abc"));
    let io: PersistError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
    assert!(matches!(io, PersistError::Io(_)));
    assert!(std::error::Error::source(&io).is_some());
}
