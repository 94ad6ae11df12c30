use battleship_sync::{init_logging, init_logging_with, level_from_env};
use log::LevelFilter;

#[test]
fn test_logging_init_is_idempotent() {
    init_logging_with(LevelFilter::Debug);
    // a second install keeps the first logger and does not panic
    init_logging();
    log::info!("logger installed");
}

#[test]
fn test_level_from_env_falls_back() {
    if std::env::var("BATTLESHIP_LOG").is_err() {
        assert_eq!(level_from_env(LevelFilter::Warn), LevelFilter::Warn);
    }
}
