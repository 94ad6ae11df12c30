use battleship_sync::{
    can_place, check_placement, fleet_cells, fleet_for, resolve_shot, ship_counts, Board, BoardError, Cell, Coord,
    Facing, Outcome, DEFAULT_GRID_SIZE,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn board() -> Board {
    Board::new(DEFAULT_GRID_SIZE).unwrap()
}

#[test]
fn test_fleet_scales_with_grid_area() {
    assert_eq!(fleet_for(10), vec![5, 4, 3, 3, 2]);
    assert_eq!(fleet_for(5), vec![3, 2]);
    assert_eq!(fleet_cells(10), 17);
    // indexed by length - 2
    assert_eq!(ship_counts(20), [4, 8, 4, 4]);
}

#[test]
fn test_grid_size_bounds() {
    assert_eq!(Board::new(4).unwrap_err(), BoardError::InvalidGridSize(4));
    assert_eq!(Board::new(21).unwrap_err(), BoardError::InvalidGridSize(21));
    assert_eq!(Board::new(5).unwrap().size(), 5);
    assert_eq!(Board::new(20).unwrap().size(), 20);
}

#[test]
fn test_place_each_facing() {
    let mut board = board();
    let id = board.place(Coord::new(5, 5), 3, Facing::North).unwrap();
    let ship = board.ship(id).unwrap();
    assert_eq!(ship.cells(), &[Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)]);

    let id = board.place(Coord::new(1, 10), 4, Facing::East).unwrap();
    assert_eq!(board.ship(id).unwrap().cells().last(), Some(&Coord::new(4, 10)));

    let id = board.place(Coord::new(10, 1), 5, Facing::South).unwrap();
    assert_eq!(board.ship(id).unwrap().cells().last(), Some(&Coord::new(10, 5)));

    let id = board.place(Coord::new(3, 1), 2, Facing::West).unwrap();
    assert_eq!(board.ship(id).unwrap().cells().last(), Some(&Coord::new(2, 1)));
}

#[test]
fn test_reject_out_of_bounds() {
    let board = board();
    assert_eq!(
        check_placement(&board, Coord::new(9, 1), 3, Facing::East).unwrap_err(),
        BoardError::ShipOutOfBounds
    );
    assert!(!can_place(&board, Coord::new(1, 2), 3, Facing::North));
    assert!(can_place(&board, Coord::new(1, 3), 3, Facing::North));
}

#[test]
fn test_reject_overlap_and_touching() {
    let mut board = board();
    board.place(Coord::new(3, 3), 3, Facing::East).unwrap();

    // overlapping
    assert!(!can_place(&board, Coord::new(4, 1), 3, Facing::South));
    // edge contact
    assert!(!can_place(&board, Coord::new(3, 4), 2, Facing::East));
    // diagonal contact
    assert!(!can_place(&board, Coord::new(6, 4), 2, Facing::South));
    // one empty cell between
    assert!(can_place(&board, Coord::new(3, 5), 2, Facing::East));
    assert_eq!(
        board.place(Coord::new(2, 2), 2, Facing::West).unwrap_err(),
        BoardError::ShipOverlaps
    );
}

#[test]
#[should_panic(expected = "unsupported ship length")]
fn test_unsupported_length_is_a_caller_bug() {
    let board = board();
    let _ = can_place(&board, Coord::new(1, 1), 7, Facing::East);
}

#[test]
fn test_fleet_quota() {
    let mut board = Board::new(5).unwrap();
    board.place(Coord::new(1, 1), 3, Facing::East).unwrap();
    assert_eq!(
        board.place(Coord::new(1, 5), 3, Facing::East).unwrap_err(),
        BoardError::FleetQuotaExceeded(3)
    );
    // unsupported lengths have no quota at all
    assert_eq!(
        board.place(Coord::new(1, 5), 6, Facing::East).unwrap_err(),
        BoardError::FleetQuotaExceeded(6)
    );
    assert_eq!(board.unplaced_fleet(), vec![2]);
    board.place(Coord::new(1, 5), 2, Facing::East).unwrap();
    assert!(board.is_fleet_complete());
}

#[test]
fn test_remove_ship_frees_cells() {
    let mut board = board();
    board.place(Coord::new(2, 2), 4, Facing::South).unwrap();
    let ship = board.remove_ship_at(Coord::new(2, 4)).unwrap();
    assert_eq!(ship.length(), 4);
    assert!(board.ships().is_empty());
    assert_eq!(board.cell(Coord::new(2, 2)), Some(Cell::Empty));
    assert_eq!(
        board.remove_ship_at(Coord::new(2, 2)).unwrap_err(),
        BoardError::NoShipAt(Coord::new(2, 2))
    );
}

#[test]
fn test_damaged_ship_cannot_be_removed() {
    let mut board = board();
    board.place(Coord::new(2, 2), 4, Facing::South).unwrap();
    assert_eq!(resolve_shot(&mut board, Coord::new(2, 3)), Outcome::Hit);
    assert!(board.remove_ship_at(Coord::new(2, 2)).is_err());
}

#[test]
fn test_random_fleet_is_complete_and_valid() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut board = board();
    board.place_fleet_randomly(&mut rng).unwrap();
    assert!(board.is_fleet_complete());
    assert_eq!(board.ships().len(), fleet_for(10).len());

    let occupied: usize = board.ships().iter().map(|s| s.length()).sum();
    assert_eq!(occupied, 17);
}

#[test]
fn test_random_fleet_replaces_manual_ships() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut board = board();
    board.place(Coord::new(1, 1), 5, Facing::East).unwrap();
    board.place_fleet_randomly(&mut rng).unwrap();
    assert_eq!(board.ships().len(), fleet_for(10).len());
}

#[test]
fn test_resolve_miss_then_already_shot() {
    let mut board = board();
    board.place(Coord::new(1, 1), 2, Facing::East).unwrap();
    assert_eq!(resolve_shot(&mut board, Coord::new(5, 5)), Outcome::Miss);
    assert_eq!(board.cell(Coord::new(5, 5)), Some(Cell::Miss));
    assert_eq!(resolve_shot(&mut board, Coord::new(5, 5)), Outcome::AlreadyShot);
}

#[test]
fn test_resolve_hit_and_sink() {
    let mut board = board();
    let id = board.place(Coord::new(4, 4), 3, Facing::South).unwrap();

    assert_eq!(resolve_shot(&mut board, Coord::new(4, 4)), Outcome::Hit);
    assert_eq!(resolve_shot(&mut board, Coord::new(4, 4)), Outcome::AlreadyShot);
    assert_eq!(board.ship(id).unwrap().hit_count(), 1);

    assert_eq!(resolve_shot(&mut board, Coord::new(4, 5)), Outcome::Hit);
    assert_eq!(resolve_shot(&mut board, Coord::new(4, 6)), Outcome::Sunk(id));
    assert!(board.ship(id).unwrap().is_sunk());
    for y in 4..=6 {
        assert_eq!(board.cell(Coord::new(4, y)), Some(Cell::SunkShip(id)));
        // never Hit again once sunk
        assert_eq!(resolve_shot(&mut board, Coord::new(4, y)), Outcome::AlreadyShot);
    }
    assert_eq!(board.ship(id).unwrap().hit_count(), 3);
    assert!(board.all_sunk());
}

#[test]
fn test_resolve_outside_grid_is_rejected() {
    let mut board = board();
    assert_eq!(resolve_shot(&mut board, Coord::new(11, 1)), Outcome::AlreadyShot);
    assert_eq!(resolve_shot(&mut board, Coord::new(0, 3)), Outcome::AlreadyShot);
}

#[test]
fn test_empty_board_is_not_defeated() {
    assert!(!board().all_sunk());
}
