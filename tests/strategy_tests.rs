use std::collections::HashSet;

use battleship_sync::strategy::{density, raster_next, EasyAi, HardAi, MediumAi, RelayStrategy};
use battleship_sync::{
    fire_until_accepted, resolve_shot, BitGrid, Board, Coord, Difficulty, Facing, Opponent, Outcome,
    Strategy,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_raster_visits_every_cell_once() {
    for n in [5usize, 10, 20] {
        let mut seen = HashSet::new();
        let mut c = Coord::new(3, 2);
        for _ in 0..n * n {
            assert!(c.in_grid(n), "{} left the {}x{} grid", c, n, n);
            assert!(seen.insert(c), "{} visited twice", c);
            c = raster_next(c, n);
        }
        assert_eq!(seen.len(), n * n);
        assert_eq!(c, Coord::new(3, 2));
    }
}

#[test]
fn test_easy_terminates_within_n_squared() {
    let n = 10;
    let mut rng = SmallRng::seed_from_u64(3);
    let mut ai = EasyAi::new();
    // accepts only the last free cell
    let target = Coord::new(7, 9);
    let mut attempts = 0;
    let fired = fire_until_accepted(&mut ai, &mut rng, n, |c| {
        attempts += 1;
        if c == target {
            Outcome::Miss
        } else {
            Outcome::AlreadyShot
        }
    });
    assert_eq!(fired, Some((target, Outcome::Miss)));
    assert!(attempts <= n * n);
}

#[test]
fn test_fire_gives_up_when_nothing_is_accepted() {
    let n = 5;
    let mut rng = SmallRng::seed_from_u64(3);
    let mut ai = EasyAi::new();
    let mut attempts = 0;
    let fired = fire_until_accepted(&mut ai, &mut rng, n, |_| {
        attempts += 1;
        Outcome::AlreadyShot
    });
    assert_eq!(fired, None);
    assert_eq!(attempts, n * n);
}

#[test]
fn test_easy_clears_a_board() {
    let n = 10;
    let mut rng = SmallRng::seed_from_u64(11);
    let mut board = Board::new(n).unwrap();
    board.place_fleet_randomly(&mut rng).unwrap();
    let mut ai = EasyAi::new();
    let mut shots = 0;
    while !board.all_sunk() {
        fire_until_accepted(&mut ai, &mut rng, n, |c| resolve_shot(&mut board, c)).unwrap();
        shots += 1;
        assert!(shots <= n * n);
    }
}

#[test]
fn test_relay_forwards_queued_shots_only() {
    let mut rng = SmallRng::seed_from_u64(0);
    let mut relay = RelayStrategy::new();
    assert_eq!(relay.next_shot(&mut rng, 10), None);
    relay.push(Coord::new(2, 3));
    assert_eq!(relay.pending(), 1);
    assert_eq!(relay.next_shot(&mut rng, 10), Some(Coord::new(2, 3)));
    assert_eq!(relay.retry_shot(Coord::new(2, 3), &mut rng, 10), None);

    let mut board = Board::new(10).unwrap();
    relay.place_ships(&mut rng, &mut board).unwrap();
    assert!(board.ships().is_empty());
}

#[test]
fn test_medium_probes_neighbours_after_hit() {
    let n = 10;
    let mut rng = SmallRng::seed_from_u64(5);
    let mut ai = MediumAi::new(n).unwrap();
    let hit = Coord::new(5, 5);
    ai.process_answer(hit, Outcome::Hit);

    let neighbours: Vec<Coord> = hit.orthogonal(n).collect();
    for _ in 0..4 {
        let next = ai.next_shot(&mut rng, n).unwrap();
        assert!(neighbours.contains(&next), "{} is not next to {}", next, hit);
    }
    // probes exhausted, back to untried cells
    let next = ai.next_shot(&mut rng, n).unwrap();
    assert!(!neighbours.contains(&next));
    assert_ne!(next, hit);
}

#[test]
fn test_medium_stops_probing_after_sink() {
    let n = 10;
    let mut rng = SmallRng::seed_from_u64(5);
    let mut ai = MediumAi::new(n).unwrap();
    ai.process_answer(Coord::new(1, 1), Outcome::Hit);
    assert_eq!(ai.probes().count(), 2);
    ai.process_answer(Coord::new(2, 1), Outcome::Sunk(0));
    assert_eq!(ai.probes().count(), 0);
    let next = ai.next_shot(&mut rng, n).unwrap();
    assert_ne!(next, Coord::new(1, 1));
    assert_ne!(next, Coord::new(2, 1));
}

#[test]
fn test_medium_never_repeats() {
    let n = 6;
    let mut rng = SmallRng::seed_from_u64(9);
    let mut ai = MediumAi::new(n).unwrap();
    let mut seen = HashSet::new();
    for _ in 0..n * n {
        let c = ai.next_shot(&mut rng, n).unwrap();
        assert!(seen.insert(c), "{} fired twice", c);
        ai.process_answer(c, Outcome::Miss);
    }
}

#[test]
fn test_hard_prefers_cell_next_to_isolated_hit() {
    let n = 10;
    let hit = Coord::new(6, 4);
    for seed in 0..16 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ai = HardAi::new(n).unwrap();
        ai.process_answer(hit, Outcome::Hit);
        let next = ai.next_shot(&mut rng, n).unwrap();
        assert!(hit.orthogonal(n).any(|c| c == next), "seed {}: {} not next to {}", seed, next, hit);
    }
}

#[test]
fn test_hard_tracks_remaining_fleet() {
    let n = 10;
    let mut ai = HardAi::new(n).unwrap();
    assert_eq!(ai.remaining_lengths(), &[5, 4, 3, 3, 2]);
    ai.process_answer(Coord::new(2, 2), Outcome::Hit);
    ai.process_answer(Coord::new(3, 2), Outcome::Sunk(0));
    assert_eq!(ai.remaining_lengths(), &[5, 4, 3, 3]);

    // the sunk ship and its border are no longer candidates
    let heat = ai.heat();
    for c in [Coord::new(1, 1), Coord::new(2, 2), Coord::new(4, 3)] {
        assert_eq!(heat[(c.y - 1) * n + (c.x - 1)], 0.0, "{} still has heat", c);
    }
}

#[test]
fn test_density_is_normalized() {
    let n = 10;
    let hits: BitGrid = BitGrid::try_new(n).unwrap();
    let blocked: BitGrid = BitGrid::try_new(n).unwrap();
    let heat = density(n, &hits, &blocked, &[5, 4, 3, 3, 2]);
    let total: f64 = heat.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    // the centre is more likely than a corner on an empty grid
    assert!(heat[4 * n + 4] > heat[0]);
}

#[test]
fn test_density_uniform_without_placements() {
    let n = 5;
    let hits: BitGrid = BitGrid::try_new(n).unwrap();
    let blocked: BitGrid = BitGrid::try_new(n).unwrap();
    let heat = density(n, &hits, &blocked, &[]);
    assert!(heat.iter().all(|&h| (h - 1.0 / 25.0).abs() < 1e-12));
}

#[test]
fn test_every_tier_clears_a_board() {
    let n = 10;
    for tier in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut board = Board::new(n).unwrap();
        board.place(Coord::new(1, 1), 5, Facing::East).unwrap();
        board.place(Coord::new(10, 3), 4, Facing::South).unwrap();
        board.place(Coord::new(3, 5), 3, Facing::South).unwrap();
        board.place(Coord::new(6, 9), 3, Facing::East).unwrap();
        board.place(Coord::new(6, 5), 2, Facing::East).unwrap();

        let mut ai = Strategy::computer(tier, n).unwrap();
        assert_eq!(ai.difficulty(), Some(tier));
        let mut shots = 0;
        while !board.all_sunk() {
            let (c, out) = fire_until_accepted(&mut ai, &mut rng, n, |c| resolve_shot(&mut board, c)).unwrap();
            ai.process_answer(c, out);
            shots += 1;
            assert!(shots <= n * n, "{:?} needed more than {} shots", tier, n * n);
        }
    }
}

#[test]
fn test_hard_keeps_hunting_other_hit_ship_after_sink() {
    let n = 10;
    let other = Coord::new(7, 7);
    for seed in 0..8 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ai = HardAi::new(n).unwrap();
        ai.process_answer(Coord::new(2, 2), Outcome::Hit);
        ai.process_answer(other, Outcome::Hit);
        ai.process_answer(Coord::new(3, 2), Outcome::Sunk(0));
        assert_eq!(ai.remaining_lengths(), &[5, 4, 3, 3]);

        let heat = ai.heat();
        assert_eq!(heat[(2 - 1) * n + (1 - 1)], 0.0);
        let next = ai.next_shot(&mut rng, n).unwrap();
        assert!(other.orthogonal(n).any(|c| c == next), "seed {}: {} not next to {}", seed, next, other);
    }
}

#[test]
fn test_hard_sink_in_corner_blocks_only_cells_on_the_grid() {
    let n = 10;
    let mut rng = SmallRng::seed_from_u64(3);
    let mut ai = HardAi::new(n).unwrap();
    ai.process_answer(Coord::new(9, 10), Outcome::Hit);
    ai.process_answer(Coord::new(10, 10), Outcome::Sunk(4));
    assert_eq!(ai.remaining_lengths(), &[5, 4, 3, 3]);

    let heat = ai.heat();
    for c in [Coord::new(8, 9), Coord::new(10, 9), Coord::new(10, 10)] {
        assert_eq!(heat[(c.y - 1) * n + (c.x - 1)], 0.0, "{} still has heat", c);
    }
    let next = ai.next_shot(&mut rng, n).unwrap();
    assert!(next.in_grid(n));
    assert!(next.x < 8 || next.y < 9, "{} fired into the sunk corner", next);
}

#[test]
fn test_medium_hit_on_edge_probes_inside_grid() {
    let n = 10;
    let mut rng = SmallRng::seed_from_u64(5);
    let mut ai = MediumAi::new(n).unwrap();
    ai.process_answer(Coord::new(1, 1), Outcome::Hit);
    let first = ai.next_shot(&mut rng, n).unwrap();
    let second = ai.next_shot(&mut rng, n).unwrap();
    let mut got = vec![first, second];
    got.sort_by_key(|c| (c.x, c.y));
    assert_eq!(got, vec![Coord::new(1, 2), Coord::new(2, 1)]);
}
