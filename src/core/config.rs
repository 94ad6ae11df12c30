use alloc::vec::Vec;

/// Smallest grid a match can be played on.
pub const MIN_GRID_SIZE: usize = 5;
/// Largest grid a match can be played on.
pub const MAX_GRID_SIZE: usize = 20;
/// Grid size used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: usize = 10;

/// Ship lengths supported by the game, shortest first.
pub const SHIP_LENGTHS: [usize; 4] = [2, 3, 4, 5];

/// Fleet of the 10×10 reference grid as `(length, count)` pairs.
pub const BASE_FLEET: [(usize, usize); 4] = [(5, 1), (4, 1), (3, 2), (2, 1)];

/// Random placement attempts per ship before the layout is discarded.
pub const MAX_SHIP_ATTEMPTS: usize = 200;
/// Fresh layouts tried before automatic placement gives up.
pub const MAX_LAYOUT_ATTEMPTS: usize = 100;

/// Returns `true` for lengths the game knows how to build.
pub fn is_supported_length(length: usize) -> bool {
    SHIP_LENGTHS.contains(&length)
}

/// Returns `true` when `n` is a playable grid size.
pub fn is_valid_grid_size(n: usize) -> bool {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&n)
}

/// Number of ships of each supported length required on an `n`×`n` grid,
/// indexed like [`SHIP_LENGTHS`].
///
/// The base fleet is scaled by the grid area relative to 10×10, rounding
/// to the nearest whole ship. Every grid carries at least one length-2 ship.
pub fn ship_counts(n: usize) -> [usize; 4] {
    let area = n * n;
    let mut counts = [0usize; 4];
    for (length, base) in BASE_FLEET {
        let idx = length - SHIP_LENGTHS[0];
        counts[idx] = (base * area + 50) / 100;
    }
    if counts[0] == 0 {
        counts[0] = 1;
    }
    counts
}

/// Ship lengths of the full fleet for an `n`×`n` grid, longest first.
pub fn fleet_for(n: usize) -> Vec<usize> {
    let counts = ship_counts(n);
    let mut fleet = Vec::new();
    for (idx, &count) in counts.iter().enumerate().rev() {
        for _ in 0..count {
            fleet.push(SHIP_LENGTHS[idx]);
        }
    }
    fleet
}

/// Total number of ship cells in the fleet for an `n`×`n` grid.
pub fn fleet_cells(n: usize) -> usize {
    fleet_for(n).iter().sum()
}
