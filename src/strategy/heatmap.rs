// Probability-based targeting for the hard AI.
// no_std: floating point powers go through libm.

use alloc::vec;
use alloc::vec::Vec;

use crate::core::{BitGrid, Coord};

/// Weight multiplier per known hit covered by a candidate placement.
///
/// Placements through confirmed hits must dominate the open-water ones, or
/// cells next to a hit do not stand out against the rest of the grid.
pub const HIT_BIAS: f64 = 10.0;

/// Probability density over an `n`×`n` grid (row-major, index
/// `(y-1)*n + (x-1)`) of a ship segment lying in each cell.
///
/// Every remaining ship length is tried horizontally and vertically at every
/// origin. Placements crossing a `blocked` cell (misses, sunk ships and their
/// surroundings) are discarded. The rest add their weight to each cell they
/// cover that is not already a hit. The result sums to 1; with no valid
/// placement left the distribution is uniform.
pub fn density(n: usize, hits: &BitGrid, blocked: &BitGrid, remaining_lengths: &[usize]) -> Vec<f64> {
    let mut matrix = vec![0.0f64; n * n];

    for &len in remaining_lengths.iter() {
        if len == 0 || len > n {
            continue;
        }
        for (dx, dy) in [(1usize, 0usize), (0, 1)] {
            let max_x = if dx == 1 { n - len + 1 } else { n };
            let max_y = if dy == 1 { n - len + 1 } else { n };
            for y in 1..=max_y {
                for x in 1..=max_x {
                    let mut valid = true;
                    let mut n_hits = 0i32;
                    for k in 0..len {
                        let c = Coord::new(x + dx * k, y + dy * k);
                        if blocked.contains(c) {
                            valid = false;
                            break;
                        }
                        if hits.contains(c) {
                            n_hits += 1;
                        }
                    }
                    if !valid {
                        continue;
                    }
                    let weight = if n_hits == 0 {
                        1.0
                    } else {
                        libm::pow(HIT_BIAS, n_hits as f64)
                    };
                    for k in 0..len {
                        let c = Coord::new(x + dx * k, y + dy * k);
                        if !hits.contains(c) {
                            matrix[(c.y - 1) * n + (c.x - 1)] += weight;
                        }
                    }
                }
            }
        }
    }

    normalize(matrix)
}

fn normalize(mut matrix: Vec<f64>) -> Vec<f64> {
    let total: f64 = matrix.iter().sum();
    if total == 0.0 {
        let uniform = 1.0 / matrix.len().max(1) as f64;
        matrix.iter_mut().for_each(|v| *v = uniform);
        return matrix;
    }
    matrix.iter_mut().for_each(|v| *v /= total);
    matrix
}
