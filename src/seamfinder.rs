// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam
//!
//! A seam runs from the first column to the last, moving at most one
//! row up or down at every step.  The cumulative cost table is built
//! left to right; the seam is then read off right to left.

use crate::energy::{compute_energy, EnergyFilter};
use crate::error::SeamError;
use crate::pixelbuffer::PixelBuffer;
use itertools::Itertools;
use log::trace;
use std::ops::RangeInclusive;

/// One element of a seam: the row to remove from column `col`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SeamPoint {
    pub col: usize,
    pub row: usize,
}

impl SeamPoint {
    pub fn new(col: usize, row: usize) -> Self {
        SeamPoint { col, row }
    }
}

/// A seam, ordered from the last column down to column zero.
pub type Seam = Vec<SeamPoint>;

// The rows reachable from `row` in one step, clipped to the buffer.
// Iterating it ascending visits the deltas in the order -1, 0, +1.
fn neighbours(row: usize, height: usize) -> RangeInclusive<usize> {
    row.saturating_sub(1)..=(row + 1).min(height - 1)
}

// The cheapest of `row`'s neighbours in column `col`; the first one
// visited wins a tie.
fn cheapest_neighbour(table: &PixelBuffer<f64>, row: usize, col: usize) -> usize {
    neighbours(row, table.height())
        .min_by(|a, b| table[(*a, col)].total_cmp(&table[(*b, col)]))
        .unwrap_or(row)
}

/// Given an energy map, build the table of cumulative costs: each
/// cell holds the least total energy of any path from the first
/// column that ends there.
pub fn calc_dynamics(energy: &PixelBuffer<f64>) -> PixelBuffer<f64> {
    let (height, width) = (energy.height(), energy.width());
    let mut dynamics = PixelBuffer::<f64>::new(height, width);

    // Populate the first column with their native energies.
    for row in 0..height {
        dynamics[(row, 0)] = energy[(row, 0)];
    }

    for col in 1..width {
        for row in 0..height {
            let erg = energy[(row, col)];
            let mut curr_min = dynamics[(row, col - 1)] + erg;
            for parent in neighbours(row, height) {
                let candidate = dynamics[(parent, col - 1)] + erg;
                if candidate < curr_min {
                    curr_min = candidate;
                }
            }
            dynamics[(row, col)] = curr_min;
        }
    }
    dynamics
}

/// Read the cheapest seam out of a cumulative cost table.
pub fn extract_seam(dynamics: &PixelBuffer<f64>) -> Seam {
    let width = dynamics.width();
    let last = width - 1;

    // Find the row of the rightmost cell with the least energy.
    let mut row = (0..dynamics.height())
        .position_min_by(|a, b| dynamics[(*a, last)].total_cmp(&dynamics[(*b, last)]))
        .unwrap_or(0);
    trace!("seam starts at row {} with cost {}", row, dynamics[(row, last)]);

    let mut path = Seam::with_capacity(width);
    path.push(SeamPoint::new(last, row));
    for col in (1..width).rev() {
        row = cheapest_neighbour(dynamics, row, col - 1);
        path.push(SeamPoint::new(col - 1, row));
    }
    path
}

/// Compute the energy of `image` with `filter` and return its
/// cheapest seam.
pub fn low_energy_path<T, F>(image: &PixelBuffer<T>, filter: &F) -> Result<Seam, SeamError>
where
    T: Copy,
    F: EnergyFilter<T> + ?Sized,
{
    let energy = compute_energy(image, filter)?;
    let dynamics = calc_dynamics(&energy);
    Ok(extract_seam(&dynamics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ENERGY_DATA: [f64; 20] = [
        9.0, 9.0, 0.0, 9.0, 9.0, 9.0, 1.0, 9.0, 8.0, 9.0, 9.0, 9.0, 9.0, 9.0, 0.0, 9.0, 9.0, 9.0,
        0.0, 9.0,
    ];

    fn energies() -> PixelBuffer<f64> {
        PixelBuffer::from_vec(4, 5, ENERGY_DATA.to_vec()).unwrap()
    }

    fn diagonal_trough() -> PixelBuffer<f64> {
        PixelBuffer::from_fn(4, 4, |r, c| (r as f64 - c as f64).abs())
    }

    fn rows_of(seam: &[SeamPoint]) -> Vec<usize> {
        seam.iter().map(|p| p.row).collect()
    }

    #[test]
    fn first_column_is_copied() {
        let dynamics = calc_dynamics(&energies());
        for row in 0..4 {
            assert_relative_eq!(dynamics[(row, 0)], 9.0);
        }
    }

    #[test]
    fn dynamics_of_diagonal_trough() {
        let dynamics = calc_dynamics(&diagonal_trough());
        let expected = [
            0.0, 1.0, 2.0, 4.0, //
            1.0, 0.0, 1.0, 2.0, //
            2.0, 2.0, 0.0, 1.0, //
            3.0, 4.0, 3.0, 0.0,
        ];
        assert_eq!(dynamics.to_vec(), expected.to_vec());
    }

    #[test]
    fn energy_grid_to_seam() {
        let seam = extract_seam(&calc_dynamics(&energies()));
        let cols: Vec<usize> = seam.iter().map(|p| p.col).collect();
        assert_eq!(cols, vec![4, 3, 2, 1, 0]);
        assert_eq!(rows_of(&seam), vec![2, 1, 0, 1, 0]);
    }

    #[test]
    fn diagonal_trough_gives_diagonal_seam() {
        let seam = extract_seam(&calc_dynamics(&diagonal_trough()));
        assert_eq!(seam.len(), 4);
        assert!(seam.iter().all(|p| p.row == p.col));
    }

    #[test]
    fn flat_energy_prefers_the_upper_neighbour() {
        let flat = PixelBuffer::filled(3, 4, 1.0);
        let seam = extract_seam(&calc_dynamics(&flat));
        // The last column ties everywhere, so row 0 starts; from there
        // the upper neighbour does not exist and row 0 is kept.
        assert_eq!(rows_of(&seam), vec![0, 0, 0, 0]);

        let mut table = PixelBuffer::filled(3, 2, 5.0);
        table[(2, 1)] = 1.0;
        let seam = extract_seam(&table);
        assert_eq!(rows_of(&seam), vec![2, 1]);
    }

    #[test]
    fn seam_steps_are_connected() {
        let energy = PixelBuffer::from_fn(6, 9, |r, c| ((r * 7 + c * 13) % 11) as f64);
        let seam = extract_seam(&calc_dynamics(&energy));
        assert_eq!(seam.len(), 9);
        for pair in seam.windows(2) {
            assert_eq!(pair[0].col, pair[1].col + 1);
            assert!((pair[0].row as isize - pair[1].row as isize).abs() <= 1);
        }
    }

    #[test]
    fn single_row_buffer_gives_flat_seam() {
        let energy = PixelBuffer::from_vec(1, 3, vec![4.0, 2.0, 7.0]).unwrap();
        let dynamics = calc_dynamics(&energy);
        assert_eq!(dynamics.to_vec(), vec![4.0, 6.0, 13.0]);
        assert_eq!(rows_of(&extract_seam(&dynamics)), vec![0, 0, 0]);
    }

    #[test]
    fn low_energy_path_runs_the_filter() {
        let image = PixelBuffer::from_fn(4, 4, |r, c| (r * 4 + c) as u8);
        let seam = low_energy_path(&image, &|_: &PixelBuffer<u8>| diagonal_trough()).unwrap();
        assert_eq!(rows_of(&seam), vec![3, 2, 1, 0]);
    }
}
