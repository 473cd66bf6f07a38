// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::neurons::NeuronMatrix;
use crate::params::NetworkParams;
use crate::ranks::RankMatrix;
use crate::rule::update_cell;

/// Visitation order for one pass over the grid.
///
/// Both orders update in place, so a cell sees every write made earlier in
/// the same pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepStrategy {
    /// Row-major traversal.
    Ordered,
    /// Rows and columns shuffled independently for every pass.
    #[default]
    Randomized,
}

impl SweepStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepStrategy::Ordered => "ordered",
            SweepStrategy::Randomized => "randomized",
        }
    }

    /// Calls `visit` once for every cell of a `size`×`size` grid, rows outer.
    pub fn for_each_cell<R, F>(&self, size: usize, rng: &mut R, mut visit: F)
    where
        R: Rng + ?Sized,
        F: FnMut(usize, usize),
    {
        let mut rows: Vec<usize> = (0..size).collect();
        let mut cols: Vec<usize> = (0..size).collect();
        if let SweepStrategy::Randomized = self {
            rows.shuffle(rng);
            cols.shuffle(rng);
        }
        for &row in &rows {
            for &col in &cols {
                visit(row, col);
            }
        }
    }

    /// Runs one pass of the update rule. Returns `true` when any cell changed.
    pub fn sweep<R: Rng + ?Sized>(
        &self,
        neurons: &mut NeuronMatrix,
        ranks: &RankMatrix,
        params: &NetworkParams,
        rng: &mut R,
    ) -> bool {
        let mut changed = false;
        self.for_each_cell(neurons.size(), rng, |row, col| {
            changed |= update_cell(neurons, ranks, params, row, col);
        });
        changed
    }
}
