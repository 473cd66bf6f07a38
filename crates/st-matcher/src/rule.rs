// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Per-cell update rule of the assignment energy.

use crate::activation::activation;
use crate::neurons::NeuronMatrix;
use crate::params::NetworkParams;
use crate::ranks::RankMatrix;

/// Input potential of cell `(row, col)` against the current state.
///
/// The row and column penalties exclude the cell's own value. The global
/// term pulls the total activation towards `size + sigma` and the rank term
/// favours low ranks for positive `d`.
pub fn potential(
    neurons: &NeuronMatrix,
    ranks: &RankMatrix,
    params: &NetworkParams,
    row: usize,
    col: usize,
) -> f64 {
    let cell = neurons.get(row, col);
    let target = neurons.size() as f64 + params.sigma;
    -(params.a * (neurons.row_sum(row) - cell))
        - (params.b * (neurons.col_sum(col) - cell))
        - (params.c * (neurons.total() - target))
        - (params.d * ranks.get(row, col))
}

/// Recomputes one cell in place. Returns `true` when the stored value changed.
///
/// The comparison is exact: a cell only counts as stable when the new
/// activation is bit-for-bit the value already stored.
pub fn update_cell(
    neurons: &mut NeuronMatrix,
    ranks: &RankMatrix,
    params: &NetworkParams,
    row: usize,
    col: usize,
) -> bool {
    let next = activation(potential(neurons, ranks, params, row, col), params.alpha);
    if neurons.get(row, col) != next {
        neurons.set(row, col, next);
        true
    } else {
        false
    }
}
