// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;

use rand::Rng;

use crate::ranks::RankMatrix;

/// Network size used by the default sweep.
pub const DEFAULT_SIZE: usize = 10;

/// Square grid of neuron activations, stored row-major.
///
/// Each trial owns its own matrix; nothing in the crate hands out shared
/// mutable access to one.
#[derive(Clone, Debug, PartialEq)]
pub struct NeuronMatrix {
    size: usize,
    data: Vec<f64>,
}

impl NeuronMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Independent uniform draws in `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let data = (0..size * size).map(|_| rng.gen::<f64>()).collect();
        Self { size, data }
    }

    /// Permutation matrix with a one at `(row, assignment[row])`.
    ///
    /// # Panics
    /// Panics when an assigned column is out of range.
    pub fn from_assignment(assignment: &[usize]) -> Self {
        let size = assignment.len();
        let mut matrix = Self::zeros(size);
        for (row, &col) in assignment.iter().enumerate() {
            assert!(col < size, "column {col} out of range for size {size}");
            matrix.set(row, col, 1.0);
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.size;
        &self.data[start..start + self.size]
    }

    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).iter().sum()
    }

    pub fn col_sum(&self, col: usize) -> f64 {
        (0..self.size).map(|row| self.get(row, col)).sum()
    }

    /// Sum of the row sums, accumulated row by row.
    pub fn total(&self) -> f64 {
        (0..self.size).map(|row| self.row_sum(row)).sum()
    }

    /// Elementwise product with the rank matrix, summed.
    pub fn score(&self, ranks: &RankMatrix) -> f64 {
        self.data
            .iter()
            .zip(ranks.as_slice())
            .map(|(neuron, rank)| rank * neuron)
            .sum()
    }

    /// Exact permutation test: `size` cells equal to one, and every row and
    /// column summing to exactly one. No tolerance is applied.
    pub fn is_permutation(&self) -> bool {
        let ones = self.data.iter().filter(|&&v| v == 1.0).count();
        ones == self.size
            && (0..self.size).all(|row| self.row_sum(row) == 1.0)
            && (0..self.size).all(|col| self.col_sum(col) == 1.0)
    }

    /// Column chosen by each row when the matrix is a permutation.
    pub fn assignment(&self) -> Option<Vec<usize>> {
        if !self.is_permutation() {
            return None;
        }
        (0..self.size)
            .map(|row| self.row(row).iter().position(|&v| v == 1.0))
            .collect()
    }
}

impl fmt::Display for NeuronMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.size.max(1)) {
            let line: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
            writeln!(f, "[{}]", line.join(" "))?;
        }
        Ok(())
    }
}
