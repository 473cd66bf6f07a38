// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use rand::Rng;

use crate::neurons::NeuronMatrix;
use crate::params::NetworkParams;
use crate::ranks::RankMatrix;
use crate::relax::ConvergenceLoop;

/// Outcome of relaxing one randomly initialised network.
#[derive(Clone, Debug, PartialEq)]
pub struct TestResult {
    /// The final state is exactly a permutation matrix.
    pub valid: bool,
    /// Rank-weighted activation mass of the final state.
    pub score: f64,
    pub neurons: NeuronMatrix,
    pub epochs: usize,
}

/// Runs single trials against a borrowed rank matrix.
#[derive(Clone, Copy, Debug)]
pub struct TrialRunner<'a> {
    ranks: &'a RankMatrix,
    params: &'a NetworkParams,
    relax: ConvergenceLoop,
}

impl<'a> TrialRunner<'a> {
    pub fn new(ranks: &'a RankMatrix, params: &'a NetworkParams, relax: ConvergenceLoop) -> Self {
        Self {
            ranks,
            params,
            relax,
        }
    }

    /// Fresh uniform initial state, relaxed to completion.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> TestResult {
        let neurons = NeuronMatrix::random(self.ranks.size(), rng);
        self.run_from(neurons, rng)
    }

    /// Relaxes a caller-provided initial state.
    ///
    /// # Panics
    /// Panics when `neurons` and the rank matrix differ in size; the harness
    /// checks sizes before any trial starts.
    pub fn run_from<R: Rng + ?Sized>(&self, mut neurons: NeuronMatrix, rng: &mut R) -> TestResult {
        assert_eq!(
            neurons.size(),
            self.ranks.size(),
            "neuron and rank matrices must share a size"
        );
        let outcome = self.relax.run(&mut neurons, self.ranks, self.params, rng);
        TestResult {
            valid: neurons.is_permutation(),
            score: neurons.score(self.ranks),
            neurons,
            epochs: outcome.epochs,
        }
    }
}
