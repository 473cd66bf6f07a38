// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MatcherError, MatcherResult};
use crate::neurons::NeuronMatrix;
use crate::params::NetworkParams;
use crate::ranks::RankMatrix;
use crate::sweep::SweepStrategy;

/// Hard cap on sweeps per trial.
pub const MAX_EPOCHS: usize = 1000;
/// Consecutive unchanged sweeps after which a trial counts as settled.
pub const MAX_NO_CHANGE_EPOCHS: usize = 20;

/// Repeats sweeps until the state stops moving or the budget runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceLoop {
    pub max_epochs: usize,
    pub max_no_change_epochs: usize,
    pub strategy: SweepStrategy,
}

impl Default for ConvergenceLoop {
    fn default() -> Self {
        Self {
            max_epochs: MAX_EPOCHS,
            max_no_change_epochs: MAX_NO_CHANGE_EPOCHS,
            strategy: SweepStrategy::Randomized,
        }
    }
}

/// How a relaxation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relaxation {
    /// Sweeps executed, never above `max_epochs`.
    pub epochs: usize,
    /// `true` when the no-change streak, not the epoch budget, stopped the loop.
    pub settled: bool,
}

impl ConvergenceLoop {
    pub fn validate(&self) -> MatcherResult<()> {
        if self.max_epochs == 0 {
            return Err(MatcherError::InvalidBudget {
                name: "max_epochs",
                reason: "must allow at least one sweep".into(),
            });
        }
        if self.max_no_change_epochs == 0 {
            return Err(MatcherError::InvalidBudget {
                name: "max_no_change_epochs",
                reason: "must be at least one".into(),
            });
        }
        Ok(())
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        neurons: &mut NeuronMatrix,
        ranks: &RankMatrix,
        params: &NetworkParams,
        rng: &mut R,
    ) -> Relaxation {
        let mut epochs = 0;
        let mut streak = 0;
        while streak < self.max_no_change_epochs && epochs < self.max_epochs {
            if self.strategy.sweep(neurons, ranks, params, rng) {
                streak = 0;
            } else {
                streak += 1;
            }
            epochs += 1;
        }
        Relaxation {
            epochs,
            settled: streak >= self.max_no_change_epochs,
        }
    }
}
