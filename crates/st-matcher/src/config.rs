// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MatcherError, MatcherResult};
use crate::harness::{validate_grid, SweepHarness, TEST_COUNT};
use crate::neurons::DEFAULT_SIZE;
use crate::params::{default_grid, NetworkParams};
use crate::ranks::RankGenerator;
use crate::relax::{ConvergenceLoop, MAX_EPOCHS, MAX_NO_CHANGE_EPOCHS};
use crate::sweep::SweepStrategy;

/// Sweep configuration as read from TOML. Every key is optional.
///
/// ```toml
/// size = 10
/// trials = 150
/// sweep = "randomized"
/// ranks = "collision"
/// seed = 7
///
/// [[params]]
/// A = 100
/// B = 100
/// C = 90
/// D = 40
/// sigma = 1.1
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub size: usize,
    pub trials: usize,
    pub max_epochs: usize,
    pub max_no_change_epochs: usize,
    pub sweep: SweepStrategy,
    pub ranks: RankGenerator,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub params: Vec<NetworkParams>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            trials: TEST_COUNT,
            max_epochs: MAX_EPOCHS,
            max_no_change_epochs: MAX_NO_CHANGE_EPOCHS,
            sweep: SweepStrategy::default(),
            ranks: RankGenerator::default(),
            seed: None,
            parallel: true,
            params: default_grid(),
        }
    }
}

impl SweepConfig {
    pub fn load(path: &Path) -> MatcherResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| MatcherError::io(path, source))?;
        toml::from_str(&text).map_err(|source| MatcherError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> MatcherResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Rejects zero budgets, a zero size and an empty or invalid parameter grid.
    pub fn validate(&self) -> MatcherResult<()> {
        self.harness().validate_budgets()?;
        validate_grid(&self.params)
    }

    pub fn harness(&self) -> SweepHarness {
        SweepHarness {
            size: self.size,
            trials: self.trials,
            relax: ConvergenceLoop {
                max_epochs: self.max_epochs,
                max_no_change_epochs: self.max_no_change_epochs,
                strategy: self.sweep,
            },
            parallel: self.parallel,
        }
    }
}
