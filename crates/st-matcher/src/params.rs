// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activation::DEFAULT_ALPHA;
use crate::error::{MatcherError, MatcherResult};

/// Energy weights for one network configuration.
///
/// `a` and `b` penalise other active cells in the same row and column, `c`
/// pulls the total mass towards `size + sigma`, and `d` biases each cell by
/// its rank. `alpha` is the activation steepness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    pub sigma: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl NetworkParams {
    /// Builds parameters with the default steepness.
    pub fn new(a: f64, b: f64, c: f64, d: f64, sigma: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            sigma,
            alpha: DEFAULT_ALPHA,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Rejects negative or non-finite weights and a non-positive steepness.
    pub fn validate(&self) -> MatcherResult<()> {
        for (name, value) in [("A", self.a), ("B", self.b), ("C", self.c), ("D", self.d)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatcherError::InvalidParams {
                    reason: format!("{name} must be a finite non-negative weight, got {value}"),
                });
            }
        }
        if !self.sigma.is_finite() {
            return Err(MatcherError::InvalidParams {
                reason: format!("sigma must be finite, got {}", self.sigma),
            });
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(MatcherError::InvalidParams {
                reason: format!("alpha must be finite and positive, got {}", self.alpha),
            });
        }
        Ok(())
    }
}

impl fmt::Display for NetworkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={} B={} C={} D={} sigma={} alpha={}",
            self.a, self.b, self.c, self.d, self.sigma, self.alpha
        )
    }
}

/// The grid swept when no configuration file is supplied.
pub fn default_grid() -> Vec<NetworkParams> {
    let mut grid = Vec::with_capacity(10);
    for sigma in [1.1, 1.0] {
        for d in [20.0, 30.0, 40.0, 45.0, 50.0] {
            grid.push(NetworkParams::new(100.0, 100.0, 90.0, d, sigma));
        }
    }
    grid
}
