// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MatcherError, MatcherResult};

/// Square preference matrix. Lower values mark preferred pairings.
///
/// The network only ever borrows a `RankMatrix`, so it stays untouched for
/// every trial of a sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct RankMatrix {
    size: usize,
    data: Vec<f64>,
}

impl RankMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> MatcherResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(MatcherError::EmptyRanks);
        }
        let mut data = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatcherError::NonSquareRanks {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            for (col, value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(MatcherError::NonFiniteRank {
                        row,
                        col,
                        value: *value,
                    });
                }
            }
            data.extend(values);
        }
        Ok(Self { size, data })
    }

    /// Reads a comma separated matrix, one row per line. Blank lines are skipped.
    pub fn load_csv(path: &Path) -> MatcherResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| MatcherError::io(path, source))?;
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .map(|field| field.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| MatcherError::MalformedRanks {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("rank entry is not a number: {err}"),
                })?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Fails fast when the matrix does not match the configured network size.
    pub fn ensure_size(&self, expected: usize) -> MatcherResult<()> {
        if self.size != expected {
            return Err(MatcherError::DimensionMismatch {
                expected,
                rows: self.size,
                cols: self.size,
            });
        }
        Ok(())
    }
}

impl fmt::Display for RankMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.size) {
            let line: Vec<String> = row.iter().map(|v| format!("{v:>4}")).collect();
            writeln!(f, "[{}]", line.join(" "))?;
        }
        Ok(())
    }
}

/// Strategy used to synthesise a rank matrix when none is supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankGenerator {
    /// Every row ranks the columns with an independent random permutation of `1..=n`.
    #[default]
    Random,
    /// Every row shares one permutation, so all rows compete for the same columns.
    Collision,
}

impl RankGenerator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankGenerator::Random => "random",
            RankGenerator::Collision => "collision",
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> MatcherResult<RankMatrix> {
        let ranks: Vec<f64> = (1..=size).map(|r| r as f64).collect();
        let rows = match self {
            RankGenerator::Random => (0..size)
                .map(|_| {
                    let mut row = ranks.clone();
                    row.shuffle(rng);
                    row
                })
                .collect(),
            RankGenerator::Collision => {
                let mut shared = ranks;
                shared.shuffle(rng);
                vec![shared; size]
            }
        };
        RankMatrix::from_rows(rows)
    }
}
