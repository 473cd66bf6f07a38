// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::path::PathBuf;

/// Convenience alias used across the matcher.
pub type MatcherResult<T> = Result<T, MatcherError>;

/// Failures surfaced by the matcher. Non-convergence is deliberately absent:
/// a trial that never reaches a permutation is an ordinary `valid = false`
/// outcome, not an error.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// Rank matrix and configured network size disagree.
    #[error("rank matrix is {rows}x{cols} but the network is configured for {expected}x{expected}")]
    DimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    /// A row of the rank matrix has the wrong number of entries.
    #[error("rank matrix row {row} has {len} entries but {expected} were expected")]
    NonSquareRanks {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("rank matrix must contain at least one row")]
    EmptyRanks,
    #[error("rank matrix entry ({row}, {col}) is not finite: {value}")]
    NonFiniteRank { row: usize, col: usize, value: f64 },
    #[error("invalid network parameters: {reason}")]
    InvalidParams { reason: String },
    #[error("invalid budget `{name}`: {reason}")]
    InvalidBudget { name: &'static str, reason: String },
    #[error("the parameter grid is empty; nothing to sweep")]
    EmptyParamGrid,
    #[error("failed to parse TOML {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rank file {path:?} line {line}: {reason}")]
    MalformedRanks {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("report {path:?} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: String },
    #[error("report {path:?} line {line}: {reason}")]
    MalformedReport {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl MatcherError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MatcherError::Io {
            path: path.into(),
            source,
        }
    }
}
