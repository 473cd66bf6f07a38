// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! # st-matcher
//!
//! Continuous Hopfield-style relaxation for bipartite assignment.
//!
//! An `N×N` grid of analog neurons is swept asynchronously under an energy
//! that penalises shared rows and columns, pulls the total activation
//! towards `N + sigma`, and biases each cell by a rank matrix. A trial is
//! valid when the grid settles on an exact permutation matrix; its score is
//! the rank mass of the final state (lower is better).
//!
//! The [`harness`] repeats trials per parameter configuration and reports
//! convergence rate, best score and median score. [`report`] persists those
//! summaries as CSV and [`aggregate`] averages them across batch runs.

pub mod activation;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod harness;
pub mod neurons;
pub mod params;
pub mod ranks;
pub mod relax;
pub mod report;
pub mod rule;
pub mod sweep;
pub mod trial;

pub use activation::{activation, DEFAULT_ALPHA};
pub use aggregate::{aggregate_batch, AggregateRow, Aggregator, ParamKey, DEFAULT_RUNS};
pub use config::SweepConfig;
pub use error::{MatcherError, MatcherResult};
pub use harness::{NoOpObserver, SweepHarness, SweepObserver, TestSummary, TEST_COUNT};
pub use neurons::{NeuronMatrix, DEFAULT_SIZE};
pub use params::NetworkParams;
pub use ranks::{RankGenerator, RankMatrix};
pub use relax::{ConvergenceLoop, Relaxation, MAX_EPOCHS, MAX_NO_CHANGE_EPOCHS};
pub use report::{save_report, summaries_to_csv, ReportRow, ReportTable, REPORT_COLUMNS};
pub use sweep::SweepStrategy;
pub use trial::{TestResult, TrialRunner};
