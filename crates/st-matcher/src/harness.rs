// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Repeated stochastic trials per parameter configuration.
//!
//! Each configuration draws one seed per trial from the caller's master RNG
//! before any trial runs. Trials then own an independent `StdRng`, which
//! keeps the summaries identical whether they execute sequentially or on the
//! rayon pool.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::{MatcherError, MatcherResult};
use crate::neurons::NeuronMatrix;
use crate::params::NetworkParams;
use crate::ranks::RankMatrix;
use crate::relax::ConvergenceLoop;
use crate::trial::{TestResult, TrialRunner};

/// Trials per configuration in the default sweep.
pub const TEST_COUNT: usize = 150;

/// Aggregate statistics for one configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TestSummary {
    pub params: NetworkParams,
    pub trials: usize,
    pub valid_trials: usize,
    pub convergence_rate: f64,
    /// Lowest score among valid trials.
    pub top_score: Option<f64>,
    /// Score at index `valid / 2` of the ascending valid scores.
    pub median_score: Option<f64>,
    pub top_result: Option<NeuronMatrix>,
}

impl TestSummary {
    /// Summarises the trials of one configuration.
    ///
    /// Valid results are ordered by ascending score; the first is the top
    /// result and the element at `len / 2` is the median, without
    /// interpolation for even counts.
    pub fn from_results(params: NetworkParams, results: &[TestResult]) -> Self {
        let mut valid: Vec<&TestResult> = results.iter().filter(|r| r.valid).collect();
        valid.sort_by(|lhs, rhs| lhs.score.total_cmp(&rhs.score));

        let convergence_rate = if results.is_empty() {
            0.0
        } else {
            valid.len() as f64 / results.len() as f64
        };
        Self {
            params,
            trials: results.len(),
            valid_trials: valid.len(),
            convergence_rate,
            top_score: valid.first().map(|r| r.score),
            median_score: valid.get(valid.len() / 2).map(|r| r.score),
            top_result: valid.first().map(|r| r.neurons.clone()),
        }
    }

    pub fn converged(&self) -> bool {
        self.valid_trials > 0
    }
}

/// Progress hooks invoked in trial order.
pub trait SweepObserver {
    fn on_config_start(&mut self, _index: usize, _params: &NetworkParams) {}
    fn on_trial_end(&mut self, _trial: usize, _result: &TestResult) {}
    fn on_config_end(&mut self, _index: usize, _summary: &TestSummary) {}
}

pub struct NoOpObserver;
impl SweepObserver for NoOpObserver {}

/// Runs every configuration of a parameter grid against one rank matrix.
#[derive(Clone, Copy, Debug)]
pub struct SweepHarness {
    pub size: usize,
    pub trials: usize,
    pub relax: ConvergenceLoop,
    pub parallel: bool,
}

impl Default for SweepHarness {
    fn default() -> Self {
        Self {
            size: crate::neurons::DEFAULT_SIZE,
            trials: TEST_COUNT,
            relax: ConvergenceLoop::default(),
            parallel: true,
        }
    }
}

impl SweepHarness {
    /// Checks everything that can be known before the first trial.
    pub fn validate(&self, ranks: &RankMatrix, grid: &[NetworkParams]) -> MatcherResult<()> {
        self.validate_budgets()?;
        ranks.ensure_size(self.size)?;
        validate_grid(grid)
    }

    pub fn validate_budgets(&self) -> MatcherResult<()> {
        if self.size == 0 {
            return Err(MatcherError::InvalidBudget {
                name: "size",
                reason: "network needs at least one row".into(),
            });
        }
        if self.trials == 0 {
            return Err(MatcherError::InvalidBudget {
                name: "trials",
                reason: "must run at least one trial per configuration".into(),
            });
        }
        self.relax.validate()
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        ranks: &RankMatrix,
        grid: &[NetworkParams],
        rng: &mut R,
    ) -> MatcherResult<Vec<TestSummary>> {
        self.run_observed(ranks, grid, rng, &mut NoOpObserver)
    }

    pub fn run_observed<R: Rng + ?Sized>(
        &self,
        ranks: &RankMatrix,
        grid: &[NetworkParams],
        rng: &mut R,
        observer: &mut dyn SweepObserver,
    ) -> MatcherResult<Vec<TestSummary>> {
        self.validate(ranks, grid)?;
        info!("testing ranks:\n{ranks}");

        let mut summaries = Vec::with_capacity(grid.len());
        for (index, params) in grid.iter().enumerate() {
            info!("using params: {params}");
            observer.on_config_start(index, params);

            let seeds: Vec<u64> = (0..self.trials).map(|_| rng.gen()).collect();
            let results = self.run_trials(ranks, params, &seeds);
            for (trial, result) in results.iter().enumerate() {
                observer.on_trial_end(trial, result);
            }

            let summary = TestSummary::from_results(*params, &results);
            log_summary(&summary);
            observer.on_config_end(index, &summary);
            summaries.push(summary);
        }
        Ok(summaries)
    }

    fn run_trials(&self, ranks: &RankMatrix, params: &NetworkParams, seeds: &[u64]) -> Vec<TestResult> {
        let runner = TrialRunner::new(ranks, params, self.relax);
        let trial = |seed: &u64| runner.run(&mut StdRng::seed_from_u64(*seed));

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            if self.parallel {
                return seeds.par_iter().map(trial).collect();
            }
        }

        seeds.iter().map(trial).collect()
    }
}

/// Rejects an empty grid or any invalid entry.
pub fn validate_grid(grid: &[NetworkParams]) -> MatcherResult<()> {
    if grid.is_empty() {
        return Err(MatcherError::EmptyParamGrid);
    }
    grid.iter().try_for_each(NetworkParams::validate)
}

fn log_summary(summary: &TestSummary) {
    info!("convergence rate: {:.2}%", summary.convergence_rate * 100.0);
    match (&summary.top_result, summary.top_score, summary.median_score) {
        (Some(top), Some(top_score), Some(median)) => {
            info!("top result:\n{top}");
            info!("top result score: {top_score:.6}");
            info!("median result (of converged): {median:.6}");
        }
        _ => info!("no runs converged"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranks::RankGenerator;
    use rand::seq::SliceRandom;

    fn result(valid: bool, score: f64) -> TestResult {
        TestResult {
            valid,
            score,
            neurons: NeuronMatrix::zeros(2),
            epochs: 1,
        }
    }

    fn params() -> NetworkParams {
        NetworkParams::new(1.0, 1.0, 1.0, 1.0, 0.5)
    }

    #[test]
    fn no_valid_trials_leave_scores_absent() {
        let results: Vec<_> = (0..150).map(|i| result(false, i as f64)).collect();
        let summary = TestSummary::from_results(params(), &results);
        assert_eq!(summary.convergence_rate, 0.0);
        assert_eq!(summary.top_score, None);
        assert_eq!(summary.median_score, None);
        assert!(!summary.converged());
    }

    #[test]
    fn summary_uses_min_and_half_index_scores() {
        let mut results: Vec<_> = (1..=30).map(|k| result(true, 2.0 * k as f64)).collect();
        results.extend((0..120).map(|_| result(false, 0.5)));
        results.shuffle(&mut StdRng::seed_from_u64(2));

        let summary = TestSummary::from_results(params(), &results);
        assert_eq!(summary.trials, 150);
        assert_eq!(summary.valid_trials, 30);
        assert_eq!(summary.convergence_rate, 0.2);
        assert_eq!(summary.top_score, Some(2.0));
        assert_eq!(summary.median_score, Some(32.0));
    }

    #[test]
    fn odd_and_single_valid_counts() {
        let results = vec![result(true, 9.0), result(true, 3.0), result(true, 5.0)];
        let summary = TestSummary::from_results(params(), &results);
        assert_eq!(summary.top_score, Some(3.0));
        assert_eq!(summary.median_score, Some(5.0));

        let summary = TestSummary::from_results(params(), &[result(true, 7.0), result(false, 1.0)]);
        assert_eq!(summary.convergence_rate, 0.5);
        assert_eq!(summary.top_score, Some(7.0));
        assert_eq!(summary.median_score, Some(7.0));
    }

    #[test]
    fn mismatched_rank_size_fails_before_any_trial() {
        struct Panicking;
        impl SweepObserver for Panicking {
            fn on_config_start(&mut self, _: usize, _: &NetworkParams) {
                panic!("no configuration should start");
            }
        }
        let ranks = RankMatrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        let harness = SweepHarness::default();
        let err = harness
            .run_observed(&ranks, &[params()], &mut StdRng::seed_from_u64(0), &mut Panicking)
            .unwrap_err();
        assert!(matches!(err, MatcherError::DimensionMismatch { expected: 10, .. }));
    }

    #[test]
    fn empty_grid_and_bad_params_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let ranks = RankGenerator::Random.generate(3, &mut rng).unwrap();
        let harness = SweepHarness {
            size: 3,
            trials: 2,
            ..SweepHarness::default()
        };
        assert!(matches!(
            harness.run(&ranks, &[], &mut rng),
            Err(MatcherError::EmptyParamGrid)
        ));
        let bad = NetworkParams::new(1.0, 1.0, 1.0, 1.0, 0.5).with_alpha(-2.0);
        assert!(matches!(
            harness.run(&ranks, &[bad], &mut rng),
            Err(MatcherError::InvalidParams { .. })
        ));
    }

    #[test]
    fn observer_sees_every_trial_in_order() {
        #[derive(Default)]
        struct Recorder {
            starts: usize,
            trials: Vec<usize>,
            ends: usize,
        }
        impl SweepObserver for Recorder {
            fn on_config_start(&mut self, _: usize, _: &NetworkParams) {
                self.starts += 1;
            }
            fn on_trial_end(&mut self, trial: usize, _: &TestResult) {
                self.trials.push(trial);
            }
            fn on_config_end(&mut self, _: usize, _: &TestSummary) {
                self.ends += 1;
            }
        }

        let mut rng = StdRng::seed_from_u64(12);
        let ranks = RankGenerator::Random.generate(4, &mut rng).unwrap();
        let harness = SweepHarness {
            size: 4,
            trials: 5,
            ..SweepHarness::default()
        };
        let grid = [params(), NetworkParams::new(100.0, 100.0, 90.0, 20.0, 1.0)];
        let mut recorder = Recorder::default();
        let summaries = harness
            .run_observed(&ranks, &grid, &mut rng, &mut recorder)
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(recorder.starts, 2);
        assert_eq!(recorder.ends, 2);
        assert_eq!(recorder.trials, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
        for summary in &summaries {
            assert_eq!(summary.trials, 5);
            assert!((0.0..=1.0).contains(&summary.convergence_rate));
        }
    }
}
