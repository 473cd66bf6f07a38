// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Mean convergence rate across repeated batch runs.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::MatcherResult;
use crate::report::{parse_number, ReportTable};

/// Columns that identify a configuration across reports.
pub const KEY_COLUMNS: [&str; 6] = ["A", "B", "C", "D", "sigma", "alpha"];

/// Runs expected under the batch root when nothing else is specified.
pub const DEFAULT_RUNS: usize = 100;

/// Parameter tuple exactly as written in the report, so `1` and `1.0` stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamKey(pub [String; 6]);

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateRow {
    pub key: ParamKey,
    pub runs: usize,
    pub mean_convergence_rate: f64,
}

impl fmt::Display for AggregateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.mean_convergence_rate)
    }
}

/// Groups convergence rates by key, preserving first-seen order.
#[derive(Debug, Default)]
pub struct Aggregator {
    order: Vec<ParamKey>,
    rates: HashMap<ParamKey, Vec<f64>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: ParamKey, rate: f64) {
        match self.rates.get_mut(&key) {
            Some(rates) => rates.push(rate),
            None => {
                self.order.push(key.clone());
                self.rates.insert(key, vec![rate]);
            }
        }
    }

    /// Adds every row of a parsed report.
    pub fn add_table(&mut self, path: &Path, table: &ReportTable) -> MatcherResult<()> {
        let key_idx = KEY_COLUMNS
            .iter()
            .map(|name| table.column(path, name))
            .collect::<MatcherResult<Vec<_>>>()?;
        let rate_idx = table.column(path, "convergence_rate")?;
        for (row_idx, fields) in table.rows().enumerate() {
            let rate = parse_number(path, row_idx + 2, "convergence_rate", &fields[rate_idx])?;
            let key: [String; 6] = std::array::from_fn(|i| fields[key_idx[i]].clone());
            self.push(ParamKey(key), rate);
        }
        Ok(())
    }

    pub fn rows(&self) -> Vec<AggregateRow> {
        self.order
            .iter()
            .map(|key| {
                let rates = &self.rates[key];
                AggregateRow {
                    key: key.clone(),
                    runs: rates.len(),
                    mean_convergence_rate: rates.iter().sum::<f64>() / rates.len() as f64,
                }
            })
            .collect()
    }
}

/// Path of the report for batch run `run` under `root`.
pub fn batch_report_path(root: &Path, run: usize) -> PathBuf {
    root.join(run.to_string()).join("report.csv")
}

/// Reads `root/1/report.csv` through `root/runs/report.csv`. The first
/// missing or unreadable report aborts the aggregation.
pub fn aggregate_batch(root: &Path, runs: usize) -> MatcherResult<Vec<AggregateRow>> {
    let mut aggregator = Aggregator::new();
    for run in 1..=runs {
        info!("processing execution: {run}");
        let path = batch_report_path(root, run);
        let table = ReportTable::load(&path)?;
        aggregator.add_table(&path, &table)?;
    }
    Ok(aggregator.rows())
}
