// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fs;
use std::path::Path;

use crate::error::{MatcherError, MatcherResult};
use crate::harness::TestSummary;
use crate::params::NetworkParams;

/// Column order of the persisted report.
pub const REPORT_COLUMNS: [&str; 9] = [
    "A",
    "B",
    "C",
    "D",
    "sigma",
    "alpha",
    "convergence_rate",
    "top_score",
    "median_score",
];

/// One persisted report line, independent of the in-memory summary layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub params: NetworkParams,
    pub convergence_rate: f64,
    pub top_score: Option<f64>,
    pub median_score: Option<f64>,
}

impl From<&TestSummary> for ReportRow {
    fn from(summary: &TestSummary) -> Self {
        Self {
            params: summary.params,
            convergence_rate: summary.convergence_rate,
            top_score: summary.top_score,
            median_score: summary.median_score,
        }
    }
}

impl ReportRow {
    /// Field values in `REPORT_COLUMNS` order. Absent scores are empty.
    pub fn fields(&self) -> [String; 9] {
        let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        [
            self.params.a.to_string(),
            self.params.b.to_string(),
            self.params.c.to_string(),
            self.params.d.to_string(),
            self.params.sigma.to_string(),
            self.params.alpha.to_string(),
            self.convergence_rate.to_string(),
            optional(self.top_score),
            optional(self.median_score),
        ]
    }
}

/// Formats summaries as CSV with a header row.
pub fn summaries_to_csv(summaries: &[TestSummary]) -> String {
    let mut csv = REPORT_COLUMNS.join(",");
    csv.push('\n');
    for summary in summaries {
        csv.push_str(&ReportRow::from(summary).fields().join(","));
        csv.push('\n');
    }
    csv
}

pub fn save_report(path: &Path, summaries: &[TestSummary]) -> MatcherResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| MatcherError::io(parent, source))?;
        }
    }
    fs::write(path, summaries_to_csv(summaries)).map_err(|source| MatcherError::io(path, source))
}

/// Report contents keyed by column name, as read back from disk.
#[derive(Clone, Debug)]
pub struct ReportTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn load(path: &Path) -> MatcherResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| MatcherError::io(path, source))?;
        Self::parse(path, &text)
    }

    /// Parses report text. `path` is only used for diagnostics.
    pub fn parse(path: &Path, text: &str) -> MatcherResult<Self> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
        let header: Vec<String> = match lines.next() {
            Some((_, line)) => split_fields(line),
            None => {
                return Err(MatcherError::MalformedReport {
                    path: path.to_path_buf(),
                    line: 1,
                    reason: "missing header row".into(),
                })
            }
        };
        let mut rows = Vec::new();
        for (idx, line) in lines {
            let fields = split_fields(line);
            if fields.len() != header.len() {
                return Err(MatcherError::MalformedReport {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("expected {} fields, found {}", header.len(), fields.len()),
                });
            }
            rows.push(fields);
        }
        Ok(Self { header, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, path: &Path, name: &str) -> MatcherResult<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MatcherError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Typed rows; requires every `REPORT_COLUMNS` entry.
    pub fn report_rows(&self, path: &Path) -> MatcherResult<Vec<ReportRow>> {
        let idx = REPORT_COLUMNS
            .iter()
            .map(|name| self.column(path, name))
            .collect::<MatcherResult<Vec<_>>>()?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, fields)| -> MatcherResult<ReportRow> {
                let line = row_idx + 2;
                let number = |col: usize| parse_number(path, line, REPORT_COLUMNS[col], &fields[idx[col]]);
                let optional = |col: usize| {
                    let raw = &fields[idx[col]];
                    if raw.is_empty() {
                        Ok(None)
                    } else {
                        parse_number(path, line, REPORT_COLUMNS[col], raw).map(Some)
                    }
                };
                Ok(ReportRow {
                    params: NetworkParams {
                        a: number(0)?,
                        b: number(1)?,
                        c: number(2)?,
                        d: number(3)?,
                        sigma: number(4)?,
                        alpha: number(5)?,
                    },
                    convergence_rate: number(6)?,
                    top_score: optional(7)?,
                    median_score: optional(8)?,
                })
            })
            .collect()
    }
}

pub(crate) fn parse_number(path: &Path, line: usize, column: &str, raw: &str) -> MatcherResult<f64> {
    raw.parse::<f64>().map_err(|err| MatcherError::MalformedReport {
        path: path.to_path_buf(),
        line,
        reason: format!("column `{column}` is not a number ({raw:?}): {err}"),
    })
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|f| f.trim().to_string()).collect()
}
