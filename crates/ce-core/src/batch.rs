//! Parallel evaluation of a batch of observations.
//!
//! Rows are independent, so the batch is a plain parallel map. Output order
//! matches input order. A row whose computation fails keeps its error and
//! does not stop the others.

use ce_math::{
    ConfidenceLevel, EfficiencyCalculator, EfficiencyError, EfficiencyResult, ErrorKind,
    Observation, SolverConfig,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::data::DataRow;

/// Interval for a successful row, with derived width and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalSummary {
    pub mode: f64,
    pub low: f64,
    pub high: f64,
    pub width: f64,
    /// Posterior mass actually enclosed by `[low, high]`.
    pub coverage: f64,
}

/// Why a row produced no interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<EfficiencyError> for RowFailure {
    fn from(err: EfficiencyError) -> Self {
        RowFailure {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowOutcome {
    Computed(IntervalSummary),
    Failed(RowFailure),
}

/// One input row and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRow {
    pub line: usize,
    pub k: u64,
    pub n: u64,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

impl EfficiencyRow {
    pub fn summary(&self) -> Option<&IntervalSummary> {
        match &self.outcome {
            RowOutcome::Computed(summary) => Some(summary),
            RowOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&RowFailure> {
        match &self.outcome {
            RowOutcome::Computed(_) => None,
            RowOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Results for a whole data file, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub conflevel: f64,
    pub rows: Vec<EfficiencyRow>,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.failure().is_some()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.rows.iter().any(|row| row.failure().is_some())
    }
}

/// Compute every row of `rows` at `conflevel` with the given solver settings.
///
/// The confidence level and solver settings are checked once up front;
/// errors there fail the whole batch. Per-row errors are kept in the rows.
pub fn calculate_efficiencies(
    rows: &[DataRow],
    conflevel: f64,
    config: &SolverConfig,
) -> Result<BatchReport, EfficiencyError> {
    let level = ConfidenceLevel::new(conflevel)?;
    let calculator = EfficiencyCalculator::new(*config)?;

    tracing::info!(
        rows = rows.len(),
        conflevel,
        method = %config.method,
        root_finder = %config.root_finder,
        "batch started"
    );

    let rows: Vec<EfficiencyRow> = rows
        .par_iter()
        .map(|row| evaluate_row(&calculator, row, level))
        .collect();

    let report = BatchReport { conflevel, rows };
    tracing::info!(
        rows = report.rows.len(),
        failed = report.failed_count(),
        "batch finished"
    );
    Ok(report)
}

fn evaluate_row(
    calculator: &EfficiencyCalculator,
    row: &DataRow,
    level: ConfidenceLevel,
) -> EfficiencyRow {
    let outcome = match summarize(calculator, row, level) {
        Ok(summary) => RowOutcome::Computed(summary),
        Err(err) => {
            tracing::debug!(
                line = row.line,
                k = row.k,
                n = row.n,
                kind = %err.kind(),
                "row failed: {}",
                err
            );
            RowOutcome::Failed(err.into())
        }
    };
    EfficiencyRow {
        line: row.line,
        k: row.k,
        n: row.n,
        outcome,
    }
}

fn summarize(
    calculator: &EfficiencyCalculator,
    row: &DataRow,
    level: ConfidenceLevel,
) -> Result<IntervalSummary, EfficiencyError> {
    let observation = Observation::new(row.k, row.n)?;
    let EfficiencyResult { mode, low, high } =
        calculator.compute_observation(&observation, level)?;
    let coverage = calculator.probability_mass(row.k, row.n, low, high)?;
    Ok(IntervalSummary {
        mode,
        low,
        high,
        width: high - low,
        coverage,
    })
}
