//! Efficiency point estimate and shortest credible interval.
//!
//! [`EfficiencyCalculator::compute`] is the public entry point: it validates
//! `(k, N, conflevel)`, builds the Beta(k + 1, N - k + 1) posterior, takes
//! `k / N` as the mode, and delegates the interval to [`IntervalSolver`].
//!
//! # Example
//! ```
//! use ce_math::effic::compute;
//!
//! let result = compute(10, 20, 0.95).unwrap();
//! assert_eq!(result.mode, 0.5);
//! assert!(result.low < 0.5 && 0.5 < result.high);
//! ```

use serde::{Deserialize, Serialize};

use super::hdr::IntervalSolver;
use super::mass::mass_between;
use super::posterior::PosteriorModel;
use crate::config::SolverConfig;
use crate::error::{EfficiencyError, Result};

/// Rounding slack allowed between the mode and an interval bound before the
/// bound is snapped onto the mode.
const MODE_SNAP_TOLERANCE: f64 = 1e-12;

/// `k` successes observed in `n` trials, with `n >= 1` and `k <= n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    k: u64,
    n: u64,
}

impl Observation {
    pub fn new(k: u64, n: u64) -> Result<Self> {
        if n < 1 {
            return Err(EfficiencyError::input("number of trials must be at least 1"));
        }
        if k > n {
            return Err(EfficiencyError::input(format!(
                "successes must not exceed trials, got k={k}, n={n}"
            )));
        }
        Ok(Self { k, n })
    }

    pub fn successes(&self) -> u64 {
        self.k
    }

    pub fn trials(&self) -> u64 {
        self.n
    }

    /// Empirical ratio `k / n`, which is also the posterior mode.
    pub fn ratio(&self) -> f64 {
        self.k as f64 / self.n as f64
    }

    pub fn posterior(&self) -> PosteriorModel {
        PosteriorModel::from_valid_counts(self.k, self.n)
    }
}

/// Mode and shortest credible interval for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    pub mode: f64,
    pub low: f64,
    pub high: f64,
}

impl EfficiencyResult {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Validated confidence level in the open interval `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value <= 0.0 || value >= 1.0 {
            return Err(EfficiencyError::input(format!(
                "conflevel must be in (0, 1), got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = EfficiencyError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes efficiencies with a fixed solver configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct EfficiencyCalculator {
    solver: IntervalSolver,
}

impl EfficiencyCalculator {
    pub fn new(config: SolverConfig) -> Result<Self> {
        Ok(Self {
            solver: IntervalSolver::new(config)?,
        })
    }

    pub fn solver(&self) -> &IntervalSolver {
        &self.solver
    }

    /// Mode and shortest interval for `k` successes in `n` trials.
    pub fn compute(&self, k: u64, n: u64, conflevel: f64) -> Result<EfficiencyResult> {
        let observation = Observation::new(k, n)?;
        let level = ConfidenceLevel::new(conflevel)?;
        self.compute_observation(&observation, level)
    }

    pub fn compute_observation(
        &self,
        observation: &Observation,
        conflevel: ConfidenceLevel,
    ) -> Result<EfficiencyResult> {
        let model = observation.posterior();
        let mode = observation.ratio();
        let interval = self.solver.shortest_interval(&model, conflevel.value())?;

        let low = snap_to_mode(interval.low, mode, |bound| bound > mode)?;
        let high = snap_to_mode(interval.high, mode, |bound| bound < mode)?;
        tracing::trace!(
            k = observation.successes(),
            n = observation.trials(),
            conflevel = conflevel.value(),
            mode,
            low,
            high,
            "efficiency computed"
        );
        Ok(EfficiencyResult { mode, low, high })
    }

    /// Posterior mass between two bounds for an observation.
    pub fn probability_mass(&self, k: u64, n: u64, low: f64, high: f64) -> Result<f64> {
        let observation = Observation::new(k, n)?;
        mass_between(&observation.posterior(), low, high)
    }
}

/// Keep `low <= mode <= high` when a bound sits a rounding step on the
/// wrong side of the mode.
fn snap_to_mode(bound: f64, mode: f64, on_wrong_side: impl Fn(f64) -> bool) -> Result<f64> {
    if !on_wrong_side(bound) {
        return Ok(bound);
    }
    if (bound - mode).abs() <= MODE_SNAP_TOLERANCE {
        return Ok(mode);
    }
    Err(EfficiencyError::domain(format!(
        "interval bound {bound} excludes the mode {mode}"
    )))
}

/// [`EfficiencyCalculator::compute`] with the default solver settings.
pub fn compute(k: u64, n: u64, conflevel: f64) -> Result<EfficiencyResult> {
    EfficiencyCalculator::default().compute(k, n, conflevel)
}
