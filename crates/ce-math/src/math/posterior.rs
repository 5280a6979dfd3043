//! Flat-prior Beta posterior for a binomial efficiency.
//!
//! Observing `k` successes in `N` trials under a uniform prior gives
//! `ε | k, N ~ Beta(k + 1, N - k + 1)`. [`PosteriorModel`] wraps the shape
//! pair and exposes the density, CDF, quantile and mode with argument
//! checking on top of the kernels in [`super::beta`].

use serde::{Deserialize, Serialize};

use super::beta::{beta_cdf, beta_inv_cdf, beta_mean, beta_var, log_beta_pdf};
use crate::error::{EfficiencyError, Result};

/// Beta(a, b) posterior over the success probability.
///
/// Immutable; every method is a pure function of the shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorModel {
    a: f64,
    b: f64,
}

impl PosteriorModel {
    /// Create a posterior with explicit shapes. Both must be finite and `>= 1`.
    pub fn new(a: f64, b: f64) -> Result<Self> {
        if !a.is_finite() || !b.is_finite() || a < 1.0 || b < 1.0 {
            return Err(EfficiencyError::domain(format!(
                "beta shapes must be finite and >= 1, got a={a}, b={b}"
            )));
        }
        Ok(Self { a, b })
    }

    /// Posterior after `k` successes in `n` trials: Beta(k + 1, n - k + 1).
    ///
    /// `n = 0` is accepted here (it is the uniform prior); the efficiency
    /// calculator rejects it because the mode `k / n` is undefined.
    pub fn from_counts(k: u64, n: u64) -> Result<Self> {
        if k > n {
            return Err(EfficiencyError::domain(format!(
                "successes must not exceed trials, got k={k}, n={n}"
            )));
        }
        Ok(Self::from_valid_counts(k, n))
    }

    /// Caller guarantees `k <= n`.
    pub(crate) fn from_valid_counts(k: u64, n: u64) -> Self {
        debug_assert!(k <= n);
        Self {
            a: k as f64 + 1.0,
            b: (n - k) as f64 + 1.0,
        }
    }

    /// Shape parameters `(a, b)`.
    pub fn shape(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Observed successes `k = a - 1`.
    pub fn successes(&self) -> f64 {
        self.a - 1.0
    }

    /// Observed trials `N = a + b - 2`.
    pub fn trials(&self) -> f64 {
        self.a + self.b - 2.0
    }

    /// True when the density is non-increasing on `[0, 1]` (`k = 0`).
    pub fn is_decreasing(&self) -> bool {
        self.a == 1.0
    }

    /// True when the density is non-decreasing on `[0, 1]` (`k = N`).
    pub fn is_increasing(&self) -> bool {
        self.b == 1.0
    }

    pub fn log_density(&self, x: f64) -> Result<f64> {
        check_unit("point", x)?;
        Ok(log_beta_pdf(x, self.a, self.b))
    }

    /// Normalized density at `x`, evaluated in log space.
    pub fn density(&self, x: f64) -> Result<f64> {
        let log_pdf = self.log_density(x)?;
        if log_pdf == f64::NEG_INFINITY {
            return Ok(0.0);
        }
        Ok(log_pdf.exp())
    }

    /// Regularized incomplete beta function `I_x(a, b)`.
    pub fn cumulative(&self, x: f64) -> Result<f64> {
        check_unit("point", x)?;
        Ok(beta_cdf(x, self.a, self.b))
    }

    /// Inverse of [`cumulative`](Self::cumulative).
    pub fn quantile(&self, p: f64) -> Result<f64> {
        check_unit("probability", p)?;
        Ok(beta_inv_cdf(p, self.a, self.b))
    }

    /// Location of the density maximum.
    ///
    /// The monotone cases are decided before the closed form: with `a = 1`
    /// the density decreases and the mode is 0, with `b = 1` it increases
    /// and the mode is 1. `Beta(1, 1)` (no trials) is flat and reports 0.
    pub fn mode(&self) -> f64 {
        if self.is_decreasing() {
            return 0.0;
        }
        if self.is_increasing() {
            return 1.0;
        }
        (self.a - 1.0) / (self.a + self.b - 2.0)
    }

    pub fn mean(&self) -> f64 {
        beta_mean(self.a, self.b)
    }

    pub fn variance(&self) -> f64 {
        beta_var(self.a, self.b)
    }
}

fn check_unit(what: &str, value: f64) -> Result<()> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(EfficiencyError::domain(format!(
            "{what} must lie in [0, 1], got {value}"
        )));
    }
    Ok(())
}
