//! Shortest credible intervals (highest density regions) for the posterior.
//!
//! For a unimodal density the shortest interval holding a given mass has
//! equal density at both ends. When the mode sits on a domain edge
//! (`k = 0` or `k = N`) the density is monotone and the shortest interval
//! is anchored at that edge instead; those cases are dispatched before any
//! search starts.
//!
//! Two searches locate the equal-density pair for interior modes:
//!
//! - [`HdrMethod::TailProbability`] brackets the lower tail mass `p` in
//!   `[F(mode) - c, F(mode)]` (cut to `[0, 1 - c]`) and solves
//!   `f(Q(p)) = f(Q(p + c))`.
//! - [`HdrMethod::DensityLevel`] brackets the density level `h` in
//!   `[0, f(mode)]`, takes the two crossings of `f = h` around the mode, and
//!   solves for the level whose crossings enclose mass `c`.
//!
//! Both agree to well below the coverage tolerance; the first does one root
//! search, the second nests two inner searches inside the outer one.

use serde::{Deserialize, Serialize};

use super::mass::mass_between;
use super::posterior::PosteriorModel;
use crate::config::SolverConfig;
use crate::error::{EfficiencyError, Result};

/// Search strategy for interior-mode posteriors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HdrMethod {
    /// Root search over the lower tail probability (default).
    #[default]
    TailProbability,
    /// Root search over the density level.
    DensityLevel,
}

impl std::str::FromStr for HdrMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "tail-probability" | "tail" => Ok(HdrMethod::TailProbability),
            "density-level" | "level" => Ok(HdrMethod::DensityLevel),
            _ => Err(format!("unknown interval method: {}", s)),
        }
    }
}

impl std::fmt::Display for HdrMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HdrMethod::TailProbability => write!(f, "tail-probability"),
            HdrMethod::DensityLevel => write!(f, "density-level"),
        }
    }
}

/// Closed sub-interval `[low, high]` of `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, x: f64) -> bool {
        self.low <= x && x <= self.high
    }
}

/// Which end of an interval [`search_bound`] solves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundDirection {
    /// Anchor is the lower end; find the upper end.
    Upper,
    /// Anchor is the upper end; find the lower end.
    Lower,
}

/// Finds shortest intervals of a requested posterior mass.
///
/// Holds only its settings, so one solver can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntervalSolver {
    config: SolverConfig,
}

impl IntervalSolver {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Shortest interval of `model` with mass `conflevel`.
    ///
    /// `conflevel` must already be known to lie in `(0, 1)`; the efficiency
    /// calculator checks it.
    pub fn shortest_interval(&self, model: &PosteriorModel, conflevel: f64) -> Result<Interval> {
        debug_assert!(conflevel > 0.0 && conflevel < 1.0);

        if model.is_decreasing() {
            let high = model.quantile(conflevel)?;
            tracing::trace!(high, "decreasing posterior, interval anchored at 0");
            return finalize(0.0, high);
        }
        if model.is_increasing() {
            let low = model.quantile(1.0 - conflevel)?;
            tracing::trace!(low, "increasing posterior, interval anchored at 1");
            return finalize(low, 1.0);
        }

        let (low, high) = match self.config.method {
            HdrMethod::TailProbability => self.tail_probability_search(model, conflevel)?,
            HdrMethod::DensityLevel => self.density_level_search(model, conflevel)?,
        };
        finalize(low, high)
    }

    fn tail_probability_search(&self, model: &PosteriorModel, conflevel: f64) -> Result<(f64, f64)> {
        let upper_tail = |p_low: f64| (p_low + conflevel).min(1.0);
        let objective = |p_low: f64| -> Result<f64> {
            let low = model.quantile(p_low)?;
            let high = model.quantile(upper_tail(p_low))?;
            Ok(model.density(low)? - model.density(high)?)
        };

        // At `lo` the upper end sits on the mode and at `hi` the lower end
        // does, so every p_low in between gives low <= mode <= high.
        let (lo, hi) = mode_bracket(model, conflevel)?;

        // For tiny c the objective near the root is smaller than the density
        // rounding noise and may take the wrong sign at an end. That end is
        // then as good an answer as any interior point.
        let g_lo = objective(lo)?;
        let g_hi = objective(hi)?;
        let p_low = if g_lo >= 0.0 {
            tracing::debug!(
                p_low = lo,
                density_gap = g_lo,
                "tail-probability search pinned at lower end"
            );
            lo
        } else if g_hi <= 0.0 {
            tracing::debug!(
                p_low = hi,
                density_gap = g_hi,
                "tail-probability search pinned at upper end"
            );
            hi
        } else {
            let root = self.config.root_finder.solve(
                &objective,
                lo,
                hi,
                self.config.x_tolerance,
                self.config.max_iterations,
            )?;
            tracing::debug!(
                p_low = root.x,
                density_gap = root.fx,
                iterations = root.iterations,
                finder = %self.config.root_finder,
                "tail-probability search converged"
            );
            root.x
        };

        Ok((model.quantile(p_low)?, model.quantile(upper_tail(p_low))?))
    }

    fn density_level_search(&self, model: &PosteriorModel, conflevel: f64) -> Result<(f64, f64)> {
        let mode = model.mode();
        let peak = model.density(mode)?;

        let root = self.config.root_finder.solve(
            |level| {
                let (low, high) = self.level_crossings(model, mode, level)?;
                Ok(mass_between(model, low, high)? - conflevel)
            },
            0.0,
            peak,
            self.config.x_tolerance,
            self.config.max_iterations,
        )?;
        tracing::debug!(
            level = root.x,
            mass_gap = root.fx,
            iterations = root.iterations,
            finder = %self.config.root_finder,
            "density-level search converged"
        );

        self.level_crossings(model, mode, root.x)
    }

    /// Points on either side of the mode where the density equals `level`.
    fn level_crossings(&self, model: &PosteriorModel, mode: f64, level: f64) -> Result<(f64, f64)> {
        let gap = |x: f64| -> Result<f64> { Ok(model.density(x)? - level) };
        let finder = self.config.root_finder;
        let low = finder.solve(gap, 0.0, mode, self.config.x_tolerance, self.config.max_iterations)?;
        let high = finder.solve(gap, mode, 1.0, self.config.x_tolerance, self.config.max_iterations)?;
        Ok((low.x, high.x))
    }
}

/// Range of lower tail mass `p` for which `[Q(p), Q(p + c)]` contains the mode.
fn mode_bracket(model: &PosteriorModel, conflevel: f64) -> Result<(f64, f64)> {
    let at_mode = model.cumulative(model.mode())?;
    let lo = (at_mode - conflevel).max(0.0);
    let hi = at_mode.min(1.0 - conflevel);
    Ok((lo, hi))
}

/// Clamp into `[0, 1]` and check ordering.
///
/// Quantiles can land a rounding step outside the domain in the extreme
/// tails; anything beyond that is reported rather than repaired.
fn finalize(low: f64, high: f64) -> Result<Interval> {
    if low.is_nan() || high.is_nan() {
        return Err(EfficiencyError::domain("interval bound is NaN"));
    }
    let low = low.clamp(0.0, 1.0);
    let high = high.clamp(0.0, 1.0);
    if low > high {
        return Err(EfficiencyError::domain(format!(
            "interval bounds out of order: [{low}, {high}]"
        )));
    }
    Ok(Interval { low, high })
}

/// Find the other end of an interval anchored at `anchor` holding `content`.
///
/// With [`BoundDirection::Upper`] the result `high` satisfies
/// `mass(anchor, high) = content`; with [`BoundDirection::Lower`] the result
/// `low` satisfies `mass(low, anchor) = content`. If the mass between the
/// anchor and the domain edge is exactly `content` the edge is returned; if it
/// is smaller the request is a domain error.
pub fn search_bound(
    model: &PosteriorModel,
    anchor: f64,
    content: f64,
    direction: BoundDirection,
) -> Result<f64> {
    if content.is_nan() || !(0.0..=1.0).contains(&content) {
        return Err(EfficiencyError::domain(format!(
            "content must lie in [0, 1], got {content}"
        )));
    }
    let anchor_cdf = model.cumulative(anchor)?;
    match direction {
        BoundDirection::Upper => {
            let available = 1.0 - anchor_cdf;
            if available < content {
                return Err(EfficiencyError::domain(format!(
                    "cannot find upper bound: insufficient mass from {anchor} to 1 \
                     (available {available}, required {content})"
                )));
            }
            if available == content {
                return Ok(1.0);
            }
            let high = model.quantile((anchor_cdf + content).min(1.0))?;
            Ok(high.max(anchor))
        }
        BoundDirection::Lower => {
            if anchor_cdf < content {
                return Err(EfficiencyError::domain(format!(
                    "cannot find lower bound: insufficient mass from 0 to {anchor} \
                     (available {anchor_cdf}, required {content})"
                )));
            }
            if anchor_cdf == content {
                return Ok(0.0);
            }
            let low = model.quantile((anchor_cdf - content).max(0.0))?;
            Ok(low.min(anchor))
        }
    }
}

/// Width of the interval starting at `low` that holds `content`.
pub fn interval_width(model: &PosteriorModel, low: f64, content: f64) -> Result<f64> {
    Ok(search_bound(model, low, content, BoundDirection::Upper)? - low)
}
