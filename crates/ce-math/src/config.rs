//! Interval solver settings.

use serde::{Deserialize, Serialize};

use crate::error::{EfficiencyError, Result};
use crate::math::hdr::HdrMethod;
use crate::math::root::RootFinder;

/// Default absolute tolerance on the search variable.
pub const DEFAULT_X_TOLERANCE: f64 = 1e-15;

/// Default iteration cap per root search. Halving a unit bracket 100 times
/// is far below any representable tolerance, so hitting the cap means the
/// objective is misbehaving.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Settings for [`IntervalSolver`](crate::math::hdr::IntervalSolver).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub method: HdrMethod,
    pub root_finder: RootFinder,
    /// Absolute tolerance on the bracketed variable.
    pub x_tolerance: f64,
    /// Iteration cap for each individual root search.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: HdrMethod::default(),
            root_finder: RootFinder::default(),
            x_tolerance: DEFAULT_X_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn with_method(mut self, method: HdrMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_root_finder(mut self, root_finder: RootFinder) -> Self {
        self.root_finder = root_finder;
        self
    }

    pub fn with_x_tolerance(mut self, x_tolerance: f64) -> Self {
        self.x_tolerance = x_tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Reject tolerances and caps the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.x_tolerance.is_finite() || self.x_tolerance <= 0.0 {
            return Err(EfficiencyError::input(format!(
                "x_tolerance must be finite and positive, got {}",
                self.x_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(EfficiencyError::input("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.method, HdrMethod::TailProbability);
        assert_eq!(config.root_finder, RootFinder::Bisection);
        assert_eq!(config.x_tolerance, 1e-15);
        assert_eq!(config.max_iterations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder() {
        let config = SolverConfig::default()
            .with_method(HdrMethod::DensityLevel)
            .with_root_finder(RootFinder::Brent)
            .with_x_tolerance(1e-12)
            .with_max_iterations(50);
        assert_eq!(config.method, HdrMethod::DensityLevel);
        assert_eq!(config.root_finder, RootFinder::Brent);
        assert_eq!(config.x_tolerance, 1e-12);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn validate_rejects_bad_tolerance_and_cap() {
        assert!(SolverConfig::default().with_x_tolerance(0.0).validate().is_err());
        assert!(SolverConfig::default()
            .with_x_tolerance(f64::NAN)
            .validate()
            .is_err());
        assert!(SolverConfig::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"root_finder": "brent", "max_iterations": 60}"#).unwrap();
        assert_eq!(config.root_finder, RootFinder::Brent);
        assert_eq!(config.max_iterations, 60);
        assert_eq!(config.method, HdrMethod::TailProbability);
        assert_eq!(config.x_tolerance, DEFAULT_X_TOLERANCE);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: std::result::Result<SolverConfig, _> =
            serde_json::from_str(r#"{"tolerance": 1e-9}"#);
        assert!(result.is_err());
    }
}
