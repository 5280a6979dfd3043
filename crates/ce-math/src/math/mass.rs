//! Posterior probability mass over a sub-interval of `[0, 1]`.

use super::effic::Observation;
use super::posterior::PosteriorModel;
use crate::error::{EfficiencyError, Result};

/// Mass of `model` between `low` and `high`: `F(high) - F(low)`.
///
/// Both bounds must lie in `[0, 1]` with `low <= high`.
pub fn mass_between(model: &PosteriorModel, low: f64, high: f64) -> Result<f64> {
    if low.is_nan() || high.is_nan() || low < 0.0 || high > 1.0 {
        return Err(EfficiencyError::domain(format!(
            "bounds must lie in [0, 1], got [{low}, {high}]"
        )));
    }
    if low > high {
        return Err(EfficiencyError::domain(format!(
            "lower bound {low} exceeds upper bound {high}"
        )));
    }
    if low == high {
        return Ok(0.0);
    }
    let mass = model.cumulative(high)? - model.cumulative(low)?;
    Ok(mass.max(0.0))
}

/// Mass of the Beta(k + 1, n - k + 1) posterior between `low` and `high`.
pub fn probability_mass(k: u64, n: u64, low: f64, high: f64) -> Result<f64> {
    let observation = Observation::new(k, n)?;
    mass_between(&observation.posterior(), low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn full_interval_is_one() {
        for &(k, n) in &[(0, 1), (1, 2), (100, 100), (37, 250)] {
            assert!(approx_eq(probability_mass(k, n, 0.0, 1.0).unwrap(), 1.0, 1e-12));
        }
    }

    #[test]
    fn degenerate_interval_is_zero() {
        assert_eq!(probability_mass(1, 2, 0.4, 0.4).unwrap(), 0.0);
        assert_eq!(probability_mass(0, 1, 0.0, 0.0).unwrap(), 0.0);
        assert_eq!(probability_mass(10, 20, 1.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn boundary_posteriors_match_closed_form() {
        // Beta(1, 6): 1 - 0.5^6
        assert!(approx_eq(probability_mass(0, 5, 0.0, 0.5).unwrap(), 0.984375, 1e-10));
        // Beta(6, 1): 1 - 0.5^6 above one half
        assert!(approx_eq(probability_mass(5, 5, 0.5, 1.0).unwrap(), 0.984375, 1e-10));
    }

    #[test]
    fn symmetric_posterior_splits_evenly() {
        assert!(approx_eq(probability_mass(1, 2, 0.0, 0.5).unwrap(), 0.5, 1e-12));
        assert!(approx_eq(probability_mass(1, 2, 0.5, 1.0).unwrap(), 0.5, 1e-12));
        // Beta(2, 2) CDF is 3x^2 - 2x^3
        let cdf = |x: f64| 3.0 * x * x - 2.0 * x * x * x;
        assert!(approx_eq(
            probability_mass(1, 2, 0.4, 0.6).unwrap(),
            cdf(0.6) - cdf(0.4),
            1e-12
        ));
    }

    #[test]
    fn inverted_bounds_are_a_domain_error() {
        let err = probability_mass(3, 10, 0.6, 0.4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn out_of_range_bounds_are_a_domain_error() {
        assert_eq!(
            probability_mass(3, 10, -0.1, 0.4).unwrap_err().kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            probability_mass(3, 10, 0.1, 1.5).unwrap_err().kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            probability_mass(3, 10, f64::NAN, 0.5).unwrap_err().kind(),
            ErrorKind::Domain
        );
    }

    #[test]
    fn invalid_counts_are_rejected() {
        assert_eq!(
            probability_mass(5, 3, 0.0, 1.0).unwrap_err().kind(),
            ErrorKind::InputValidation
        );
        assert_eq!(
            probability_mass(0, 0, 0.0, 1.0).unwrap_err().kind(),
            ErrorKind::InputValidation
        );
    }
}
