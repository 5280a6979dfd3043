//! Derivative-free bracketing root finders.
//!
//! Both finders require a sign change over `[lo, hi]` and stop when the
//! bracket is narrower than the requested absolute tolerance, when the
//! objective hits exactly zero, or when the bracket can no longer be split
//! in floating point. Running out of iterations is an error, never a
//! silently returned approximation.

use serde::{Deserialize, Serialize};

use crate::error::{EfficiencyError, Result};

/// Root-finding algorithm used by the interval solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootFinder {
    /// Plain interval halving (default).
    #[default]
    Bisection,
    /// Brent-Dekker: inverse quadratic interpolation with bisection fallback.
    Brent,
}

impl std::str::FromStr for RootFinder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bisection" | "bisect" => Ok(RootFinder::Bisection),
            "brent" | "brentq" => Ok(RootFinder::Brent),
            _ => Err(format!("unknown root finder: {}", s)),
        }
    }
}

impl std::fmt::Display for RootFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootFinder::Bisection => write!(f, "bisection"),
            RootFinder::Brent => write!(f, "brent"),
        }
    }
}

/// A located root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub x: f64,
    /// Objective value at `x`.
    pub fx: f64,
    pub iterations: usize,
}

impl RootFinder {
    /// Find `x` in `[lo, hi]` with `f(x) = 0`.
    ///
    /// `f(lo)` and `f(hi)` must have opposite signs (or one of them be zero);
    /// otherwise the root cannot be bracketed and a convergence error is
    /// returned. Errors from `f` propagate unchanged.
    pub fn solve<F>(
        &self,
        f: F,
        lo: f64,
        hi: f64,
        x_tolerance: f64,
        max_iterations: usize,
    ) -> Result<RootEstimate>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        match self {
            RootFinder::Bisection => bisect(f, lo, hi, x_tolerance, max_iterations),
            RootFinder::Brent => brent(f, lo, hi, x_tolerance, max_iterations),
        }
    }
}

fn evaluate<F>(f: &mut F, x: f64) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let fx = f(x)?;
    if fx.is_nan() {
        return Err(EfficiencyError::domain(format!(
            "objective evaluated to NaN at {x}"
        )));
    }
    Ok(fx)
}

enum Bracket {
    /// One endpoint is already an exact root.
    Root(RootEstimate),
    /// Objective values at `lo` and `hi`, of opposite sign.
    Span(f64, f64),
}

fn check_bracket<F>(f: &mut F, lo: f64, hi: f64) -> Result<Bracket>
where
    F: FnMut(f64) -> Result<f64>,
{
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return Err(EfficiencyError::domain(format!(
            "invalid bracket [{lo}, {hi}]"
        )));
    }
    let f_lo = evaluate(f, lo)?;
    if f_lo == 0.0 {
        return Ok(Bracket::Root(RootEstimate {
            x: lo,
            fx: 0.0,
            iterations: 0,
        }));
    }
    let f_hi = evaluate(f, hi)?;
    if f_hi == 0.0 {
        return Ok(Bracket::Root(RootEstimate {
            x: hi,
            fx: 0.0,
            iterations: 0,
        }));
    }
    if (f_lo < 0.0) == (f_hi < 0.0) {
        tracing::debug!(lo, hi, f_lo, f_hi, "root not bracketed");
        return Err(EfficiencyError::Convergence {
            iterations: 0,
            width: hi - lo,
        });
    }
    Ok(Bracket::Span(f_lo, f_hi))
}

fn bisect<F>(
    mut f: F,
    mut lo: f64,
    mut hi: f64,
    x_tolerance: f64,
    max_iterations: usize,
) -> Result<RootEstimate>
where
    F: FnMut(f64) -> Result<f64>,
{
    let mut f_lo = match check_bracket(&mut f, lo, hi)? {
        Bracket::Root(root) => return Ok(root),
        Bracket::Span(f_lo, _) => f_lo,
    };

    for iteration in 1..=max_iterations {
        let mid = lo + 0.5 * (hi - lo);
        let f_mid = evaluate(&mut f, mid)?;
        // The last clause stops once lo and hi are adjacent doubles.
        if f_mid == 0.0 || 0.5 * (hi - lo) <= x_tolerance || mid <= lo || mid >= hi {
            return Ok(RootEstimate {
                x: mid,
                fx: f_mid,
                iterations: iteration,
            });
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(EfficiencyError::Convergence {
        iterations: max_iterations,
        width: hi - lo,
    })
}

fn brent<F>(
    mut f: F,
    lo: f64,
    hi: f64,
    x_tolerance: f64,
    max_iterations: usize,
) -> Result<RootEstimate>
where
    F: FnMut(f64) -> Result<f64>,
{
    let (mut fa, mut fb) = match check_bracket(&mut f, lo, hi)? {
        Bracket::Root(root) => return Ok(root),
        Bracket::Span(f_lo, f_hi) => (f_lo, f_hi),
    };
    let mut a = lo;
    let mut b = hi;
    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iterations {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * x_tolerance;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(RootEstimate {
                x: b,
                fx: fb,
                iterations: iteration,
            });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Attempt inverse quadratic interpolation (secant when a == c).
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = evaluate(&mut f, b)?;
    }

    Err(EfficiencyError::Convergence {
        iterations: max_iterations,
        width: (c - b).abs(),
    })
}
