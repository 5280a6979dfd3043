//! Beta distribution functions backing the efficiency posterior.
//!
//! Provides PDF, CDF, and inverse CDF, plus mean/variance helpers.
//! The CDF uses the regularized incomplete beta function with
//! a continued-fraction approximation (Numerical Recipes, modified Lentz).
//!
//! These are the raw NaN-propagating kernels; argument checking lives in
//! [`PosteriorModel`](super::posterior::PosteriorModel).

use super::stable::log_beta;

// The continued fraction needs O(sqrt(max(a, b))) terms, so the cap is sized
// for shapes around 1e7.
const BETACF_MAX_ITERS: usize = 10_000;
const BETACF_EPS: f64 = 1.0e-15;
const BETACF_FPMIN: f64 = 1.0e-300;

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Log of the Beta PDF at x.
pub fn log_beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        if alpha < 1.0 {
            return f64::INFINITY;
        }
        if alpha > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(1.0, beta);
    }
    if x == 1.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        }
        if beta > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(alpha, 1.0);
    }
    let log_x = x.ln();
    let log_one_minus = (-x).ln_1p();
    (alpha - 1.0) * log_x + (beta - 1.0) * log_one_minus - log_beta(alpha, beta)
}

/// Beta PDF at x.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = log_beta_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::INFINITY {
        return f64::INFINITY;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

/// Regularized incomplete beta function I_x(a,b).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let log_bt = alpha * x.ln() + beta * (-x).ln_1p() - log_beta(alpha, beta);
    let bt = log_bt.exp();
    let threshold = (alpha + 1.0) / (alpha + beta + 2.0);
    let cdf = if x < threshold {
        bt * betacf(alpha, beta, x) / alpha
    } else {
        1.0 - bt * betacf(beta, alpha, 1.0 - x) / beta
    };
    cdf.clamp(0.0, 1.0)
}

/// Inverse CDF (quantile) for Beta(alpha, beta).
///
/// Bisects on `[0, 1]` until the bracket collapses to neighbouring doubles,
/// which keeps `beta_cdf(beta_inv_cdf(p)) == p` to the accuracy of the CDF
/// itself even deep in the tails.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let mut low = 0.0_f64;
    let mut high = 1.0_f64;
    for _ in 0..1100 {
        let mid = 0.5 * (low + high);
        if mid <= low || mid >= high {
            break;
        }
        let cdf = beta_cdf(mid, alpha, beta);
        if cdf.is_nan() {
            return f64::NAN;
        }
        if cdf == p {
            return mid;
        }
        if cdf < p {
            low = mid;
        } else {
            high = mid;
        }
    }
    0.5 * (low + high)
}

fn betacf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;
        let aa = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}
