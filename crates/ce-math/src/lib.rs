//! Binomial efficiency math: Beta posteriors, root finding and shortest
//! credible intervals.

pub mod config;
pub mod error;
pub mod math;

pub use math::{beta, effic, hdr, mass, posterior, root, stable};

pub use config::SolverConfig;
pub use error::{EfficiencyError, ErrorKind, Result};
pub use math::effic::{
    compute, ConfidenceLevel, EfficiencyCalculator, EfficiencyResult, Observation,
};
pub use math::hdr::{HdrMethod, Interval, IntervalSolver};
pub use math::mass::probability_mass;
pub use math::posterior::PosteriorModel;
pub use math::root::RootFinder;
