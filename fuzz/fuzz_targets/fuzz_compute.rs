//! Fuzz target for the efficiency interval solver.
//!
//! Any `(k, n, conflevel)` must either be rejected with an error or give
//! `0 <= low <= mode <= high <= 1`. Valid input up to a million trials must
//! not be rejected.

#![no_main]

use arbitrary::Arbitrary;
use ce_math::compute;
use libfuzzer_sys::fuzz_target;

const CHECKED_TRIALS: u32 = 1_000_000;

#[derive(Debug, Arbitrary)]
struct Input {
    k: u32,
    n: u32,
    conflevel: f64,
}

fuzz_target!(|input: Input| {
    let valid = input.n >= 1
        && input.k <= input.n
        && input.conflevel > 0.0
        && input.conflevel < 1.0;
    let result = compute(u64::from(input.k), u64::from(input.n), input.conflevel);
    if valid && input.n <= CHECKED_TRIALS {
        assert!(result.is_ok(), "{input:?}: {result:?}");
    }
    let Ok(result) = result else {
        return;
    };
    assert!(0.0 <= result.low);
    assert!(result.low <= result.mode);
    assert!(result.mode <= result.high);
    assert!(result.high <= 1.0);
});
