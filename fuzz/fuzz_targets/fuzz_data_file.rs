//! Fuzz target for `k n` data file parsing.
//!
//! Arbitrary text must either parse or return a `DataError`, never panic,
//! and every parsed row must point at a real line.

#![no_main]

use std::path::Path;

use ce_core::data::parse_observations_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(parsed) = parse_observations_str(text, Path::new("fuzz.txt")) {
        let line_count = text.lines().count();
        for row in &parsed.rows {
            assert!(row.line >= 1 && row.line <= line_count);
        }
    }
});
