//! Fuzz target for config.toml parsing.
//!
//! Tests that TOML config parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use ce_core::config::ConfigFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Should never panic, only return an error
    if let Ok(config) = toml::from_str::<ConfigFile>(text) {
        let _ = config.solver.validate();
    }
});
