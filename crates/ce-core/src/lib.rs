//! calceff core library
//!
//! Everything around the interval math in `ce-math`:
//! - Exit codes for CLI operations
//! - Configuration loading and resolution
//! - Data file parsing
//! - Parallel batch evaluation
//! - Table, JSON and TSV/CSV output
//! - Structured logging setup
//!
//! The binary entry point is in `main.rs`.

pub mod batch;
pub mod config;
pub mod data;
pub mod exit_codes;
pub mod logging;
pub mod output;
