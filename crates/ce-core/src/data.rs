//! Reader for two-column `k n` data files.
//!
//! One observation per line: successes and trials as whitespace-separated
//! non-negative integers. Blank lines and lines starting with `#` are
//! ignored. A line with the wrong number of fields is skipped with a
//! warning; a line with two fields that are not integers aborts the read.
//!
//! Rows are not checked for `k <= n` here. That is a per-row computation
//! error reported alongside the other results.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Errors that stop a data file from being read.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid integer on line {line} of {path}: {content}")]
    Parse {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

/// A `(k, n)` pair as read, with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataRow {
    pub line: usize,
    pub k: u64,
    pub n: u64,
}

/// A line ignored because it did not hold exactly two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub content: String,
}

/// Everything read from one data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedData {
    pub rows: Vec<DataRow>,
    pub skipped: Vec<SkippedLine>,
}

/// Read and parse a data file.
pub fn parse_observations(path: &Path) -> Result<ParsedData, DataError> {
    let content = std::fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_observations_str(&content, path)
}

/// Parse data file content; `path` is only used in error messages.
pub fn parse_observations_str(content: &str, path: &Path) -> Result<ParsedData, DataError> {
    let mut parsed = ParsedData::default();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [k, n] = fields.as_slice() else {
            tracing::warn!("Invalid line format on line {}: {}", line, trimmed);
            parsed.skipped.push(SkippedLine {
                line,
                content: trimmed.to_string(),
            });
            continue;
        };

        let parse_error = || DataError::Parse {
            path: path.to_path_buf(),
            line,
            content: trimmed.to_string(),
        };
        let k = k.parse::<u64>().map_err(|_| parse_error())?;
        let n = n.parse::<u64>().map_err(|_| parse_error())?;
        parsed.rows.push(DataRow { line, k, n });
    }

    tracing::debug!(
        path = %path.display(),
        rows = parsed.rows.len(),
        skipped = parsed.skipped.len(),
        "data file parsed"
    );
    Ok(parsed)
}
