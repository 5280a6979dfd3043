//! Rendering of batch results.
//!
//! - console table (stdout, default) with 6-digit scientific values
//! - JSON array of rows (stdout, `--format json`)
//! - TSV/CSV result files (`--out`, `--use-csv`) at full double precision
//!
//! Scientific values always carry a sign and at least two exponent digits
//! (`5.000000e-01`), unlike Rust's `{:e}` which prints `5e-1`.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::{BatchReport, EfficiencyRow};

/// Fractional digits in the console table.
pub const TABLE_PRECISION: usize = 6;

/// Fractional digits in result files; enough to round-trip an f64.
pub const FILE_PRECISION: usize = 17;

/// Title printed above the console table.
pub const TABLE_TITLE: &str = "Efficiency Results";

const COLUMNS: [&str; 5] = ["k", "n", "mode", "low", "high"];

/// Supported stdout formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console table (default)
    #[default]
    Table,

    /// JSON array of rows, failures included
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Field separator for result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn from_use_csv(use_csv: bool) -> Self {
        if use_csv {
            Delimiter::Comma
        } else {
            Delimiter::Tab
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Comma => ",",
        }
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scientific notation with `precision` fractional digits and a signed,
/// at-least-two-digit exponent.
pub fn format_sci(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        // inf / NaN have no exponent
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Console table of the successful rows, preceded by the title line.
pub fn render_table(report: &BatchReport) -> String {
    let cells: Vec<[String; 5]> = report
        .rows
        .iter()
        .filter_map(|row| {
            row.summary().map(|s| {
                [
                    row.k.to_string(),
                    row.n.to_string(),
                    format_sci(s.mode, TABLE_PRECISION),
                    format_sci(s.low, TABLE_PRECISION),
                    format_sci(s.high, TABLE_PRECISION),
                ]
            })
        })
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{TABLE_TITLE}");
    push_table_line(&mut out, &COLUMNS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &cells {
        push_table_line(&mut out, row, &widths);
    }
    out
}

fn push_table_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  "));
}

/// One stderr line per failed row.
pub fn render_failures(report: &BatchReport) -> String {
    let mut out = String::new();
    for row in &report.rows {
        if let Some(failure) = row.failure() {
            let _ = writeln!(
                out,
                "Error on line {} (k={}, n={}): {}",
                row.line, row.k, row.n, failure.error
            );
        }
    }
    out
}

/// Pretty JSON array of all rows.
pub fn render_json(report: &BatchReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&report.rows)?)
}

/// Header-led delimited rows at full precision. Failed rows are omitted.
pub fn write_delimited<W: Write>(
    writer: &mut W,
    rows: &[EfficiencyRow],
    delimiter: Delimiter,
) -> io::Result<()> {
    let sep = delimiter.as_str();
    writeln!(writer, "{}", COLUMNS.join(sep))?;
    for row in rows {
        let Some(s) = row.summary() else {
            continue;
        };
        writeln!(
            writer,
            "{k}{sep}{n}{sep}{mode}{sep}{low}{sep}{high}",
            k = row.k,
            n = row.n,
            mode = format_sci(s.mode, FILE_PRECISION),
            low = format_sci(s.low, FILE_PRECISION),
            high = format_sci(s.high, FILE_PRECISION),
        )?;
    }
    Ok(())
}

/// Write the result file at `path`, replacing any existing file.
pub fn write_results_file(
    path: &Path,
    report: &BatchReport,
    delimiter: Delimiter,
) -> Result<(), OutputError> {
    let io_error = |source: io::Error| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(io_error)?;
    let mut writer = io::BufWriter::new(file);
    write_delimited(&mut writer, &report.rows, delimiter).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    tracing::info!(path = %path.display(), "results written");
    Ok(())
}
