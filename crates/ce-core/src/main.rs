//! calceff - shortest Bayesian confidence intervals for binomial efficiencies
//!
//! Reads a file of `k n` pairs (successes, trials), computes the most
//! probable efficiency and the shortest interval holding the requested
//! posterior mass for each pair, and prints a table, JSON, or writes a
//! TSV/CSV file.

use std::path::PathBuf;

use ce_core::batch::calculate_efficiencies;
use ce_core::config::{load_config, ConfigOptions};
use ce_core::data::parse_observations;
use ce_core::exit_codes::ExitCode;
use ce_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ce_core::output::{
    render_failures, render_json, render_table, write_results_file, Delimiter, OutputFormat,
};
use ce_math::{ConfidenceLevel, HdrMethod, RootFinder};
use clap::error::ErrorKind as ClapErrorKind;
use clap::{ArgAction, Parser};

/// Calculation of exact binomial efficiency confidence intervals
#[derive(Parser, Debug)]
#[command(name = "calceff")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Data file with one `k n` pair per line
    file: PathBuf,

    /// Confidence level, strictly between 0 and 1
    #[arg(value_parser = parse_conflevel, allow_negative_numbers = true)]
    conflevel: f64,

    /// Write results to this file (TSV unless --use-csv)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Use CSV instead of TSV for the output file
    #[arg(short = 'c', long, requires = "out")]
    use_csv: bool,

    /// Format for results printed on stdout
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Interval search: tail-probability or density-level
    #[arg(long)]
    method: Option<HdrMethod>,

    /// Root finder: bisection or brent
    #[arg(long)]
    root_finder: Option<RootFinder>,

    /// Config file with a [solver] table
    #[arg(long, env = "CALCEFF_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print help
    #[arg(short = 'h', long, short_alias = '?', action = ArgAction::Help)]
    help: Option<bool>,
}

fn parse_conflevel(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    ConfidenceLevel::new(value)
        .map(f64::from)
        .map_err(|e| e.to_string())
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => std::process::exit(report_parse_error(&err).as_i32()),
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.verbose, cli.quiet),
        cli.log_format,
    );
    init_logging(&log_config);

    let exit_code = run(&cli);
    tracing::debug!(exit_code = %exit_code, "done");
    std::process::exit(exit_code.as_i32());
}

/// Help and version requests are successes; anything else is a usage error.
fn report_parse_error(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ClapErrorKind::DisplayHelp
        | ClapErrorKind::DisplayVersion
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::Clean,
        _ => ExitCode::ArgsError,
    }
}

fn run(cli: &Cli) -> ExitCode {
    let options = ConfigOptions {
        config_path: cli.config.clone(),
        method: cli.method,
        root_finder: cli.root_finder,
        ..ConfigOptions::default()
    };
    let resolved = match load_config(&options) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("calceff: {e}");
            return ExitCode::ConfigError;
        }
    };

    let data = match parse_observations(&cli.file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("calceff: {e}");
            return ExitCode::DataError;
        }
    };

    let report = match calculate_efficiencies(&data.rows, cli.conflevel, &resolved.solver) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("calceff: {e}");
            return ExitCode::for_error_kind(e.kind());
        }
    };

    if let Some(path) = &cli.out {
        if let Err(e) = write_results_file(path, &report, Delimiter::from_use_csv(cli.use_csv)) {
            eprintln!("calceff: {e}");
            return ExitCode::IoError;
        }
    }

    match cli.format {
        // A result file takes the place of the console table.
        OutputFormat::Table if cli.out.is_some() => {}
        OutputFormat::Table => print!("{}", render_table(&report)),
        OutputFormat::Json => match render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("calceff: {e}");
                return ExitCode::InternalError;
            }
        },
    }

    eprint!("{}", render_failures(&report));
    if report.has_failures() {
        ExitCode::PartialFail
    } else {
        ExitCode::Clean
    }
}
