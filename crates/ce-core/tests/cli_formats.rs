//! CLI output format tests for calceff.
//!
//! These tests run the binary end to end and check that the table, JSON,
//! TSV and CSV outputs are well formed and carry the right numbers.

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Get a Command for the calceff binary, isolated from the user's config.
fn calceff(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("calceff");
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env_remove("CALCEFF_CONFIG")
        .env_remove("CALCEFF_LOG")
        .env_remove("CALCEFF_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const SAMPLE: &str = "# k n\n10 20\n\n5 15\n0 10\n10 10\n";

fn json_rows(cmd: &mut Command) -> Vec<Value> {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    value.as_array().unwrap().clone()
}

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ============================================================================
// Console Table
// ============================================================================

mod table {
    use super::*;

    #[test]
    fn prints_title_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", SAMPLE);
        let output = calceff(&dir).arg(&data).arg("0.95").output().unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines[0], "Efficiency Results");
        assert!(lines[1].split_whitespace().eq(["k", "n", "mode", "low", "high"]));
        // title, header, rule, four rows
        assert_eq!(lines.len(), 7);

        let first: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(first[..3], ["10", "20", "5.000000e-01"]);
        assert!(first[3].starts_with("2.9780"));
        assert!(first[4].starts_with("7.0219"));

        let zero: Vec<&str> = lines[5].split_whitespace().collect();
        assert_eq!(zero[..4], ["0", "10", "0.000000e+00", "0.000000e+00"]);

        let all: Vec<&str> = lines[6].split_whitespace().collect();
        assert_eq!(all[2], "1.000000e+00");
        assert_eq!(all[4], "1.000000e+00");
    }

    #[test]
    fn out_file_replaces_table() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", SAMPLE);
        calceff(&dir)
            .arg(&data)
            .arg("0.95")
            .arg("--out")
            .arg(dir.path().join("out.tsv"))
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}

// ============================================================================
// Result Files
// ============================================================================

mod files {
    use super::*;

    #[test]
    fn tsv_by_default() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", SAMPLE);
        let out = dir.path().join("out.tsv");
        calceff(&dir)
            .arg(&data)
            .arg("0.95")
            .args(["-o", out.to_str().unwrap()])
            .assert()
            .success();

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "k\tn\tmode\tlow\thigh");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("10\t20\t5.00000000000000000e-01\t2.978"));
        assert!(lines[3].starts_with("0\t10\t0.00000000000000000e+00\t0.00000000000000000e+00\t2.384"));

        let high: f64 = lines[3].split('\t').nth(4).unwrap().parse().unwrap();
        assert!(approx_eq(high, 1.0 - 0.05f64.powf(1.0 / 11.0), 1e-12));
    }

    #[test]
    fn csv_with_flag() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", SAMPLE);
        let out = dir.path().join("out.csv");
        calceff(&dir)
            .arg(&data)
            .arg("0.95")
            .arg("--out")
            .arg(&out)
            .arg("-c")
            .assert()
            .success();

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("k,n,mode,low,high\n"));
        assert!(text.contains("\n10,10,1.00000000000000000e+00,"));
        assert!(!text.contains('\t'));
    }

    #[test]
    fn failed_rows_left_out_of_file() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "1 2\n7 3\n");
        let out = dir.path().join("out.tsv");
        calceff(&dir)
            .arg(&data)
            .arg("0.5")
            .arg("--out")
            .arg(&out)
            .assert()
            .code(3);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}

// ============================================================================
// JSON
// ============================================================================

mod json {
    use super::*;

    #[test]
    fn rows_carry_interval_width_and_coverage() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", SAMPLE);
        let rows = json_rows(calceff(&dir).arg(&data).arg("0.95").args(["--format", "json"]));
        assert_eq!(rows.len(), 4);

        let first = &rows[0];
        assert_eq!(first["k"], 10);
        assert_eq!(first["n"], 20);
        assert_eq!(first["line"], 2);
        assert_eq!(first["mode"], 0.5);
        assert!(approx_eq(first["low"].as_f64().unwrap(), 0.297_807, 1e-6));
        assert!(approx_eq(first["high"].as_f64().unwrap(), 0.702_193, 1e-6));
        assert!(approx_eq(first["coverage"].as_f64().unwrap(), 0.95, 1e-9));

        let skewed = &rows[1];
        assert!(approx_eq(skewed["low"].as_f64().unwrap(), 0.141_508, 1e-6));
        assert!(approx_eq(skewed["high"].as_f64().unwrap(), 0.573_592, 1e-6));
    }

    #[test]
    fn failures_are_included() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "1 2\n7 3\n");
        let output = calceff(&dir)
            .arg(&data)
            .arg("0.5")
            .args(["-f", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(3));
        let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(rows[1]["kind"], "input_validation");
        assert!(rows[1]["error"].as_str().unwrap().contains("exceed"));
    }

    #[test]
    fn solver_flags_agree_with_default() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "3 17\n8 10\n1 2\n");
        let baseline = json_rows(calceff(&dir).arg(&data).arg("0.8").args(["-f", "json"]));
        for (method, finder) in [
            ("density-level", "bisection"),
            ("tail-probability", "brent"),
            ("density-level", "brent"),
        ] {
            let rows = json_rows(calceff(&dir).arg(&data).arg("0.8").args([
                "-f",
                "json",
                "--method",
                method,
                "--root-finder",
                finder,
            ]));
            for (a, b) in baseline.iter().zip(&rows) {
                for key in ["low", "high"] {
                    let (a, b) = (a[key].as_f64().unwrap(), b[key].as_f64().unwrap());
                    assert!(approx_eq(a, b, 1e-6), "{method}/{finder} {key}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn config_file_selects_solver() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "3 17\n");
        let config_dir = dir.path().join("calceff");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[solver]\nmethod = \"density_level\"\nroot_finder = \"brent\"\n",
        )
        .unwrap();

        let output = calceff(&dir)
            .arg(&data)
            .arg("0.8")
            .args(["-f", "json", "-vv"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("density-level"), "{stderr}");
        let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert!(approx_eq(rows[0]["low"].as_f64().unwrap(), 0.082_12, 1e-5));
        assert!(approx_eq(rows[0]["high"].as_f64().unwrap(), 0.309_05, 1e-5));
    }
}

// ============================================================================
// Logging
// ============================================================================

mod logging {
    use super::*;

    #[test]
    fn jsonl_logs_are_json_lines() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "4 9\nbad\n");
        let output = calceff(&dir)
            .arg(&data)
            .arg("0.9")
            .args(["--log-format", "jsonl", "-v"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let stderr = String::from_utf8(output.stderr).unwrap();
        let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
        assert!(!lines.is_empty());
        for line in &lines {
            let value: Value = serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("not JSON ({e}): {line}"));
            assert!(value.get("level").is_some());
        }
        assert!(stderr.contains("Invalid line format on line 2"));
    }

    #[test]
    fn quiet_hides_warnings() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "4 9\nbad\n");
        calceff(&dir)
            .arg(&data)
            .arg("0.9")
            .arg("-q")
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn log_level_from_env() {
        let dir = TempDir::new().unwrap();
        let data = write_file(&dir, "data.txt", "4 9\n");
        calceff(&dir)
            .env("CALCEFF_LOG", "info")
            .arg(&data)
            .arg("0.9")
            .assert()
            .success()
            .stderr(predicate::str::contains("batch started"));
    }
}
