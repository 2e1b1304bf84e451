//! CLI-level checks driving the compiled binary.

use std::path::PathBuf;
use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pv-sim"))
        .args(args)
        .output()
        .expect("pv-sim process should run")
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("pv-sim-test-{}-{name}", std::process::id()));
    path
}

#[test]
fn demo_scenario_prints_a_yield_report() {
    let output = run(&["--scenario", "scenarios/demo_week.toml"]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- Yield Report ---"));
    assert!(stdout.contains("Total energy:"));
    assert!(stdout.contains("Capacity factor:"));
}

#[test]
fn sweep_flag_reports_best_and_worst_orientations() {
    let output = run(&["--scenario", "scenarios/demo_week.toml", "--sweep"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- Orientation Sweep ---"));
    assert!(stdout.contains("Best:"));
    assert!(stdout.contains("Worst:"));
}

#[test]
fn exported_daily_series_validates_against_itself() {
    // First run exports the daily series; the export format doubles as
    // the measured-series input format, so feeding it back must produce
    // perfect validation metrics.
    let daily = temp_path("daily.csv");
    let daily_str = daily.to_str().unwrap();

    let export = run(&[
        "--scenario",
        "scenarios/demo_week.toml",
        "--daily-out",
        daily_str,
    ]);
    assert!(export.status.success());

    let validate = run(&[
        "--scenario",
        "scenarios/demo_week.toml",
        "--measured",
        daily_str,
    ]);
    assert!(validate.status.success());

    let stdout = String::from_utf8(validate.stdout).unwrap();
    assert!(stdout.contains("--- Validation ---"));
    assert!(stdout.contains("RMSE: 0.0000 kWh"));
    assert!(stdout.contains("R²:   1.0000"));

    std::fs::remove_file(&daily).ok();
}

#[test]
fn unknown_preset_fails_with_diagnostic() {
    let output = run(&["--preset", "nope"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown preset"));
}

#[test]
fn unknown_flag_fails_with_usage() {
    let output = run(&["--bogus"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown argument"));
    assert!(stderr.contains("Usage:"));
}

#[test]
fn invalid_scenario_reports_field_errors() {
    let bad = temp_path("bad.toml");
    std::fs::write(&bad, "[array]\ntilt_deg = 120.0\n").unwrap();

    let output = run(&["--scenario", bad.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("array.tilt_deg"));

    std::fs::remove_file(&bad).ok();
}
