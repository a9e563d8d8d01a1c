mod common;

use std::path::PathBuf;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tariff-insights"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("tariff-insights process should run")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tariff-insights-{}-{name}", std::process::id()))
}

#[test]
fn analyze_sample_day_as_json() {
    let fixture = common::fixture_path("sample_day.csv");
    let output = run(&["analyze", fixture.to_str().unwrap(), "--json", "--current-plan", "tou"]);
    assert!(
        output.status.success(),
        "analyze failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");

    let total = report["totals"]["total_usage"].as_f64().unwrap();
    let peak = report["totals"]["peak_usage"].as_f64().unwrap();
    assert!((total - 9.32).abs() < 1e-9, "total={total}");
    assert!((peak - 5.4).abs() < 1e-9, "peak={peak}");
    assert_eq!(report["monthly"][0]["month"], "2025-01");
    assert_eq!(report["comparison"]["current_plan"], "time-of-use");
    assert_eq!(report["comparison"]["best_plan"], "flat");
    assert!(report["statistics"].is_null());
}

#[test]
fn analyze_writes_csv_exports() {
    let fixture = common::fixture_path("sample_day.csv");
    let monthly = temp_path("monthly.csv");
    let hourly = temp_path("hourly.csv");
    let output = run(&[
        "analyze",
        fixture.to_str().unwrap(),
        "--monthly-out",
        monthly.to_str().unwrap(),
        "--hourly-out",
        hourly.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "analyze failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- Plan Comparison"));

    let monthly_csv = std::fs::read_to_string(&monthly).unwrap();
    let hourly_csv = std::fs::read_to_string(&hourly).unwrap();
    std::fs::remove_file(&monthly).ok();
    std::fs::remove_file(&hourly).ok();

    assert_eq!(
        monthly_csv.lines().nth(1),
        Some("2025-01,9.32,5.40,3.92,9.09,10.86,10.61")
    );
    // header + 24 hours of one weekday
    assert_eq!(hourly_csv.lines().count(), 25);
}

#[test]
fn demo_runs_with_seed_override() {
    let output = run(&["demo", "--seed", "7", "--end", "2025-03-31", "--json"]);
    assert!(
        output.status.success(),
        "demo failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["totals"]["day_count"], 90);
    assert!(report["statistics"].is_object());
}

#[test]
fn unknown_preset_fails() {
    let output = run(&["demo", "--preset", "aggressive"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr={stderr}");
}

#[test]
fn file_without_electric_rows_fails() {
    let path = temp_path("gas-only.csv");
    std::fs::write(
        &path,
        "TYPE,DATE,START TIME,END TIME,USAGE (kWh),NOTES\nGas usage,2025-01-15,00:00,00:14,1.0,\n",
    )
    .unwrap();
    let output = run(&["analyze", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no usable"), "stderr={stderr}");
}

#[test]
fn invalid_config_lists_field_errors() {
    let path = temp_path("bad.toml");
    std::fs::write(&path, "[tariff.flat]\ntier1_rate = -1.0\n").unwrap();
    let output = run(&["demo", "--config", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tariff.flat.tier1_rate"), "stderr={stderr}");
}
