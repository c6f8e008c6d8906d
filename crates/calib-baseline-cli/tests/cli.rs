use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn testdata_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn calib_baseline() -> Command {
    Command::cargo_bin("calib-baseline").expect("binary")
}

#[test]
fn matching_result_exits_zero() {
    calib_baseline()
        .arg(format!(
            "--baseline-file={}",
            testdata_path("FreehandCalibrationBaseline.xml").display()
        ))
        .arg(format!(
            "--current-file={}",
            testdata_path("FreehandCalibrationCurrentOk.xml").display()
        ))
        .arg("--translation-error-threshold=0.5")
        .arg("--rotation-error-threshold=0.5")
        .assert()
        .success()
        .stderr(predicate::str::contains("match the baseline"));
}

#[test]
fn drifted_result_exits_nonzero_with_diagnostics() {
    calib_baseline()
        .arg(format!(
            "--baseline-file={}",
            testdata_path("FreehandCalibrationBaseline.xml").display()
        ))
        .arg(format!(
            "--current-file={}",
            testdata_path("FreehandCalibrationCurrentDrifted.xml").display()
        ))
        .arg("--translation-error-threshold=0.5")
        .arg("--rotation-error-threshold=0.5")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("translation error is higher than expected"))
        .stderr(predicate::str::contains("PRE[0]"))
        .stderr(predicate::str::contains("failed with 2 error(s)"));
}

#[test]
fn unreadable_baseline_exits_nonzero() {
    calib_baseline()
        .arg("--baseline-file=does-not-exist.xml")
        .arg(format!(
            "--current-file={}",
            testdata_path("FreehandCalibrationCurrentOk.xml").display()
        ))
        .arg("--translation-error-threshold=0.5")
        .arg("--rotation-error-threshold=0.5")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reading the baseline document failed"));
}

#[test]
fn missing_required_argument_is_a_usage_error() {
    calib_baseline()
        .arg("--translation-error-threshold=0.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--baseline-file"));
}

#[test]
fn json_report_lists_recorded_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("report.json");

    calib_baseline()
        .arg(format!(
            "--baseline-file={}",
            testdata_path("FreehandCalibrationBaseline.xml").display()
        ))
        .arg(format!(
            "--current-file={}",
            testdata_path("FreehandCalibrationCurrentDrifted.xml").display()
        ))
        .arg("--translation-error-threshold=0.5")
        .arg("--rotation-error-threshold=0.5")
        .arg(format!("--report-json={}", report_path.display()))
        .assert()
        .code(1);

    let raw = std::fs::read_to_string(&report_path).expect("report file");
    let report: serde_json::Value = serde_json::from_str(&raw).expect("report json");
    let failures = report["failures"].as_array().expect("failures array");
    assert_eq!(failures.len(), 2);
}

#[test]
fn wider_ratio_tolerance_accepts_the_pre_drift() {
    // PRE[0] drifts by 16%; the translation shift still fails on its own.
    calib_baseline()
        .arg(format!(
            "--baseline-file={}",
            testdata_path("FreehandCalibrationBaseline.xml").display()
        ))
        .arg(format!(
            "--current-file={}",
            testdata_path("FreehandCalibrationCurrentDrifted.xml").display()
        ))
        .arg("--translation-error-threshold=2.0")
        .arg("--rotation-error-threshold=0.5")
        .arg("--ratio-tolerance=0.25")
        .assert()
        .success();
}
