/// Command line tests for the `hotspot_timing` and `flag_false_alarms`
/// binaries.
///
/// Run with: cargo test --test cli

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MODIS_CSV: &str = "latitude,longitude,brightness,acq_date,acq_time,instrument,confidence,frp
51.43,6.76,318.4,2023-07-14,1200,MODIS,90,21.7
52.0123,13.4031,330.2,2023-07-14,1235,MODIS,77,44.0
";

const VIIRS_CSV: &str = "latitude,longitude,bright_ti4,acq_date,acq_time,instrument,confidence,frp
51.43,6.76,336.5,2023-07-14,1203,VIIRS,n,8.1
52.0131,13.4050,348.9,2023-07-14,1241,VIIRS,h,17.3
";

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let modis = dir.join("modis.csv");
    let viirs = dir.join("viirs.csv");
    fs::write(&modis, MODIS_CSV).unwrap();
    fs::write(&viirs, VIIRS_CSV).unwrap();
    (modis, viirs)
}

fn shipped_config() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/analysis.toml")
}

#[test]
fn test_hotspot_timing_prints_summary_and_writes_artifacts() {
    let tmp = TempDir::new().unwrap();
    let (modis, viirs) = write_inputs(tmp.path());
    let out = tmp.path().join("out");

    Command::cargo_bin("hotspot_timing")
        .unwrap()
        .arg("--config")
        .arg(shipped_config())
        .arg("--input")
        .arg(&modis)
        .arg("--input")
        .arg(&viirs)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Germany 2023"))
        .stdout(predicate::str::contains("matched pairs"))
        .stdout(predicate::str::contains("Duisburg steel works"));

    assert!(out.join("summary.txt").exists());
    assert!(out.join("matches.csv").exists());
    assert!(out.join("time_diff_histogram.svg").exists());
    assert!(out.join("false_alarms.geojson").exists());
}

#[test]
fn test_no_artifacts_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let (modis, viirs) = write_inputs(tmp.path());
    let out = tmp.path().join("out");

    Command::cargo_bin("hotspot_timing")
        .unwrap()
        .arg("--config")
        .arg(shipped_config())
        .arg("--input")
        .arg(&modis)
        .arg("--input")
        .arg(&viirs)
        .arg("--out")
        .arg(&out)
        .arg("--no-artifacts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Time difference"));

    assert!(!out.exists());
}

#[test]
fn test_threshold_override_suppresses_false_alarms() {
    let tmp = TempDir::new().unwrap();
    let (modis, viirs) = write_inputs(tmp.path());

    Command::cargo_bin("hotspot_timing")
        .unwrap()
        .arg("--config")
        .arg(shipped_config())
        .arg("--input")
        .arg(&modis)
        .arg("--input")
        .arg(&viirs)
        .args(["--threshold", "95", "--no-artifacts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no suspected false alarms"));
}

#[test]
fn test_invalid_override_fails() {
    let tmp = TempDir::new().unwrap();
    let (modis, _) = write_inputs(tmp.path());

    Command::cargo_bin("hotspot_timing")
        .unwrap()
        .arg("--config")
        .arg(shipped_config())
        .arg("--input")
        .arg(&modis)
        .args(["--max-distance-km", "0", "--no-artifacts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_distance_km"));
}

#[test]
fn test_missing_input_fails() {
    let tmp = TempDir::new().unwrap();

    Command::cargo_bin("hotspot_timing")
        .unwrap()
        .arg("--input")
        .arg(tmp.path().join("missing.csv"))
        .arg("--no-artifacts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading detections"));
}

#[test]
fn test_flag_false_alarms_lists_duisburg() {
    let tmp = TempDir::new().unwrap();
    let (modis, viirs) = write_inputs(tmp.path());
    let geojson = tmp.path().join("flagged.geojson");

    Command::cargo_bin("flag_false_alarms")
        .unwrap()
        .arg("--config")
        .arg(shipped_config())
        .arg("--input")
        .arg(&modis)
        .arg("--input")
        .arg(&viirs)
        .arg("--geojson")
        .arg(&geojson)
        .assert()
        .success()
        .stdout(predicate::str::contains("Duisburg steel works"))
        .stdout(predicate::str::contains("MODIS"));

    let text = fs::read_to_string(&geojson).unwrap();
    assert!(text.contains("FeatureCollection"));
}
