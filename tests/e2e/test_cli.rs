//! End-to-end tests for the cascade-select binary.
//!
//! Each test runs the compiled binary (built by `cargo test` via
//! `CARGO_BIN_EXE`) against the bundled demo dataset or a temp file and
//! checks the rendered output.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cascade-select"))
}

fn run_binary(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("failed to run binary")
}

/// Run expecting success; returns stdout.
fn run_ok(args: &[&str]) -> String {
    let output = run_binary(args);
    assert!(
        output.status.success(),
        "binary exited with {:?}:\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("non-UTF8 output")
}

#[test]
fn test_default_run_shows_all_records() {
    let stdout = run_ok(&[]);
    assert!(stdout.contains("12 of 12 records match"));
    assert!(stdout.contains("Select a Region..."));
    assert!(stdout.contains("Select a Trail Type..."));
    assert!(stdout.contains("Trap Pond"));
}

#[test]
fn test_region_selection_narrows_output() {
    let stdout = run_ok(&["--select", "Region=NORTH"]);
    assert!(stdout.contains("6 of 12 records match (active: Region)"));
    assert!(stdout.contains("Region [NORTH]"));
    assert!(stdout.contains("Select a City... | Newark | Wilmington | Yorklyn"));
    assert!(!stdout.contains("Trap Pond"));
}

#[test]
fn test_multi_selection_is_any_of() {
    let stdout = run_ok(&["--select", "Accessible=Yes,No"]);
    assert!(stdout.contains("12 of 12 records match (active: Accessible)"));
    assert!(stdout.contains("Accessible [Yes, No]"));
}

#[test]
fn test_json_output_parses() {
    let stdout = run_ok(&["--json", "--select", "Region=NORTH", "--select", "City=Wilmington"]);
    let summary: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(summary["matched"], 3);
    assert_eq!(summary["total"], 12);
    assert_eq!(summary["active"], serde_json::json!(["Region", "City"]));
    let park_options = summary["nodes"][2]["options"]
        .as_array()
        .expect("Park options");
    assert!(park_options.iter().any(|o| o == "Alapocas Run"));
    assert!(park_options.iter().any(|o| o == "Fox Point"));
    assert_eq!(summary["records"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_custom_topology() {
    let stdout = run_ok(&[
        "--node",
        "Type",
        "--node",
        "Accessible:Type:multi",
        "--select",
        "Type=Hiking-Equestrian",
    ]);
    assert!(stdout.contains("2 of 12 records match (active: Type)"));
}

#[test]
fn test_data_file_argument() {
    let path = std::env::temp_dir().join("cascade_select_e2e_data.json");
    fs::write(
        &path,
        r#"{"records":[{"Region":"NORTH","City":"Wilmington"},{"Region":"SOUTH","City":"Laurel"}]}"#,
    )
    .expect("write temp data");
    let stdout = run_ok(&[
        path.to_str().expect("utf8 temp path"),
        "--node",
        "Region",
        "--node",
        "City:Region",
        "--select",
        "Region=SOUTH",
    ]);
    assert!(stdout.contains("1 of 2 records match (active: Region)"));
    assert!(stdout.contains("Select a City... | Laurel"));
    fs::remove_file(&path).ok();
}

#[test]
fn test_output_file() {
    let path = std::env::temp_dir().join("cascade_select_e2e_out.txt");
    fs::remove_file(&path).ok();
    run_ok(&["--output", path.to_str().expect("utf8 temp path")]);
    let written = fs::read_to_string(&path).expect("output file written");
    assert!(written.contains("12 of 12 records match"));
    fs::remove_file(&path).ok();
}

#[test]
fn test_unknown_field_exits_nonzero() {
    let output = run_binary(&["--select", "Trail=Pawpaw Loop"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown filter node 'Trail'"));
}

#[test]
fn test_cyclic_topology_exits_nonzero() {
    let output = run_binary(&["--node", "City:Region", "--node", "Region:City"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cycle"));
}

#[test]
fn test_malformed_selection_exits_nonzero() {
    let output = run_binary(&["--select", "RegionNORTH"]);
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("expected FIELD=VALUE")
    );
}
