//! CLI integration tests

use std::io::Write;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn bfem() -> Command {
    cargo_bin_cmd!("bfem")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_cli_help() {
    bfem()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("capacitance"))
        .stdout(predicate::str::contains("topology"));
}

#[test]
fn test_cli_version() {
    bfem()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_topology_single_path() {
    bfem()
        .arg("topology")
        .arg(fixture("hairpin.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("components: 1"))
        .stdout(predicate::str::contains("OK: graph is a single path"));
}

#[test]
fn test_topology_disconnected_fails() {
    bfem()
        .arg("topology")
        .arg(fixture("disconnected.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("NOT a single series path"))
        .stdout(predicate::str::contains("expected 1 connected component, found 2"))
        .stdout(predicate::str::contains("expected 2 degree-1 terminals, found 4"));
}

#[test]
fn test_topology_json() {
    let output = bfem()
        .arg("topology")
        .arg(fixture("disconnected.json"))
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["component_count"], 2);
    assert_eq!(report["edge_mode"], "segments");
    assert_eq!(report["violations"][0]["kind"], "component-count");
}

#[test]
fn test_topology_path_endpoints_mode() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "schema": "bfem:centerlines:v1",
            "units": "mm",
            "paths": [
                {{"name": "coil", "points": [[0, 0, 0], [3, 4, 0], [10, 0, 0]]}},
                {{"name": "exit", "points": [[10, 0, 0], [10, 0, 20]]}}
            ]
        }}"#
    )
    .unwrap();

    bfem()
        .arg("topology")
        .arg(file.path())
        .args(["--edges", "path-endpoints"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoints: 3"))
        .stdout(predicate::str::contains("edges (path-endpoints): 2"));
}

#[test]
fn test_capacitance_hairpin() {
    bfem()
        .arg("capacitance")
        .arg(fixture("hairpin.json"))
        .args(["--search-mm", "10", "--min-index-sep", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("segments: 3"))
        .stdout(predicate::str::contains("pairs_used: 1"))
        .stdout(predicate::str::contains("pF"));
}

#[test]
fn test_capacitance_json() {
    let output = bfem()
        .arg("capacitance")
        .arg(fixture("hairpin.json"))
        .args(["--search-mm", "10", "--min-index-sep", "0", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["pair_count"], 1);
    assert!(report["c_eff_f"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_capacitance_default_separation_finds_no_pairs() {
    bfem()
        .arg("capacitance")
        .arg(fixture("hairpin.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("pairs_used: 0"));
}

#[test]
fn test_capacitance_requires_wire_width() {
    bfem()
        .arg("capacitance")
        .arg(fixture("disconnected.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("wireWidth_mm"));
}

#[test]
fn test_check_runs_both() {
    bfem()
        .arg("check")
        .arg(fixture("hairpin.json"))
        .args(["--search-mm", "10", "--min-index-sep", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: graph is a single path"))
        .stdout(predicate::str::contains("pairs_used: 1"));
}

#[test]
fn test_bad_schema_rejected() {
    bfem()
        .arg("topology")
        .arg(fixture("bad_schema.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unexpected schema"));
}

#[test]
fn test_missing_file() {
    bfem()
        .arg("topology")
        .arg("/nonexistent/network.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read network file"));
}

#[test]
fn test_invalid_parameter() {
    bfem()
        .arg("capacitance")
        .arg(fixture("hairpin.json"))
        .args(["--parallel-cos", "2.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parallel_cos"));
}

#[test]
fn test_centerlines_without_units_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"schema": "bfem:centerlines:v1", "paths": [{{"points": [[0, 0, 0], [1, 0, 0]]}}]}}"#
    )
    .unwrap();

    bfem()
        .arg("topology")
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("declares no units"));
}

#[test]
fn test_null_params_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"schema": "bfem:conductor-network:v1", "units": "mm", "params": null,
            "paths": [{{"points": [[0, 0, 0], [1, 0, 0]]}}]}}"#
    )
    .unwrap();

    bfem()
        .arg("topology")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: graph is a single path"));
}
