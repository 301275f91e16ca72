use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn doctor_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_scrollchor-doctor"))
}

fn run_doctor(args: &[&str]) -> Output {
    Command::new(doctor_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("doctor binary runs")
}

fn write_page(dir: &Path, name: &str, json: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, json).expect("write page");
    path.display().to_string()
}

const TWO_PINNED: &str = r#"{
    "sections": [
        { "id": "intro", "trigger": { "end": "+=100%" },
          "tweens": [ { "targets": ["title"], "at": 0.0,
                        "from": { "opacity": 0 }, "to": { "opacity": 1 } } ] },
        { "id": "story", "height": "1600px",
          "trigger": { "start": "top 80%", "end": "top 20%", "pin": false } },
        { "id": "outro", "trigger": { "end": "+=100%" } }
    ],
    "snap": { "margin": 0.01, "duration": [0.1, 0.25] }
}"#;

#[test]
fn inspect_json_lists_sections_in_document_order() {
    let dir = tempdir().expect("tempdir");
    let page = write_page(dir.path(), "page.json", TWO_PINNED);

    let output = run_doctor(&["inspect", "--page", &page, "--viewport", "1000x800", "--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    let ids: Vec<&str> = report["sections"]
        .as_array()
        .expect("sections array")
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();
    assert_eq!(ids, ["intro", "story", "outro"]);
    assert_eq!(report["snapping"], "active");
    assert_eq!(report["policy"]["max_duration_ms"], 250);
    assert!(report["sections"][1].get("snap").is_none());
}

#[test]
fn snap_json_reports_one_row_per_candidate() {
    let dir = tempdir().expect("tempdir");
    let page = write_page(dir.path(), "page.json", TWO_PINNED);

    let output = run_doctor(&["snap", "--page", &page, "--at", "0.0,0.999", "--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let rows: Value = serde_json::from_slice(&output.stdout).expect("json rows");
    let rows = rows.as_array().expect("rows array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["range"], "intro");
    assert_eq!(rows[1]["range"], "outro");
}

#[test]
fn simulate_emits_json_lines() {
    let output = run_doctor(&["simulate", "--steps", "4", "--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    // Five steps and the settle record.
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0]["step"], 0);
    assert!(lines[5].get("candidate").is_some());
}

#[test]
fn invalid_viewport_is_a_usage_error() {
    let output = run_doctor(&["inspect", "--viewport", "wide"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("WIDTHxHEIGHT"));
}

#[test]
fn definition_errors_exit_with_code_four() {
    let dir = tempdir().expect("tempdir");
    let page = write_page(
        dir.path(),
        "dupes.json",
        r#"{ "sections": [ { "id": "a" }, { "id": "a" } ] }"#,
    );

    let output = run_doctor(&["inspect", "--page", &page]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn builtin_output_feeds_back_into_inspect() {
    let dir = tempdir().expect("tempdir");
    let page = dir.path().join("showcase.json");
    let page_arg = page.display().to_string();

    let output = run_doctor(&["builtin", "--output", &page_arg]);
    assert!(output.status.success());

    let output = run_doctor(&["inspect", "--page", &page_arg, "--json"]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["sections"].as_array().map(Vec::len), Some(7));
}
