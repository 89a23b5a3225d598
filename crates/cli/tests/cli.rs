// ABOUTME: Integration tests for the quickfacts CLI binary.
// ABOUTME: Exercises --html parsing, argument validation and input errors that stop before Chrome launches.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table><tbody><tr><th>QuickFacts</th></tr><tr><td>Table</td><td>Map</td></tr></tbody></table>
<table><tbody>
  <tr><th>Population</th></tr>
  <tr><td>2020</td><td><div>🧑</div>1,147,532</td></tr>
</tbody></table>
</body></html>"#;

fn quickfacts_cmd() -> Command {
    Command::cargo_bin("quickfacts").unwrap()
}

#[test]
fn parse_html_prints_record() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("fairfax.html");
    fs::write(&html_path, PAGE).unwrap();

    quickfacts_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--state")
        .arg("VA")
        .arg("--county")
        .arg("Fairfax")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"result_url\": \"https://www.census.gov/quickfacts/fact/table/fairfaxcountyva/PST045222\"",
        ))
        .stdout(predicate::str::contains("\"2020\": \"1,147,532\""))
        .stdout(predicate::str::contains("QuickFacts").not());
}

#[test]
fn parse_html_to_file_uses_four_space_indent() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("fairfax.html");
    let output_path = temp_dir.path().join("record.json");
    fs::write(&html_path, PAGE).unwrap();

    quickfacts_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--state")
        .arg("va")
        .arg("--county")
        .arg("fairfax")
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let content = fs::read_to_string(&output_path).unwrap();
    assert!(content.starts_with("{\n    \"state\": \"va\",\n    \"county\": \"fairfax\""));
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["data"][0]["Population"][0]["2020"], "1,147,532");
}

#[test]
fn html_without_state_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, PAGE).unwrap();

    quickfacts_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--county")
        .arg("fairfax")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--state and --county are required"));
}

#[test]
fn state_without_html_fails() {
    quickfacts_cmd()
        .arg("--state")
        .arg("va")
        .assert()
        .failure()
        .stderr(predicate::str::contains("only valid with --html"));
}

#[test]
fn missing_input_fails_before_launching_browser() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.json");

    quickfacts_cmd()
        .arg("--input")
        .arg(temp_dir.path().join("nope.csv"))
        .arg("--output")
        .arg(&output_path)
        .arg("--timing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input error"))
        .stderr(predicate::str::contains("elapsed:"));

    assert!(!output_path.exists());
}

#[test]
fn malformed_input_names_the_line() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("geo.csv");
    fs::write(&input_path, "State,County\nVA,Fairfax\nTX\n").unwrap();

    quickfacts_cmd()
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(temp_dir.path().join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn bad_base_url_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, PAGE).unwrap();

    quickfacts_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--state")
        .arg("va")
        .arg("--county")
        .arg("fairfax")
        .arg("--base-url")
        .arg("ftp://census.gov")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scheme must be http or https"));
}

#[test]
fn zero_wait_timeout_is_rejected() {
    quickfacts_cmd()
        .arg("--wait-timeout")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--wait-timeout"));
}
