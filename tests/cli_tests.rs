//! Integration tests for the testforge CLI
//!
//! Each test runs the compiled binary against the fixtures in
//! `tests/fixtures` copied into a temporary Maven-style project.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary
fn testforge_cmd() -> Command {
    Command::cargo_bin("testforge").unwrap()
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Project root holding the fixture report at the standard JaCoCo location
fn project_with_report() -> TempDir {
    let dir = tempdir().unwrap();
    let report_dir = dir.path().join("target/site/jacoco");
    fs::create_dir_all(&report_dir).unwrap();
    fs::copy(fixture("jacoco.xml"), report_dir.join("jacoco.xml")).unwrap();
    dir
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_cli_help() {
    testforge_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze-coverage"))
        .stdout(predicate::str::contains("generate-cases"))
        .stdout(predicate::str::contains("mcp-stdio"));
}

#[test]
fn test_analyze_coverage_json_orders_worst_first() {
    let project = project_with_report();
    let value = json_stdout(
        testforge_cmd()
            .args(["analyze-coverage", "--format", "json"])
            .arg(project.path()),
    );

    let classes = value["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0]["fqn"], "com.shop.Cart");
    assert_eq!(classes[0]["uncovered_lines_total"], 4);
    assert_eq!(classes[1]["fqn"], "com.shop.PriceCalculator");
    assert!(classes[1]["recommendations"].as_array().unwrap().is_empty());

    let add = &classes[0]["methods"][1];
    assert_eq!(add["name"], "add");
    assert_eq!(add["uncovered_line_ranges"], serde_json::json!([[10, 11]]));
    assert_eq!(value["overall"]["instruction_covered"], 27);
    assert_eq!(value["min_coverage"], 0.8);
}

#[test]
fn test_analyze_coverage_table_lists_recommendations() {
    let project = project_with_report();
    testforge_cmd()
        .arg("analyze-coverage")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("com.shop.Cart"))
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn test_missing_report_suggests_running_maven() {
    let dir = tempdir().unwrap();
    testforge_cmd()
        .arg("analyze-coverage")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mvn test"));
}

#[test]
fn test_coverage_gate_exit_status() {
    let project = project_with_report();

    // 27 of 37 instructions covered
    testforge_cmd()
        .args(["coverage-gate", "--threshold", "0.7"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("passed"));

    testforge_cmd()
        .arg("coverage-gate")
        .arg(project.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed"));
}

#[test]
fn test_generate_cases_json_is_capped() {
    let value = json_stdout(
        testforge_cmd()
            .arg("generate-cases")
            .arg(fixture("signatures.json"))
            .args([
                "--class",
                "com.shop.PriceCalculator",
                "--method",
                "applyDiscount",
                "--spec",
                r#"{"amount":{"min":0,"max":100},"percent":{"min":0,"max":50}}"#,
                "--format",
                "json",
            ]),
    );

    let cases = value["test_cases"].as_array().unwrap();
    assert_eq!(cases.len(), 20);
    assert_eq!(cases[0]["values"]["amount"], -1.0);
    assert_eq!(cases[0]["values"]["percent"], -1);
    assert_eq!(value["max_cases"], 20);
    assert!(value.get("write").is_none());
    assert_eq!(
        value["skeleton"].as_str().unwrap().matches("@Test").count(),
        20
    );
}

#[test]
fn test_generate_cases_writes_skeleton_once() {
    let project = tempdir().unwrap();
    let run = || {
        let mut cmd = testforge_cmd();
        cmd.arg("generate-cases")
            .arg(fixture("signatures.json"))
            .args(["--class", "com.shop.Cart", "--method", "add", "--max-cases", "4"])
            .args(["--write", "--format", "json", "--project-root"])
            .arg(project.path());
        json_stdout(&mut cmd)
    };

    let first = run();
    assert_eq!(first["write"]["status"], "written");
    assert_eq!(first["test_cases"].as_array().unwrap().len(), 4);
    let written = project
        .path()
        .join("src/test/java/com/shop/CartAddGeneratedTest.java");
    assert!(written.exists());

    let second = run();
    assert_eq!(second["write"]["status"], "skipped");
}

#[test]
fn test_generate_cases_unknown_method_fails() {
    testforge_cmd()
        .arg("generate-cases")
        .arg(fixture("signatures.json"))
        .args(["--class", "com.shop.Cart", "--method", "checkout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checkout"))
        .stderr(predicate::str::contains("com.shop.Cart"));
}

#[test]
fn test_write_requires_project_root() {
    testforge_cmd()
        .arg("generate-cases")
        .arg(fixture("signatures.json"))
        .args(["--class", "com.shop.Cart", "--method", "add", "--write"])
        .assert()
        .failure();
}

#[test]
fn test_generate_tests_skips_classes_without_public_methods() {
    let project = tempdir().unwrap();
    let value = json_stdout(
        testforge_cmd()
            .arg("generate-tests")
            .arg(fixture("signatures.json"))
            .args(["--format", "json", "--project-root"])
            .arg(project.path()),
    );

    assert_eq!(value["generated_files"].as_array().unwrap().len(), 2);
    assert_eq!(value["summary"]["num_classes"], 3);
    let test_root = project.path().join("src/test/java/com/shop");
    assert!(test_root.join("CartTest.java").exists());
    assert!(test_root.join("PriceCalculatorTest.java").exists());
    assert!(!project
        .path()
        .join("src/test/java/com/shop/internal/AuditLogTest.java")
        .exists());

    let cart = fs::read_to_string(test_root.join("CartTest.java")).unwrap();
    assert!(cart.contains("fail(\"Not yet implemented\")"));
}

#[test]
fn test_summarize_project() {
    let value = json_stdout(
        testforge_cmd()
            .arg("summarize-project")
            .arg(fixture("signatures.json"))
            .args(["--format", "json"]),
    );
    assert_eq!(value["num_classes"], 3);
    assert_eq!(value["num_methods"], 5);
    assert_eq!(value["num_public_methods"], 4);
}

#[test]
fn test_results_for_missing_directory_are_empty() {
    let dir = tempdir().unwrap();
    let value = json_stdout(
        testforge_cmd()
            .arg("test-results")
            .arg(dir.path().join("target/surefire-reports"))
            .args(["--format", "json"]),
    );
    assert_eq!(value["summary"]["total_tests"], 0);
    assert!(value["suites"].as_array().unwrap().is_empty());
}

#[test]
fn test_results_report_failures() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("TEST-com.shop.CartTest.xml"),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="com.shop.CartTest" tests="2" failures="1" errors="0" skipped="0" time="0.04">
  <testcase name="addsItem" classname="com.shop.CartTest" time="0.01"/>
  <testcase name="totalsItems" classname="com.shop.CartTest" time="0.03">
    <failure message="expected: &lt;3.0&gt; but was: &lt;0.0&gt;" type="org.opentest4j.AssertionFailedError">stack</failure>
  </testcase>
</testsuite>"#,
    )
    .unwrap();

    testforge_cmd()
        .arg("test-results")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("com.shop.CartTest"))
        .stdout(predicate::str::contains("totalsItems"));
}

#[test]
fn test_print_default_config() {
    testforge_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("min_coverage"))
        .stdout(predicate::str::contains("max_cases"));
}

#[test]
fn test_init_then_validate_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join(".testforge.yml");

    testforge_cmd()
        .args(["init-config", "--output"])
        .arg(&config_path)
        .assert()
        .success();
    assert!(config_path.exists());

    testforge_cmd()
        .args(["init-config", "--output"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    testforge_cmd()
        .arg("validate-config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_config_file_changes_case_cap() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("testforge.yml");
    fs::write(&config_path, "generation:\n  max_cases: 5\n").unwrap();

    let value = json_stdout(
        testforge_cmd()
            .arg("--config")
            .arg(&config_path)
            .arg("generate-cases")
            .arg(fixture("signatures.json"))
            .args([
                "--class",
                "com.shop.PriceCalculator",
                "--method",
                "applyDiscount",
                "--format",
                "json",
            ]),
    );
    assert_eq!(value["max_cases"], 5);
    assert_eq!(value["test_cases"].as_array().unwrap().len(), 5);
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("testforge.yml");
    fs::write(&config_path, "coverage:\n  min_coverage: 1.5\n").unwrap();

    testforge_cmd()
        .arg("validate-config")
        .arg(&config_path)
        .assert()
        .failure();
}

#[test]
fn test_mcp_stdio_lists_tools() {
    let requests = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );

    let output = testforge_cmd()
        .arg("mcp-stdio")
        .write_stdin(requests)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "testforge");
    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert!(tools
        .iter()
        .any(|tool| tool["name"] == "generate_spec_based_tests"));
}
