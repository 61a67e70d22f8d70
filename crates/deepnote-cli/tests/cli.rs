use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

#[test]
fn validate_accepts_fixture() {
    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("validate").arg(fixture_path("sales.deepnote"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ok:").and(predicate::str::contains("1 notebooks, 5 blocks")));
}

#[test]
fn validate_reports_schema_issues_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.deepnote");
    let text = fs::read_to_string(fixture_path("sales.deepnote"))
        .unwrap()
        .replace("color: yellow", "color: orange");
    fs::write(&path, text).unwrap();

    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("--json").arg("validate").arg(&path);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("Invalid enum value"))
        .stderr(predicate::str::contains("is not a valid Deepnote document"));
}

#[test]
fn validate_fails_on_bad_date_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dates.deepnote");
    fs::write(
        &path,
        r#"
version: 1.0.0
metadata: { createdAt: '2025-01-01T00:00:00Z' }
project:
  id: p
  name: P
  notebooks:
    - id: nb
      name: NB
      blocks:
        - id: d
          type: input-date
          sortingKey: a0
          metadata: { deepnote_variable_name: start, deepnote_variable_value: '2023-02-29' }
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("validate").arg(&path);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("nb/d: deepnote_variable_value must be a date"));
}

#[test]
fn validate_json_summarizes_block_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("range.deepnote");
    fs::write(
        &path,
        r#"
version: 1.0.0
metadata: { createdAt: '2025-01-01T00:00:00Z' }
project:
  id: p
  name: P
  notebooks:
    - id: nb
      name: NB
      blocks:
        - id: r
          type: input-date-range
          sortingKey: a0
          metadata: { deepnote_variable_name: period, deepnote_variable_value: ['2024-13-01', 'soon'] }
        - id: t
          type: input-text
          sortingKey: a1
          metadata: { deepnote_variable_name: class, deepnote_variable_value: '' }
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("deepnote");
    let out = cmd.arg("--json").arg("validate").arg(&path).output().unwrap();
    assert!(!out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let checks = json["checks"].as_array().unwrap();
    assert_eq!(checks.len(), 2);
    assert_eq!(
        checks[0]["summary"],
        "deepnote_variable_value must contain dates in YYYY-MM-DD format, got \"2024-13-01\"; \
         deepnote_variable_value must contain dates in YYYY-MM-DD format, got \"soon\""
    );
    assert!(checks[1].get("summary").is_none());
    assert_eq!(checks[1]["warnings"].as_array().map(Vec::len), Some(1));
}

#[test]
fn compile_emits_python_and_markdown_in_order() {
    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("compile").arg(fixture_path("sales.deepnote")).arg("--variable").arg("refresh");

    let title_then_sql = predicate::str::is_match(r"(?s)# Quarterly sales.*orders = _dntk\.execute_sql\(").unwrap();
    cmd.assert()
        .success()
        .stdout(title_then_sql)
        .stdout(predicate::str::contains("'SQL_MY_POSTGRES_CONNECTION'"))
        .stdout(predicate::str::contains("include_returns = False"))
        .stdout(predicate::str::contains("refresh = True"))
        .stdout(predicate::str::contains("> Numbers are preliminary."));
}

#[test]
fn compile_json_for_single_notebook() {
    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("--json")
        .arg("compile")
        .arg(fixture_path("sales.deepnote"))
        .arg("--notebook")
        .arg("nb-main");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"failed\": 0"))
        .stdout(predicate::str::contains("\"ok\": \"refresh = False\""));
}

#[test]
fn compile_unknown_notebook_fails() {
    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("compile").arg(fixture_path("sales.deepnote")).arg("--notebook").arg("missing");
    cmd.assert().failure().stderr(predicate::str::contains("notebook not found: missing"));
}

#[test]
fn markdown_plain_strips_markers() {
    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("markdown").arg(fixture_path("sales.deepnote")).arg("--plain");
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("Quarterly sales\n\nNumbers are preliminary.\n"));
}

#[test]
fn kinds_lists_catalog() {
    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("--json").arg("kinds");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"input-date-range\""))
        .stdout(predicate::str::contains("\"family\": \"markdown\""));
}

#[test]
fn config_limits_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("limits.yaml");
    fs::write(&cfg, "limits:\n  max_document_bytes: 16\n").unwrap();

    let mut cmd = cargo_bin_cmd!("deepnote");
    cmd.arg("--config").arg(&cfg).arg("compile").arg(fixture_path("sales.deepnote"));
    cmd.assert().failure().stderr(predicate::str::contains("document too large"));
}
