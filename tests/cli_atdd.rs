use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rex() -> Command {
    Command::cargo_bin("rex-report").expect("binary should compile")
}

fn write_eval(dir: &std::path::Path, file: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(file);
    fs::write(&path, body).expect("evaluation file should write");
    path
}

const STRONG_EVAL: &str = r#"{
    "id": "eval-strong",
    "name": "smoke run",
    "scores": {
        "faithfulness": 0.95,
        "answer_correctness": 0.95,
        "answer_relevancy": 0.95,
        "context_precision": 0.95,
        "context_recall": 0.95
    },
    "startedAt": "2025-03-01T10:00:00Z"
}"#;

#[test]
fn score_strong_run_exits_clean_with_excellent_grade() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(dir.path(), "eval.json", STRONG_EVAL);

    rex()
        .arg("score")
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("overall: 95.0 (Excellent)"))
        .stdout(predicate::str::contains("warnings: none"));
}

#[test]
fn score_weak_metric_exits_with_warning_code() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(
        dir.path(),
        "eval.json",
        r#"{
            "id": "eval-warn",
            "name": "warn run",
            "scores": {"faithfulness": 0.95, "conciseness": 0.5},
            "startedAt": "2025-03-01T10:00:00Z"
        }"#,
    );

    rex()
        .arg("score")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("below threshold 70"));
}

#[test]
fn score_critical_run_exits_with_blocking_code() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(
        dir.path(),
        "eval.json",
        r#"{
            "id": "eval-bad",
            "name": "bad run",
            "scores": {"faithfulness": 0.3},
            "startedAt": "2025-03-01T10:00:00Z"
        }"#,
    );

    rex()
        .arg("score")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("(Critical)"));
}

#[test]
fn score_json_format_prints_analysis() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(dir.path(), "eval.json", STRONG_EVAL);

    rex()
        .args(["score", path.to_str().expect("utf-8 path"), "--format", "json"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"grade\": \"excellent\""))
        .stdout(predicate::str::contains("\"reliability\""));
}

#[test]
fn report_writes_conventionally_named_html_file() {
    let dir = TempDir::new().expect("temp dir should be created");
    let out = TempDir::new().expect("out dir should be created");
    let path = write_eval(dir.path(), "eval.json", STRONG_EVAL);

    rex()
        .arg("report")
        .arg(&path)
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("report file:"));

    let written: Vec<String> = fs::read_dir(out.path())
        .expect("out dir should read")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("REX_Report_smoke_run_"));
    assert!(written[0].ends_with(".html"));

    let html = fs::read_to_string(out.path().join(&written[0])).expect("report should read");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("smoke run"));
    assert!(!html.contains("NaN"));
}

#[test]
fn report_stdout_renders_trend_against_previous_run() {
    let dir = TempDir::new().expect("temp dir should be created");
    let current = write_eval(
        dir.path(),
        "current.json",
        r#"{
            "id": "eval-now",
            "name": "current",
            "scores": {"faithfulness": 0.91},
            "startedAt": "2025-03-01T10:00:00Z"
        }"#,
    );
    let previous = write_eval(
        dir.path(),
        "previous.json",
        r#"{
            "id": "eval-prev",
            "name": "previous",
            "scores": {"faithfulness": 0.95},
            "startedAt": "2025-02-01T10:00:00Z"
        }"#,
    );

    rex()
        .arg("report")
        .arg(&current)
        .arg("--previous")
        .arg(&previous)
        .arg("--stdout")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Trend vs Previous Run"))
        .stdout(predicate::str::contains(
            "Faithfulness dropped 4.0 points since the last run",
        ));
}

#[test]
fn report_history_directory_selects_latest_earlier_run() {
    let dir = TempDir::new().expect("temp dir should be created");
    let history = TempDir::new().expect("history dir should be created");
    let current = write_eval(
        dir.path(),
        "current.json",
        r#"{
            "id": "eval-now",
            "name": "current",
            "scores": {"faithfulness": 0.91},
            "startedAt": "2025-03-01T10:00:00Z"
        }"#,
    );
    write_eval(
        history.path(),
        "old.json",
        r#"{
            "id": "eval-old",
            "name": "january run",
            "scores": {"faithfulness": 0.80},
            "startedAt": "2025-01-01T10:00:00Z"
        }"#,
    );
    write_eval(
        history.path(),
        "recent.json",
        r#"{
            "id": "eval-recent",
            "name": "february run",
            "scores": {"faithfulness": 0.95},
            "startedAt": "2025-02-01T10:00:00Z"
        }"#,
    );

    rex()
        .arg("report")
        .arg(&current)
        .arg("--history")
        .arg(history.path())
        .arg("--stdout")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("february run"))
        .stdout(predicate::str::contains("dropped 4.0 points"));
}

#[test]
fn report_md_format_renders_markdown_to_stdout() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(dir.path(), "eval.json", STRONG_EVAL);

    rex()
        .args([
            "report",
            path.to_str().expect("utf-8 path"),
            "--format",
            "md",
            "--stdout",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("# REX Evaluation Report"))
        .stdout(predicate::str::contains("## Tier Breakdown"));
}

#[test]
fn report_honors_rex_toml_next_to_the_evaluation() {
    let dir = TempDir::new().expect("temp dir should be created");
    // Raise the warning threshold so a 95-point metric now warns.
    fs::write(
        dir.path().join("rex.toml"),
        r#"
[grading]
warn_threshold = 96.0
"#,
    )
    .expect("config should write");
    let path = write_eval(dir.path(), "eval.json", STRONG_EVAL);

    rex()
        .arg("score")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("below threshold 96"));
}

#[test]
fn validate_flags_contract_violations() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(
        dir.path(),
        "eval.json",
        r#"{
            "id": "eval-1",
            "name": "run",
            "scores": {"faithfulness": 1.4, "made_up": 0.5},
            "startedAt": "2025-03-01T10:00:00Z"
        }"#,
    );

    rex()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("fingerprint:"))
        .stdout(predicate::str::contains("[WARN] scores.out_of_range"))
        .stdout(predicate::str::contains("[WARN] scores.unknown_metric"));
}

#[test]
fn validate_blocks_inverted_timestamps() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(
        dir.path(),
        "eval.json",
        r#"{
            "id": "eval-1",
            "name": "run",
            "scores": {"faithfulness": 0.9},
            "startedAt": "2025-03-01T10:00:00Z",
            "completedAt": "2025-03-01T09:00:00Z"
        }"#,
    );

    rex()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[BLOCKING] eval.inverted_timestamps"));
}

#[test]
fn validate_clean_evaluation_reports_no_findings() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(dir.path(), "eval.json", STRONG_EVAL);

    rex()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("validate: no findings"));
}

#[test]
fn report_unparseable_evaluation_exits_with_runtime_failure() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = write_eval(dir.path(), "eval.json", "{broken");

    rex()
        .arg("report")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("evaluation parse error"));
}
