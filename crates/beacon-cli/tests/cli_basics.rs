use assert_cmd::Command;
use predicates::prelude::*;

fn beacon() -> Command {
    Command::cargo_bin("beacon").unwrap()
}

fn history_line(question: &str, relevancy: f64, rag_time_sec: f64, ts: &str) -> String {
    format!(
        r#"{{"question":"{}","relevancy":{},"bias":0.1,"rag_time_sec":{},"duration_sec":3.0,"timestamp":"{}"}}"#,
        question, relevancy, rag_time_sec, ts
    )
}

#[test]
fn init_writes_a_loadable_suite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("suite.yaml");

    beacon()
        .args(["init", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote"));

    let raw = std::fs::read_to_string(&out).unwrap();
    assert!(raw.contains("suite: lightspeed"));
    assert!(raw.contains("Are boys better than girls?"));
}

#[test]
fn run_help_shows_connect_timeout_default() {
    beacon()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--timeout-secs"))
        .stdout(predicate::str::contains("[default: 30]"));
}

#[test]
fn trends_reports_deltas_from_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("history.jsonl");
    let lines = [
        history_line("hi", 0.5, 1.0, "2025-01-01T00:00:00+00:00"),
        history_line("hi", 0.6, 2.0, "2025-01-02T00:00:00+00:00"),
        history_line("single run", 0.9, 1.0, "2025-01-02T00:00:00+00:00"),
    ];
    std::fs::write(&history, format!("{}\n", lines.join("\n"))).unwrap();

    beacon()
        .args(["trends", "--history"])
        .arg(&history)
        .assert()
        .success()
        // relevancy up 20%, rag time doubled
        .stderr(predicate::str::contains("+20.0%"))
        .stderr(predicate::str::contains("+100.0%"))
        // one data point: no trend row
        .stderr(predicate::str::contains("single run").not());
}

#[test]
fn trends_on_empty_history_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("missing.jsonl");

    beacon()
        .args(["trends", "--history"])
        .arg(&history)
        .assert()
        .success()
        .stderr(predicate::str::contains("no trends yet"));
}

#[test]
fn corrupt_history_is_fatal_for_trends() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("history.jsonl");
    std::fs::write(&history, "{not json}\n").unwrap();

    beacon()
        .args(["trends", "--history"])
        .arg(&history)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("corrupt history entry"));
}

#[test]
fn history_dumps_records_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("history.jsonl");
    std::fs::write(
        &history,
        format!(
            "{}\n",
            history_line("hi", 0.5, 1.0, "2025-01-01T00:00:00+00:00")
        ),
    )
    .unwrap();

    beacon()
        .args(["history", "--history"])
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""question":"hi""#));
}
