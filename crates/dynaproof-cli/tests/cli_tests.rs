//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the caller's config files and environment.
fn dynaproof(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("dynaproof").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("DYNAPROOF_DATA_DIR")
        .env_remove("DYNAPROOF_SEED")
        .arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--seed")
        .arg("42");
    cmd
}

fn start(dir: &Path) -> String {
    let output = dynaproof(dir)
        .args(["start", "--name", "Ada", "--surname", "Kaya", "--class", "7-A"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Learner ID: "))
        .expect("learner id in output")
        .trim()
        .to_string()
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    dynaproof(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiz"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn start_prints_learner_id() {
    let dir = TempDir::new().unwrap();
    let id = start(dir.path());
    assert_eq!(id.len(), 8);
    assert!(dir.path().join("data").join("learners.json").exists());
}

#[test]
fn question_then_answer() {
    let dir = TempDir::new().unwrap();
    let id = start(dir.path());

    dynaproof(dir.path())
        .args(["question", "--learner", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/10 [basic]"))
        .stdout(predicate::str::contains("adım adım açıkla"));

    dynaproof(dir.path())
        .args([
            "answer",
            "--learner",
            &id,
            "--text",
            "çünkü payda eşitlenir ve sonuç bulunur",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 100/100 (excellent)"))
        .stdout(predicate::str::contains("1/10 answered"));

    dynaproof(dir.path())
        .args(["question", "--learner", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2/10"));
}

#[test]
fn answer_without_question_fails() {
    let dir = TempDir::new().unwrap();
    let id = start(dir.path());

    dynaproof(dir.path())
        .args(["answer", "--learner", &id, "--text", "bilmiyorum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: no current question"));
}

#[test]
fn unknown_learner_fails_with_hint() {
    let dir = TempDir::new().unwrap();

    dynaproof(dir.path())
        .args(["question", "--learner", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dynaproof start"))
        .stderr(predicate::str::contains("deadbeef"));
}

#[test]
fn summary_shows_table() {
    let dir = TempDir::new().unwrap();
    let id = start(dir.path());

    dynaproof(dir.path())
        .args(["question", "--learner", &id])
        .assert()
        .success();
    dynaproof(dir.path())
        .args(["answer", "--learner", &id, "--text", "bilmiyorum"])
        .assert()
        .success();

    dynaproof(dir.path())
        .args(["summary", "--learner", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Kaya (7-A): 1 answered, mean 20.0"))
        .stdout(predicate::str::contains("rational"));
}

#[test]
fn quiz_runs_full_session_from_stdin() {
    let dir = TempDir::new().unwrap();
    let answers = "çünkü payda eşitlenir ve sonuç bulunur\n".repeat(10);

    dynaproof(dir.path())
        .args(["quiz", "--name", "Ada", "--surname", "Kaya", "--class", "7-A"])
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 10/10"))
        .stdout(predicate::str::contains("Session complete."))
        .stdout(predicate::str::contains("10 answered, mean 100.0"));
}

#[test]
fn report_writes_html_and_json() {
    let dir = TempDir::new().unwrap();
    dynaproof(dir.path())
        .args(["quiz", "--name", "Ada", "--surname", "Kaya", "--class", "7-A"])
        .write_stdin("payda ve pay\nbilmiyorum\n")
        .assert()
        .success();

    let html = dir.path().join("out.html");
    dynaproof(dir.path())
        .args(["report", "--output"])
        .arg(&html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Kaya"));
    assert!(std::fs::read_to_string(&html).unwrap().contains("<html"));

    dynaproof(dir.path())
        .args(["report", "--format", "json"])
        .assert()
        .success();
    let json = std::fs::read_to_string(dir.path().join("data").join("report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_answers"], 2);
}

#[test]
fn report_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    dynaproof(dir.path())
        .args(["report", "--format", "xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    dynaproof(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created dynaproof.toml"));

    let content = std::fs::read_to_string(dir.path().join("dynaproof.toml")).unwrap();
    assert!(content.contains("[scoring]"));

    dynaproof(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    dynaproof(dir.path())
        .args(["--config", "nope.toml", "summary", "--learner", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
