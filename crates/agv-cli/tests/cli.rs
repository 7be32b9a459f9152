use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn agv(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("agv").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn empty_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn extract_writes_one_row_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(
        docs.join("move.txt"),
        "Abmessungen: 1500 x 800 x 1200 mm\nTragfähigkeit: 500 kg\n",
    )
    .unwrap();
    fs::write(docs.join("empty.txt"), "nothing useful here\n").unwrap();
    let output = dir.path().join("specs.csv");

    agv(&config)
        .args(["extract", "--input"])
        .arg(&docs)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 documents"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("document_id,tool_trace,device_name"));
    assert!(lines[0].contains("evidence_payload_kg"));
    assert!(lines[1].starts_with("empty.txt,"));
    assert!(lines[2].starts_with("move.txt,key_value,"));
    assert!(lines[2].contains(",1500,800,1200,500,"));
}

#[test]
fn extract_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());

    agv(&config)
        .args(["extract", "--input"])
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn extract_rejects_bad_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());

    agv(&config)
        .args(["extract", "--input"])
        .arg(dir.path())
        .args(["--min-completeness", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_completeness"));
}

#[test]
fn config_path_uses_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.json");

    agv(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn config_init_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("agv.json");

    agv(&config).args(["config", "init"]).assert().success();
    agv(&config)
        .args(["config", "get", "orchestration.max_steps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4"));
    agv(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
