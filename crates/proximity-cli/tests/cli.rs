//! Command line tests; none of these reach the network

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn proximity(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("proximity").unwrap();
    cmd.env_remove("SEMANTIC_SCHOLAR_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--output-dir")
        .arg(dir.join("out"));
    cmd
}

fn write_graph(dir: &Path) {
    let out = dir.join("out");
    std::fs::create_dir_all(&out).unwrap();
    let graph = serde_json::json!({
        "nodes": ["S", "A", "B", "G", "F"],
        "edges": [
            {"from": "S", "to": "A"},
            {"from": "A", "to": "B"},
            {"from": "B", "to": "G"},
        ],
        "authors": [
            {"author_id": "S", "name": "Seeker", "paper_count": 1, "papers": []}
        ]
    });
    std::fs::write(
        out.join("seeker_S_graph.json"),
        serde_json::to_string_pretty(&graph).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_help_lists_commands() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("circles"))
        .stdout(predicate::str::contains("guides"))
        .stdout(predicate::str::contains("author"));
}

#[test]
fn test_config_path_honors_flag() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempdir().unwrap();

    proximity(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(dir.path().join("config.toml").exists());

    proximity(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    proximity(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();

    proximity(dir.path())
        .env("SEMANTIC_SCHOLAR_API_KEY", "very-secret")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("batch_size = 10"))
        .stdout(predicate::str::contains("very-secret").not());
}

#[test]
fn test_circles_rejects_bad_batch_size() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["circles", "S", "--batch-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch size"));
}

#[test]
fn test_circles_rejects_deep_levels() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["circles", "S", "--levels", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circle level"));
}

#[test]
fn test_circles_rejects_zero_request_rate() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["circles", "S", "--requests-per-second", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requests_per_second"));
}

#[test]
fn test_author_rejects_empty_id() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["author", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_guides_without_graph() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["guides", "S", "G"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No stored graph"));
}

#[test]
fn test_guides_requires_guide() {
    let dir = tempdir().unwrap();
    proximity(dir.path()).args(["guides", "S"]).assert().failure();
}

#[test]
fn test_guides_from_stored_graph() {
    let dir = tempdir().unwrap();
    write_graph(dir.path());

    let output = proximity(dir.path())
        .args(["guides", "S", "G", "F", "X"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["paths"]["G"]["length"], 3);
    assert_eq!(
        report["paths"]["G"]["path"],
        serde_json::json!(["S", "A", "B", "G"])
    );
    let unreachable = report["unreachable"].as_array().unwrap();
    assert_eq!(unreachable.len(), 2);
}

#[test]
fn test_guides_cutoff_and_text() {
    let dir = tempdir().unwrap();
    write_graph(dir.path());

    proximity(dir.path())
        .args(["guides", "S", "G", "--max-hops", "2", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 found"))
        .stdout(predicate::str::contains("G beyond cutoff (3 hops)"));
}

#[test]
fn test_guides_directed_search() {
    let dir = tempdir().unwrap();
    write_graph(dir.path());

    proximity(dir.path())
        .args(["guides", "G", "S", "--directed", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No stored graph"));

    proximity(dir.path())
        .args(["guides", "S", "G", "--directed", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeker [S] -> A -> B -> G"));
}

#[test]
fn test_completions() {
    let dir = tempdir().unwrap();
    proximity(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proximity"));
}
