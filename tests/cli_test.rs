// Command line tests for the refgraph binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn corpus() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("corpus")
}

fn refgraph(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("refgraph").unwrap();
    cmd.current_dir(workdir.path()).env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    refgraph(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("refgraph "));
}

#[test]
fn test_build_html() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("graph.html");

    refgraph(&dir)
        .arg("build")
        .arg(corpus())
        .arg("--output")
        .arg(&out)
        .arg("--no-open")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph complete: 4 papers, 1 links"))
        .stdout(predicate::str::contains("truncated.grobid.tei.xml"));

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("Attention Is All You Need"));
}

#[test]
fn test_build_json_indexed() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("graph.json");

    refgraph(&dir)
        .args(["build", "--format", "json", "--indexed", "--no-open", "-o"])
        .arg(&out)
        .arg(corpus())
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["edges"].as_array().unwrap().len(), 1);
}

#[test]
fn test_build_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("from-config.json");
    fs::write(
        dir.path().join("refgraph.toml"),
        format!(
            "[input]\ndirectory = {:?}\n\n[output]\npath = {:?}\nformat = \"json\"\nopen = false\n",
            corpus().display().to_string(),
            out.display().to_string()
        ),
    )
    .unwrap();

    refgraph(&dir).arg("build").assert().success();
    assert!(out.exists());
}

#[test]
fn test_build_empty_directory_fails() {
    let dir = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    let out = dir.path().join("graph.html");

    refgraph(&dir)
        .arg("build")
        .arg(empty.path())
        .arg("--output")
        .arg(&out)
        .arg("--no-open")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No papers could be extracted"));

    assert!(!out.exists());
}

#[test]
fn test_build_unknown_format_fails() {
    let dir = TempDir::new().unwrap();
    refgraph(&dir)
        .arg("build")
        .arg(corpus())
        .args(["--format", "svg", "--no-open"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn test_extract_prints_records() {
    let dir = TempDir::new().unwrap();
    refgraph(&dir)
        .arg("extract")
        .arg(corpus())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Attention Is All You Need\""))
        .stdout(predicate::str::contains("\"failures\""));
}
