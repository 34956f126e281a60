#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn notebook_cmd(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("notebook"));
    cmd.env_remove("NOTEBOOK_LOG")
        .env("NOTEBOOK_DATA_DIR", data_dir.path().as_os_str());
    cmd
}

fn saved_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let start = text.rfind('(').expect("id in output") + 1;
    let end = text.rfind(')').expect("id in output");
    text[start..end].to_string()
}

#[test]
fn test_save_list_show_delete_workflow() {
    let data = TempDir::new().unwrap();
    let content = r#"{"type":"doc","content":[{"type":"paragraph"}]}"#;

    // 1. Save from stdin
    let output = notebook_cmd(&data)
        .args(["save", "--name", "Shopping"])
        .write_stdin(content)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Shopping"))
        .get_output()
        .stdout
        .clone();
    let id = saved_id(&output);

    // Layout on disk
    assert!(data.path().join("documents").join(&id).join("meta.json").exists());
    assert!(data.path().join("documents").join(&id).join("document.json").exists());

    // 2. List
    notebook_cmd(&data)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shopping"));

    // 3. Show
    notebook_cmd(&data)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"paragraph\""));

    // 4. Delete
    notebook_cmd(&data)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    notebook_cmd(&data)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents."));

    notebook_cmd(&data)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document not available"));
}

#[test]
fn test_save_with_id_updates_in_place() {
    let data = TempDir::new().unwrap();
    let file = data.path().join("content.json");
    fs::write(&file, r#"{"type":"doc"}"#).unwrap();

    for name in ["First", "Second"] {
        notebook_cmd(&data)
            .args(["save", "--id", "fixed-id", "--name", name])
            .arg(&file)
            .assert()
            .success();
    }

    let output = notebook_cmd(&data)
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let metas: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let metas = metas.as_array().unwrap();
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0]["id"], "fixed-id");
    assert_eq!(metas[0]["name"], "Second");
}

#[test]
fn test_invalid_json_is_rejected() {
    let data = TempDir::new().unwrap();
    notebook_cmd(&data)
        .args(["save", "--name", "Bad"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_path_like_id_is_rejected() {
    let data = TempDir::new().unwrap();
    notebook_cmd(&data)
        .args(["save", "--id", "../escape", "--name", "Bad"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid document id"));
}

#[test]
fn test_new_id_prints_uuid() {
    let data = TempDir::new().unwrap();
    notebook_cmd(&data)
        .args(["new-id"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}\n$").unwrap());
}

#[test]
fn test_doctor_recovers_orphan() {
    let data = TempDir::new().unwrap();
    let entry = data.path().join("documents").join("orphan");
    fs::create_dir_all(&entry).unwrap();
    fs::write(entry.join("document.json"), r#"{"type":"doc"}"#).unwrap();

    notebook_cmd(&data)
        .args(["doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 document(s) recovered"));

    notebook_cmd(&data)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovered document"));
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    notebook_cmd(&env_dir)
        .args(["save", "--name", "Here", "--data-dir"])
        .arg(flag_dir.path())
        .write_stdin("{}")
        .assert()
        .success();

    assert!(flag_dir.path().join("documents").exists());
    assert!(!env_dir.path().join("documents").exists());
}
