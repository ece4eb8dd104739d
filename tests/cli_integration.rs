//! Integration tests for the `tk` CLI.
//!
//! Each test creates a temp directory with a task list, runs `tk` as a
//! subprocess, and verifies stdout and/or the stored files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `tk` binary.
fn tk_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tk");
    path
}

/// Run `tk` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tk(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tk_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tk");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tk` expecting success, return stdout.
fn run_tk_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tk(dir, args);
    if !success {
        panic!("tk {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    }
    stdout
}

/// Create a task list with a legacy (bare array) payload.
fn create_test_list(root: &Path) {
    run_tk_ok(root, &["init"]);
    fs::write(
        root.join(".tickoff/tasks.json"),
        r#"[
  {"id": 1, "text": "File taxes", "deadline": "2020-04-15", "completed": false, "completedAt": ""},
  {"id": 2, "text": "Renew passport", "deadline": "2099-06-01", "completed": false, "completedAt": ""},
  {"id": 3, "text": "Water plants", "deadline": "", "completed": true, "completedAt": "2024-01-02T09:00:00.000Z"},
  {"id": 4, "text": "Book dentist", "deadline": "2099-01-20", "completed": false}
]"#,
    )
    .unwrap();
}

fn stored(root: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(root.join(".tickoff/tasks.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn stored_texts(root: &Path) -> Vec<String> {
    stored(root)["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn test_init_and_empty_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tk_ok(tmp.path(), &["init"]);
    assert!(out.contains("Initialized"));
    assert!(tmp.path().join(".tickoff/config.toml").exists());

    let out = run_tk_ok(tmp.path(), &["list"]);
    assert!(out.contains("(nothing to show)"));
}

#[test]
fn test_commands_outside_list_fail() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tk(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("tk init"));
}

#[test]
fn test_project_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let list_dir = tmp.path().join("list");
    fs::create_dir_all(&list_dir).unwrap();
    create_test_list(&list_dir);

    let out = run_tk_ok(tmp.path(), &["-C", "list", "list"]);
    assert!(out.contains("File taxes"));
}

// ---------------------------------------------------------------------------
// Adding and editing
// ---------------------------------------------------------------------------

#[test]
fn test_add_prints_id_and_persists() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["add", "  Call plumber ", "--due", "2099-02-01"]);
    assert_eq!(out.trim(), "5");

    let value = stored(tmp.path());
    assert_eq!(value["version"], 2);
    let last = value["tasks"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["id"], 5);
    assert_eq!(last["text"], "Call plumber");
    assert_eq!(last["deadline"], "2099-02-01");
    assert_eq!(last["completed"], false);
    assert_eq!(last["completedAt"], "");
}

#[test]
fn test_add_blank_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let before = fs::read_to_string(tmp.path().join(".tickoff/tasks.json")).unwrap();

    let (_, stderr, success) = run_tk(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("cannot be empty"));
    let after = fs::read_to_string(tmp.path().join(".tickoff/tasks.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_add_malformed_deadline_warns() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let (_, stderr, success) = run_tk(tmp.path(), &["add", "Vague", "--due", "next week"]);
    assert!(success);
    assert!(stderr.contains("warning"));
}

#[test]
fn test_edit_text_and_blank_edit() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["edit", "2", "Renew passport and ID"]);
    assert!(out.contains("text updated"));
    let out = run_tk_ok(tmp.path(), &["edit", "2", "   "]);
    assert!(out.contains("unchanged"));

    assert_eq!(stored_texts(tmp.path())[1], "Renew passport and ID");
}

#[test]
fn test_due_set_and_clear() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["due", "3", "2099-03-04"]);
    assert!(out.contains("04.03.2099"));
    assert_eq!(stored(tmp.path())["tasks"][2]["deadline"], "2099-03-04");

    let out = run_tk_ok(tmp.path(), &["due", "3"]);
    assert!(out.contains("cleared"));
    assert_eq!(stored(tmp.path())["tasks"][2]["deadline"], "");
}

#[test]
fn test_unknown_id_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let (_, stderr, success) = run_tk(tmp.path(), &["done", "42"]);
    assert!(!success);
    assert!(stderr.contains("task not found: 42"));

    let (_, stderr, success) = run_tk(tmp.path(), &["done", "abc"]);
    assert!(!success);
    assert!(stderr.contains("invalid task id"));
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn test_done_and_undo() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_tk_ok(tmp.path(), &["done", "1"]);
    let task = stored(tmp.path())["tasks"][0].clone();
    assert_eq!(task["completed"], true);
    assert!(!task["completedAt"].as_str().unwrap().is_empty());

    let out = run_tk_ok(tmp.path(), &["done", "1"]);
    assert!(out.contains("already completed"));

    run_tk_ok(tmp.path(), &["undo", "1"]);
    let task = stored(tmp.path())["tasks"][0].clone();
    assert_eq!(task["completed"], false);
    assert_eq!(task["completedAt"], "");
}

#[test]
fn test_toggle() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tk_ok(tmp.path(), &["toggle", "3"]);
    assert!(out.contains("3 reopened"));
    let out = run_tk_ok(tmp.path(), &["toggle", "3"]);
    assert!(out.contains("3 completed"));
}

// ---------------------------------------------------------------------------
// Deleting
// ---------------------------------------------------------------------------

#[test]
fn test_rm_logs_deleted_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["rm", "2"]);
    assert!(out.contains("2 deleted"));
    assert!(!stored_texts(tmp.path()).contains(&"Renew passport".to_string()));

    let out = run_tk_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("[delete] task 2 deleted"));
    assert!(out.contains("Renew passport"));
}

#[test]
fn test_rm_unknown_is_noop() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tk_ok(tmp.path(), &["rm", "99"]);
    assert!(out.contains("nothing deleted"));
    assert_eq!(stored_texts(tmp.path()).len(), 4);
}

// ---------------------------------------------------------------------------
// Listing, filters, periods
// ---------------------------------------------------------------------------

#[test]
fn test_list_marks_overdue_and_completed() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["list"]);
    assert!(out.contains("[ ]!1 File taxes  (due 15.04.2020)"));
    assert!(out.contains("[ ] 2 Renew passport  (due 01.06.2099)"));
    assert!(out.contains("[x] 3 Water plants  (no deadline)"));
}

#[test]
fn test_list_status_override() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["list", "--status", "active"]);
    assert!(out.contains("File taxes"));
    assert!(!out.contains("Water plants"));

    let out = run_tk_ok(tmp.path(), &["list", "--status", "completed"]);
    assert!(out.contains("Water plants"));
    assert!(!out.contains("File taxes"));
}

#[test]
fn test_filter_is_remembered() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_tk_ok(tmp.path(), &["filter", "completed"]);
    let out = run_tk_ok(tmp.path(), &["list"]);
    assert!(out.contains("== completed tasks =="));
    assert!(out.contains("Water plants"));
    assert!(!out.contains("File taxes"));

    let out = run_tk_ok(tmp.path(), &["list", "--all"]);
    assert!(out.contains("File taxes"));
}

#[test]
fn test_period_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_tk_ok(tmp.path(), &["period", "--from", "2099-01-01", "--to", "2099-01-31"]);
    let out = run_tk_ok(tmp.path(), &["list"]);
    assert!(out.contains("Book dentist"));
    assert!(!out.contains("Renew passport"));
    assert!(!out.contains("Water plants"));

    run_tk_ok(tmp.path(), &["period", "--reset"]);
    let out = run_tk_ok(tmp.path(), &["period"]);
    assert!(out.contains("no period set"));
    let out = run_tk_ok(tmp.path(), &["list"]);
    assert!(out.contains("Water plants"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_tk_ok(tmp.path(), &["list", "--json", "--from", "2000-01-01"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["filter"], "all");
    assert_eq!(parsed["period"]["from"], "2000-01-01");
    let tasks = parsed["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["overdue"], true);
    assert_eq!(tasks[1]["overdue"], false);
}

#[test]
fn test_show_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tk_ok(tmp.path(), &["show", "3", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["text"], "Water plants");
    assert_eq!(parsed["completedAt"], "2024-01-02T09:00:00.000Z");
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[test]
fn test_sort_default_descending() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    run_tk_ok(tmp.path(), &["sort"]);
    assert_eq!(
        stored_texts(tmp.path()),
        vec!["Renew passport", "Book dentist", "File taxes", "Water plants"]
    );
}

#[test]
fn test_sort_ascending_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tk_ok(tmp.path(), &["sort", "--asc"]);
    assert!(out.contains("(asc)"));
    assert_eq!(
        stored_texts(tmp.path()),
        vec!["File taxes", "Book dentist", "Renew passport", "Water plants"]
    );
}

#[test]
fn test_sort_direction_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    fs::write(
        tmp.path().join(".tickoff/config.toml"),
        "[sort]\ndirection = \"asc\"\n",
    )
    .unwrap();
    run_tk_ok(tmp.path(), &["sort"]);
    assert_eq!(stored_texts(tmp.path())[0], "File taxes");
}

// ---------------------------------------------------------------------------
// Storage failures, stats, watch
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_storage_starts_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tk_ok(tmp.path(), &["init"]);
    fs::write(tmp.path().join(".tickoff/tasks.json"), "\"not an array\"").unwrap();

    let out = run_tk_ok(tmp.path(), &["list"]);
    assert!(out.contains("(nothing to show)"));

    let out = run_tk_ok(tmp.path(), &["recovery", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["category"], "load");
    assert_eq!(parsed[0]["body"], "\"not an array\"");
}

#[test]
fn test_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_tk_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total"], 4);
    assert_eq!(parsed["completed"], 1);
    assert_eq!(parsed["overdue"], 1);
    assert_eq!(parsed["visible"], 4);
}

#[test]
fn test_watch_single_tick_does_not_write() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let before = fs::read_to_string(tmp.path().join(".tickoff/tasks.json")).unwrap();

    let out = run_tk_ok(tmp.path(), &["watch", "--count", "1"]);
    assert!(out.starts_with("\x1b[2J"));
    assert!(out.contains("File taxes"));
    assert!(out.contains("4 tasks"));

    let after = fs::read_to_string(tmp.path().join(".tickoff/tasks.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_recovery_prune_all() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    run_tk_ok(tmp.path(), &["rm", "1"]);
    let out = run_tk_ok(tmp.path(), &["recovery", "prune", "--all"]);
    assert!(out.contains("removed 1"));
    let out = run_tk_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("recovery log is empty"));
}
