//! Integration tests for the tikkun CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Copy of the fixture book that a test may rewrite
fn scratch_book(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("book.json");
    fs::copy(fixture_path("book.json"), &path).unwrap();
    path
}

fn tikkun() -> Command {
    let mut cmd = Command::cargo_bin("tikkun").unwrap();
    cmd.env_remove("TIKKUN_CONFIG");
    cmd
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_diff_text_output() {
    tikkun()
        .arg("diff")
        .arg("--before")
        .arg(fixture_path("before.txt"))
        .arg("--after")
        .arg(fixture_path("after.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("שלום → שָׁלוֹם  [vowelization]"))
        .stdout(predicate::str::contains("2 → שניים  [expansion]"))
        .stdout(predicate::str::contains("Total changes: 2"));
}

#[test]
fn test_diff_json_output() {
    let output = tikkun()
        .arg("diff")
        .arg("-b")
        .arg(fixture_path("before.txt"))
        .arg("-a")
        .arg(fixture_path("after.txt"))
        .arg("-f")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let changes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let changes = changes.as_array().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0]["originalWord"], "שלום");
    assert_eq!(changes[0]["fixType"], "vowelization");
}

#[test]
fn test_diff_legacy_classifier() {
    tikkun()
        .arg("diff")
        .arg("-b")
        .arg(fixture_path("before.txt"))
        .arg("-a")
        .arg(fixture_path("after.txt"))
        .arg("--legacy")
        .assert()
        .success()
        .stdout(predicate::str::contains("[niqqud_addition]"));
}

#[test]
fn test_diff_identical_texts() {
    tikkun()
        .arg("diff")
        .arg("-b")
        .arg(fixture_path("before.txt"))
        .arg("-a")
        .arg(fixture_path("before.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes found"));
}

#[test]
fn test_classify_pair() {
    tikkun()
        .args(["classify", "שלום", "שָׁלוֹם"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix type:   vowelization"))
        .stdout(predicate::str::contains("Reason:     vowel points added"));
}

#[test]
fn test_classify_with_legacy_config() {
    tikkun()
        .arg("--config")
        .arg(fixture_path("legacy-config.toml"))
        .args(["classify", "שלום", "שָׁלוֹם"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix type:   niqqud_addition"));
}

#[test]
fn test_invalid_config_is_reported() {
    tikkun()
        .arg("--config")
        .arg(fixture_path("invalid-config.toml"))
        .args(["classify", "א", "ב"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_scan_excludes_source_paragraph() {
    tikkun()
        .arg("scan")
        .arg("--book")
        .arg(fixture_path("book.json"))
        .args(["--from", "שלום", "--to", "שָׁלוֹם", "--exclude", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 occurrence(s) in 2 paragraph(s)"))
        .stdout(predicate::str::contains("p2 (page 1, paragraph 2)"))
        .stdout(predicate::str::contains("p3 (page 2, paragraph 1)"))
        .stdout(predicate::str::contains("p1 (").not());
}

#[test]
fn test_scan_respects_prefix_policy() {
    tikkun()
        .arg("scan")
        .arg("-b")
        .arg(fixture_path("book.json"))
        .args(["--from", "ילד", "--to", "יֶלֶד"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No other occurrences found"));

    tikkun()
        .arg("scan")
        .arg("-b")
        .arg(fixture_path("book.json"))
        .args(["--from", "ילד", "--to", "יֶלֶד", "--allow-prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p1 (page 1, paragraph 1)"))
        .stdout(predicate::str::contains("p3 (").not());
}

#[test]
fn test_scan_json_output() {
    let output = tikkun()
        .arg("scan")
        .arg("-b")
        .arg(fixture_path("book.json"))
        .args(["--from", "שלום", "--to", "שָׁלוֹם", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let suggestions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(suggestions[0]["fixType"], "vowelization");
    assert_eq!(suggestions[0]["paragraphs"].as_array().unwrap().len(), 3);
}

#[test]
fn test_apply_all_rewrites_book() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);

    tikkun()
        .arg("apply")
        .arg("--book")
        .arg(&book)
        .args(["--from", "שלום", "--to", "שָׁלוֹם", "--all", "--exclude", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated paragraphs: p2, p3"))
        .stdout(predicate::str::contains("Corrections recorded: 2"));

    let saved = read_json(&book);
    assert_eq!(saved["paragraphs"][0]["content"], "שלום לכולם, אמר הילד.");
    assert_eq!(
        saved["paragraphs"][1]["content"],
        "הילד ענה שָׁלוֹם וחייך. וילד אחר שתק."
    );
    assert_eq!(saved["paragraphs"][2]["content"], "ילדים רבים אמרו שָׁלוֹם.");

    let corrections = saved["corrections"].as_array().unwrap();
    assert_eq!(corrections.len(), 2);
    assert_eq!(corrections[0]["paragraphId"], "p2");
    assert_eq!(corrections[0]["aggregationKey"], "שלום|שָׁלוֹם");
    assert_eq!(corrections[0]["ttsModel"], "he-narrator-v2");
    assert_eq!(corrections[0]["ttsVoice"], "dana");
}

#[test]
fn test_apply_selected_paragraph_only() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);

    tikkun()
        .arg("apply")
        .arg("-b")
        .arg(&book)
        .args(["--from", "שלום", "--to", "שָׁלוֹם", "-p", "p3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated paragraphs: p3"));

    let saved = read_json(&book);
    assert_eq!(
        saved["paragraphs"][1]["content"],
        "הילד ענה שלום וחייך. וילד אחר שתק."
    );
    assert_eq!(saved["corrections"].as_array().unwrap().len(), 1);
}

#[test]
fn test_apply_reports_missing_paragraph() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);
    let before = fs::read_to_string(&book).unwrap();

    tikkun()
        .arg("apply")
        .arg("-b")
        .arg(&book)
        .args(["--from", "שלום", "--to", "שָׁלוֹם", "-p", "p9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No paragraphs updated"))
        .stdout(predicate::str::contains("Missing paragraphs: p9"));

    assert_eq!(fs::read_to_string(&book).unwrap(), before);
}

#[test]
fn test_apply_dry_run_leaves_book() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);
    let before = fs::read_to_string(&book).unwrap();

    tikkun()
        .arg("apply")
        .arg("-b")
        .arg(&book)
        .args(["--from", "שלום", "--to", "שָׁלוֹם", "-p", "p2", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p2 (page 1, paragraph 2)"))
        .stdout(predicate::str::contains("p3 (").not());

    assert_eq!(fs::read_to_string(&book).unwrap(), before);
}

#[test]
fn test_apply_requires_targets() {
    tikkun()
        .arg("apply")
        .arg("-b")
        .arg(fixture_path("book.json"))
        .args(["--from", "שלום", "--to", "שָׁלוֹם"])
        .assert()
        .failure();
}

#[test]
fn test_apply_all_without_occurrences() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);

    tikkun()
        .arg("apply")
        .arg("-b")
        .arg(&book)
        .args(["--from", "חתול", "--to", "חָתוּל", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to apply"));
}

#[test]
fn test_edit_records_corrections() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);

    tikkun()
        .arg("edit")
        .arg("--book")
        .arg(&book)
        .args(["--paragraph", "p1", "--content"])
        .arg(fixture_path("p1-edited.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("שלום → שָׁלוֹם  [vowelization]"));

    let saved = read_json(&book);
    assert_eq!(saved["paragraphs"][0]["content"], "שָׁלוֹם לכולם, אמר הילד.");
    let corrections = saved["corrections"].as_array().unwrap();
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0]["paragraphId"], "p1");
    assert_eq!(corrections[0]["fixType"], "vowelization");
}

#[test]
fn test_edit_unknown_paragraph() {
    let dir = TempDir::new().unwrap();
    let book = scratch_book(&dir);

    tikkun()
        .arg("edit")
        .arg("-b")
        .arg(&book)
        .args(["-p", "p9", "-c"])
        .arg(fixture_path("p1-edited.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown paragraph: p9"));
}

#[test]
fn test_missing_book_file() {
    tikkun()
        .arg("scan")
        .arg("-b")
        .arg("no-such-book.json")
        .args(["--from", "א", "--to", "ב"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found: no-such-book.json"));
}

#[test]
fn test_list_fix_types() {
    tikkun()
        .args(["list", "fix-types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("niqqud_addition"))
        .stdout(predicate::str::contains("dialogue_marking"));
}

#[test]
fn test_list_fix_types_json() {
    let output = tikkun()
        .args(["list", "fix-types", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 16);
}

#[test]
fn test_help_lists_commands() {
    tikkun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("apply"));
}
