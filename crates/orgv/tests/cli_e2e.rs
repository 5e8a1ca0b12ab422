#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn orgv_cmd() -> Command {
    Command::new(cargo_bin("orgv"))
}

fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (name, content) in files {
        let path = temp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    temp
}

#[test]
fn test_list_and_headings() {
    let vault = vault_with(&[
        ("work.org", "* Projects\n** TODO Write report\n"),
        ("notes/ideas.org", "* Someday\n"),
        ("scratch.txt", "not an org file\n"),
    ]);

    orgv_cmd()
        .args(["list", "--vault", vault.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("work.org"))
        .stdout(predicate::str::contains("notes/ideas.org"))
        .stdout(predicate::str::contains("scratch.txt").not());

    orgv_cmd()
        .args([
            "headings",
            "work.org",
            "--vault",
            vault.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Projects"))
        .stdout(predicate::str::contains("TODO Write report"));
}

#[test]
fn test_todo_flip_preserves_untouched_bytes() {
    let text = "Preamble line.\n* Projects\n** TODO Report\nBody with trailing space \n** Other\n";
    let vault = vault_with(&[("work.org", text)]);

    orgv_cmd()
        .args([
            "todo",
            "work.org",
            "DONE",
            "--at",
            "Projects/Report",
            "--vault",
            vault.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated TODO state"));

    let after = fs::read_to_string(vault.path().join("work.org")).unwrap();
    assert_eq!(
        after,
        "Preamble line.\n* Projects\n** DONE Report\nBody with trailing space \n** Other\n"
    );
}

#[test]
fn test_new_add_show_workflow() {
    let vault = vault_with(&[]);
    let root = vault.path().to_str().unwrap().to_string();

    orgv_cmd()
        .args(["new", "inbox.org", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    // Refuses to overwrite.
    orgv_cmd()
        .args(["new", "inbox.org", "--vault", &root])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    orgv_cmd()
        .args([
            "add", "inbox.org", "Capture", "--todo", "TODO", "--assign-id", "--vault", &root,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(":ID:"));

    orgv_cmd()
        .args([
            "show", "inbox.org", "--at", "Capture", "--json", "--vault", &root,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Capture\""))
        .stdout(predicate::str::contains("\"todo\": \"TODO\""));
}

#[test]
fn test_search_and_agenda_across_vault() {
    let vault = vault_with(&[
        ("a.org", "* TODO Buy milk\nSCHEDULED: <2000-01-01>\n"),
        ("b.org", "* Groceries\nRemember the milk run.\n"),
    ]);
    let root = vault.path().to_str().unwrap().to_string();

    orgv_cmd()
        .args(["search", "milk", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.org"))
        .stdout(predicate::str::contains("b.org"));

    orgv_cmd()
        .args(["agenda", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("scheduled 2000-01-01"));

    // Schedule view drops undated items but keeps the dated one.
    orgv_cmd()
        .args(["agenda", "--schedule", "--json", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));
}

#[test]
fn test_json_status_for_writes_and_cat() {
    let vault = vault_with(&[]);
    let root = vault.path().to_str().unwrap().to_string();

    orgv_cmd()
        .args(["new", "inbox.org", "--json", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":\"inbox.org\""));

    orgv_cmd()
        .args(["add", "inbox.org", "Capture", "--assign-id", "--json", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"added\":\"inbox.org\""))
        .stdout(predicate::str::contains("\"id\":\""));

    orgv_cmd()
        .args([
            "todo", "inbox.org", "TODO", "--at", "Capture", "--json", "--vault", &root,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"modified\":\"inbox.org\""));

    orgv_cmd()
        .args(["cat", "inbox.org", "--json", "--vault", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"content\""));
}

#[test]
fn test_missing_locator_and_bad_chain() {
    let vault = vault_with(&[("work.org", "* Projects\n")]);
    let root = vault.path().to_str().unwrap().to_string();

    orgv_cmd()
        .args(["show", "work.org", "--vault", &root])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--at or --id"));

    orgv_cmd()
        .args(["show", "work.org", "--at", "Projects/Nope", "--vault", &root])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nope"));
}
