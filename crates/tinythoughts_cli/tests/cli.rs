use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn tinythoughts(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tinythoughts").unwrap();
    cmd.env("TINYTHOUGHTS_DB_PATH", home.join("store.sqlite3"))
        .env("TINYTHOUGHTS_LOG_DIR", home.join("logs"))
        .env("TINYTHOUGHTS_LOG_LEVEL", "info");
    cmd
}

fn json(cmd: &mut Command, args: &[&str]) -> Value {
    let output = cmd.args(args).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[test]
fn collection_add_then_list_shows_it_with_zero_threads() {
    let home = tempfile::tempdir().unwrap();

    let created = json(
        &mut tinythoughts(home.path()),
        &["collections", "add", "Inbox", "--summary", "loose ends"],
    );
    assert_eq!(created["name"], "Inbox");
    assert_eq!(created["creation_date"], created["last_modified"]);

    let listed = json(&mut tinythoughts(home.path()), &["collections", "list"]);
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Inbox");
    assert_eq!(rows[0]["summary"], "loose ends");
    assert_eq!(rows[0]["thread_count"], 0);
}

#[test]
fn blank_collection_name_fails_without_writing() {
    let home = tempfile::tempdir().unwrap();

    tinythoughts(home.path())
        .args(["collections", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    let listed = json(&mut tinythoughts(home.path()), &["collections", "list"]);
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn thoughts_append_and_reorder_through_the_cli() {
    let home = tempfile::tempdir().unwrap();
    let collection = id_of(&json(
        &mut tinythoughts(home.path()),
        &["collections", "add", "Work"],
    ));
    let thread = id_of(&json(
        &mut tinythoughts(home.path()),
        &["threads", "add", "Standup", "--collection", &collection],
    ));

    let mut ids = Vec::new();
    for (expected, content) in ["first", "second", "third"].into_iter().enumerate() {
        let thought = json(
            &mut tinythoughts(home.path()),
            &["thoughts", "add", content, "--thread", &thread],
        );
        assert_eq!(thought["position"], expected as i64);
        ids.push(id_of(&thought));
    }

    let reordered = json(
        &mut tinythoughts(home.path()),
        &["thoughts", "reorder", &ids[2], &ids[0], &ids[1]],
    );
    let positions: Vec<(String, i64)> = reordered
        .as_array()
        .unwrap()
        .iter()
        .map(|row| (id_of(row), row["position"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        positions,
        vec![(ids[2].clone(), 0), (ids[0].clone(), 1), (ids[1].clone(), 2)]
    );

    let listed = json(
        &mut tinythoughts(home.path()),
        &["thoughts", "list", "--thread", &thread],
    );
    let contents: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["third", "first", "second"]);
}

#[test]
fn deleting_a_collection_removes_its_threads() {
    let home = tempfile::tempdir().unwrap();
    let collection = id_of(&json(
        &mut tinythoughts(home.path()),
        &["collections", "add", "Temp"],
    ));
    let thread = id_of(&json(
        &mut tinythoughts(home.path()),
        &["threads", "add", "Scratch", "--collection", &collection],
    ));
    json(
        &mut tinythoughts(home.path()),
        &["thoughts", "add", "note", "--thread", &thread],
    );

    let deleted = json(
        &mut tinythoughts(home.path()),
        &["collections", "rm", &collection],
    );
    assert_eq!(deleted["deleted"], 1);

    let threads = json(&mut tinythoughts(home.path()), &["threads", "list"]);
    assert!(threads.as_array().unwrap().is_empty());
    let thoughts = json(&mut tinythoughts(home.path()), &["thoughts", "list"]);
    assert!(thoughts.as_array().unwrap().is_empty());
}

#[test]
fn seed_reports_generated_rows() {
    let home = tempfile::tempdir().unwrap();

    let report = json(&mut tinythoughts(home.path()), &["seed", "--seed", "7"]);
    assert_eq!(report["collections"], 3);
    assert_eq!(report["threads"], 9);

    let threads = json(&mut tinythoughts(home.path()), &["threads", "list"]);
    assert_eq!(threads.as_array().unwrap().len(), 9);
}

#[test]
fn db_flag_overrides_environment() {
    let home = tempfile::tempdir().unwrap();
    let other = home.path().join("nested").join("other.sqlite3");

    tinythoughts(home.path())
        .args(["--db", other.to_str().unwrap(), "collections", "add", "Elsewhere"])
        .assert()
        .success();

    assert!(other.exists());
    let default_store = json(&mut tinythoughts(home.path()), &["collections", "list"]);
    assert!(default_store.as_array().unwrap().is_empty());
}

#[test]
fn repeated_ids_are_counted_once_on_delete() {
    let home = tempfile::tempdir().unwrap();
    let collection = id_of(&json(
        &mut tinythoughts(home.path()),
        &["collections", "add", "Twice"],
    ));

    let deleted = json(
        &mut tinythoughts(home.path()),
        &["collections", "rm", &collection, &collection],
    );
    assert_eq!(deleted["deleted"], 1);
}

#[test]
fn seeding_twice_reports_skip() {
    let home = tempfile::tempdir().unwrap();

    let first = json(&mut tinythoughts(home.path()), &["seed"]);
    assert_eq!(first["skipped"], false);

    let second = json(&mut tinythoughts(home.path()), &["seed"]);
    assert_eq!(second["skipped"], true);
    assert_eq!(second["collections"], 0);

    let listed = json(&mut tinythoughts(home.path()), &["collections", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 3);
}
