use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("habit-{nanos}-{file_name}"))
}

fn habit(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("habit").unwrap();
    cmd.env("HABIT_STORE_PATH", store)
        .env("HABIT_CONFIG_PATH", store.with_extension("config.json"));
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let assert = cmd.assert().success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

#[test]
fn several_titles_share_the_bulk_status() {
    let store = temp_path("board-bulk.json");

    let created = json_stdout(habit(&store).args([
        "--json",
        "board",
        "add",
        "Outline",
        "Draft\nReview",
        "--status",
        "in-progress",
    ]));
    let created = created.as_array().unwrap().clone();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|task| task["status"] == "IN_PROGRESS"));
    assert_eq!(created[2]["title"], "Review");

    let id = created[0]["id"].as_str().unwrap().to_string();
    let moved = json_stdout(habit(&store).args(["--json", "board", "move", &id, "done"]));
    assert_eq!(moved["status"], "COMPLETED");

    let board = json_stdout(habit(&store).args(["--json", "board", "show"]));
    std::fs::remove_file(&store).ok();

    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[1]["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(columns[3]["tasks"][0]["title"], "Outline");
}

#[test]
fn single_title_defaults_to_not_started() {
    let store = temp_path("board-single.json");

    habit(&store)
        .args(["board", "add", "Plan week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan week | Not Started"));

    habit(&store)
        .args(["board", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not Started (1)"))
        .stdout(predicate::str::contains("Completed (0)"));

    std::fs::remove_file(&store).ok();
}

#[test]
fn blank_titles_are_rejected() {
    let store = temp_path("board-blank.json");

    habit(&store)
        .args(["board", "add", " ", "\n"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: invalid_input - title is required"));

    assert!(!store.exists());
}
