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
fn task_defaults_to_today_and_routine() {
    let store = temp_path("task-defaults.json");
    let today = habit_core::calendar::format_date(habit_core::calendar::today()).unwrap();

    let task = json_stdout(habit(&store).args(["--json", "task", "add", "Water plants"]));
    std::fs::remove_file(&store).ok();

    assert_eq!(task["dueDate"], today.as_str());
    assert_eq!(task["category"], "routine");
    assert_eq!(task["completed"], false);
    assert!(task.get("time").is_none());
}

#[test]
fn toggle_reschedule_and_list_by_date() {
    let store = temp_path("task-flow.json");

    let task = json_stdout(habit(&store).args([
        "--json",
        "task",
        "add",
        "File taxes",
        "--due",
        "2025-12-20",
        "--category",
        "task",
    ]));
    let id = task["id"].as_str().unwrap().to_string();

    let toggled = json_stdout(habit(&store).args(["--json", "task", "toggle", &id]));
    assert_eq!(toggled["completed"], true);

    habit(&store)
        .args(["task", "reschedule", &id, "2025-12-22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("to 2025-12-22"));

    let moved_day = json_stdout(habit(&store).args(["--json", "task", "list", "--date", "2025-12-22"]));
    let old_day = json_stdout(habit(&store).args(["--json", "task", "list", "--date", "2025-12-20"]));

    habit(&store)
        .args(["task", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Deleted task: File taxes"));
    std::fs::remove_file(&store).ok();

    assert_eq!(moved_day.as_array().unwrap().len(), 1);
    assert_eq!(moved_day[0]["completed"], true);
    assert_eq!(moved_day[0]["category"], "task");
    assert!(old_day.as_array().unwrap().is_empty());
}

#[test]
fn unknown_category_is_a_parse_error() {
    let store = temp_path("task-category.json");

    habit(&store)
        .args(["task", "add", "Walk", "--category", "chore"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: invalid_input"));

    assert!(!store.exists());
}

#[test]
fn reschedule_unknown_task_is_not_found() {
    let store = temp_path("task-missing.json");

    habit(&store)
        .args(["task", "reschedule", "nope", "2025-12-22"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: not_found"));

    std::fs::remove_file(&store).ok();
}
