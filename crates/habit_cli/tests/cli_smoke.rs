use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("habit")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("habit"))
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("analysis"));
}

#[test]
fn unknown_subcommand_is_invalid_input() {
    Command::cargo_bin("habit")
        .unwrap()
        .arg("launch")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ERROR: invalid_input"));
}

#[test]
fn unknown_override_key_is_rejected() {
    Command::cargo_bin("habit")
        .unwrap()
        .args(["--config-override", "colour=red", "stats"])
        .env("HABIT_STORE_PATH", std::env::temp_dir().join("habit-unused.json"))
        .env("HABIT_CONFIG_PATH", std::env::temp_dir().join("habit-no-config.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config field"));
}
