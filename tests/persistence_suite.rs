use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn run(home: &TempDir, script: &str) -> String {
    let output = Command::cargo_bin("kitty_cli")
        .expect("binary exists")
        .env("KITTY_HOME", home.path())
        .env("KITTY_CLI_SCRIPT", "1")
        .write_stdin(script.to_string())
        .output()
        .expect("run script CLI");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn collections_are_written_under_the_project_directory() {
    let home = TempDir::new().expect("temp home");
    run(
        &home,
        "login A\nentry add income 10 --date 2024-01-01\nbudget set 1 2024 100\ngoal add Fund 50\n",
    );

    let data = home.child("data").child("kitty-local");
    for collection in ["entries.json", "budgets.json", "goals.json"] {
        data.child(collection).assert(predicate::path::is_file());
        data.child(collection)
            .assert(predicate::str::contains("\"schema_version\": 1"));
    }
    data.child("entries.json")
        .assert(predicate::str::contains("\"groupId\": \"default-group\""));
    home.child("config/config.json")
        .assert(predicate::str::contains("\"display_name\": \"A\""));
}

#[test]
fn project_id_selects_a_separate_store() {
    let home = TempDir::new().expect("temp home");
    run(&home, "login A\nentry add income 10 --date 2024-01-01\n");

    let stdout = run(&home, "config set project_id staging\nsummary all\n");
    assert!(stdout.contains("Entries  : 0"), "{stdout}");
    home.child("data/staging").assert(predicate::path::is_dir());

    let stdout = run(&home, "config set project_id ../escape\nconfig set project_id kitty-local\nsummary all\n");
    assert!(stdout.contains("must be a plain name"), "{stdout}");
    assert!(stdout.contains("Entries  : 1"), "{stdout}");
}

#[test]
fn corrupt_collection_reports_load_failure_and_keeps_running() {
    let home = TempDir::new().expect("temp home");
    home.child("data/kitty-local/entries.json")
        .write_str("{ not json")
        .expect("write corrupt file");

    let stdout = run(&home, "summary all\nrefresh\nversion\n");
    assert!(stdout.contains("ERROR: Failed to load data"), "{stdout}");
    assert!(stdout.contains("hint: Use `refresh` to retry."), "{stdout}");
    assert!(stdout.contains("Entries  : 0"), "{stdout}");
    assert!(stdout.contains("=== Kitty"), "{stdout}");
}
