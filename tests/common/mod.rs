#![allow(dead_code)]

use std::{path::Path, sync::Mutex};

use assert_cmd::Command;
use chrono::NaiveDate;
use kitty::kitty_core::{FixedClock, GroupSession};
use kitty::kitty_domain::UserProfile;
use kitty::kitty_storage_json::{JsonDocumentStore, StoragePaths};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

fn registered_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Store in an isolated directory plus a session pinned to `today`, signed in as `person`.
pub fn setup_session(person: &str, today: NaiveDate) -> (Arc<JsonDocumentStore>, GroupSession) {
    let base = registered_dir();
    let store = Arc::new(
        JsonDocumentStore::new(StoragePaths::under(&base.join("data"))).expect("json store"),
    );
    let mut session = GroupSession::new(
        store.clone(),
        Arc::new(FixedClock::new(today)),
        UserProfile::default(),
    );
    session.sign_in(person).expect("sign in");
    session.refresh().expect("initial fetch");
    (store, session)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs the shell in script mode against a private `KITTY_HOME`.
pub struct CliHarness {
    home: TempDir,
}

impl CliHarness {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("kitty_cli").expect("binary exists");
        cmd.env("KITTY_HOME", self.home())
            .env("KITTY_CLI_SCRIPT", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_script(&self, script: &str) -> CliOutput {
        let output = self
            .command()
            .write_stdin(script.to_string())
            .output()
            .expect("run script CLI");
        if !output.status.success() {
            panic!(
                "script CLI failed: status={}\nstdout:\n{}\nstderr:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
