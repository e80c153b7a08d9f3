mod common;

use common::CliHarness;
use predicates::str::contains;
use regex::Regex;

fn capture(pattern: &str, haystack: &str) -> String {
    Regex::new(pattern)
        .expect("valid regex")
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| panic!("`{pattern}` not found in:\n{haystack}"))
}

fn assert_matches(pattern: &str, haystack: &str) {
    let re = Regex::new(pattern).expect("valid regex");
    assert!(re.is_match(haystack), "`{pattern}` not found in:\n{haystack}");
}

#[test]
fn script_mode_runs_basic_flow() {
    let harness = CliHarness::new();
    harness
        .command()
        .write_stdin("login Alex\nwhoami\nexit\n")
        .assert()
        .success()
        .stdout(contains("Signed in as Alex (group default-group)."));
}

#[test]
fn dashboard_reports_totals_people_and_categories() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
entry add income 1000 --date 2024-01-05
entry add expense 200 --date 2024-01-10 --category food
summary all
people all
categories all
exit
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("=== Summary (All time) ==="), "{stdout}");
    assert!(stdout.contains("Entries  : 2"), "{stdout}");
    assert!(stdout.contains("Income   : USD 1,000.00"), "{stdout}");
    assert!(stdout.contains("Expenses : USD 200.00"), "{stdout}");
    assert!(stdout.contains("Net      : USD 800.00"), "{stdout}");
    assert_matches(r"(?m)^A\s+200\.00\s+1,000\.00\s+800\.00$", stdout);
    assert_matches(r"(?m)^Food\s+200\.00\s+100\.0%$", stdout);
}

#[test]
fn series_and_months_follow_entry_dates() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
entry add income 1000 --date 2024-01-05
entry add expense 200 --date 2024-01-10 --category food
entry add expense 50 --date 2024-02-01 --category transportation --person B
series all --person A
months all
",
    );
    let stdout = &output.stdout;
    assert_matches(r"(?m)^2024-01-05\s+1,000\.00\s+1,000\.00$", stdout);
    assert_matches(r"(?m)^2024-01-10\s+-200\.00\s+800\.00$", stdout);
    assert_matches(r"(?m)^2024-01\s+1,000\.00\s+200\.00\s+800\.00\s+2$", stdout);
    assert_matches(r"(?m)^2024-02\s+0\.00\s+50\.00\s+-50\.00\s+1$", stdout);
}

#[test]
fn budget_reconciliation_flags_overspend() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
budget set 1 2024 3000 --food 400 --housing 1200
entry add expense 420 --date 2024-01-15 --category food
entry add expense 1180 --date 2024-01-02 --category housing
budget show 1 2024
budget show 2 2024
",
    );
    let stdout = &output.stdout;
    assert!(
        stdout.contains("Created budget for 2024-01: expected savings USD 1,400.00."),
        "{stdout}"
    );
    assert_matches(r"(?m)^Food\s+400\.00\s+420\.00\s+-20\.00\s+over$", stdout);
    assert_matches(r"(?m)^Housing\s+1,200\.00\s+1,180\.00\s+20\.00\s+warning$", stdout);
    assert!(stdout.contains("Expected savings : USD 1,400.00"), "{stdout}");
    assert!(stdout.contains("Actual savings   : -USD 1,600.00"), "{stdout}");
    assert!(stdout.contains("Net profit/loss  : -USD 1,600.00"), "{stdout}");
    assert!(stdout.contains("WARNING: No budget for 2024-02."), "{stdout}");
}

#[test]
fn budget_set_updates_existing_month() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
budget set 3 2024 2000 --food 300
budget set 3 2024 --savings 500
budget list
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("Updated budget for 2024-03: expected savings USD 1,200.00."), "{stdout}");
    assert_matches(r"(?m)^2024-03\s+2,000\.00\s+800\.00\s+1,200\.00$", stdout);
}

#[test]
fn writes_require_sign_in() {
    let harness = CliHarness::new();
    let output = harness.run_script("entry add income 5\ngoal add Trip 100\n");
    assert_eq!(
        output
            .stdout
            .matches("ERROR: Sign in first with `login <name>`.")
            .count(),
        2,
        "{}",
        output.stdout
    );
}

#[test]
fn invalid_input_is_rejected_with_guidance() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
entry add expense abc --category food
entry add expense 10 --category fod
entry add expense -5 --category food
entry add expense 10
entry add income 10 --date 2024-13-01
budget set 13 2024 100
sumary
entry list all
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("`abc` is not a number"), "{stdout}");
    assert!(stdout.contains("did you mean `food`"), "{stdout}");
    assert!(stdout.contains("amount cannot be negative"), "{stdout}");
    assert!(stdout.contains("expense entries need a category"), "{stdout}");
    assert!(stdout.contains("invalid date `2024-13-01`"), "{stdout}");
    assert!(stdout.contains("month must be between 1 and 12"), "{stdout}");
    assert!(stdout.contains("Suggestion: `summary`?"), "{stdout}");
    assert!(stdout.contains("No entries (All time)."), "{stdout}");
}

#[test]
fn entries_persist_and_can_be_edited_and_removed() {
    let harness = CliHarness::new();
    let first = harness.run_script(
        "login A\nentry add expense 30 --date 2024-05-02 --category food --company Market\n",
    );
    let id = capture(r"Recorded expense of USD 30\.00 on 2024-05-02 \(([0-9a-f]{8})\)", &first.stdout);

    let second = harness.run_script(&format!(
        "whoami\nentry list all\nentry edit {id} --amount 45 --notes \"weekly shop\"\nentry list all\nentry remove {id}\nsummary all\n"
    ));
    let stdout = &second.stdout;
    assert!(stdout.contains("Signed in as A"), "{stdout}");
    assert_matches(&format!(r"(?m)^{id}\s+2024-05-02\s+A\s+expense\s+Food\s+30\.00\s+Market$"), stdout);
    assert!(stdout.contains(&format!("Updated entry {id}.")), "{stdout}");
    assert_matches(&format!(r"(?m)^{id}\s+2024-05-02\s+A\s+expense\s+Food\s+45\.00\s+Market$"), stdout);
    assert!(stdout.contains(&format!("Removed entry {id}.")), "{stdout}");
    assert!(stdout.contains("Entries  : 0"), "{stdout}");
}

#[test]
fn goals_track_net_position() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
entry add income 1000 --date 2024-01-05
entry add expense 200 --date 2024-01-10 --category food
goal add Summer trip 1500
goal add Emergency 500
goal list
goal add Broken 0
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("Added goal `Summer trip` targeting USD 1,500.00"), "{stdout}");
    assert_matches(r"(?m)Summer trip\s+1,500\.00\s+800\.00\s+53%\s+700\.00$", stdout);
    assert_matches(r"(?m)Emergency\s+500\.00\s+500\.00\s+reached\s+0\.00$", stdout);
    assert!(stdout.contains("target must be greater than zero"), "{stdout}");
}

#[test]
fn switching_groups_isolates_ledgers() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
entry add income 100 --date 2024-01-05
group switch household
summary all
group switch default-group
summary all
group show
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("Switched to group household (0 entries)."), "{stdout}");
    assert!(stdout.contains("Switched to group default-group (1 entries)."), "{stdout}");
    assert!(stdout.contains("=== Group default-group ==="), "{stdout}");
}

#[test]
fn snapshots_restore_previous_state() {
    let harness = CliHarness::new();
    let first = harness.run_script(
        "login A\nentry add income 100 --date 2024-01-05\nbackup create before import\n",
    );
    let name = capture(r"Snapshot `(snapshot_[^`]+)` created\.", &first.stdout);
    assert!(name.ends_with("_before-import.json"), "{name}");

    let second = harness.run_script(&format!(
        "entry add income 900 --date 2024-01-06\nbackup list\nbackup restore {name}\nsummary all\nbackup restore snapshot_20000101_000000.json\n"
    ));
    let stdout = &second.stdout;
    assert!(stdout.contains(&name), "{stdout}");
    assert!(stdout.contains(&format!("Restored `{name}` (1 entries")), "{stdout}");
    assert!(stdout.contains("Income   : USD 100.00"), "{stdout}");
    assert!(stdout.contains("not found"), "{stdout}");
}

#[test]
fn config_changes_apply_to_output() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "login A
entry add income 1000 --date 2024-01-05
config set currency eur
config set currency_precision 0
summary all
config set colour on
config show
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("OK: currency = EUR"), "{stdout}");
    assert!(stdout.contains("Income   : EUR 1,000"), "{stdout}");
    assert!(stdout.contains("unknown setting `colour`"), "{stdout}");
    assert_matches(r"(?m)^\s+currency\s+: EUR$", stdout);
    assert!(harness.home().join("config/config.json").is_file());
}

#[test]
fn config_backups_round_trip() {
    let harness = CliHarness::new();
    let first = harness.run_script("config set locale en-GB\nconfig backup british\n");
    let name = capture(r"Configuration backed up as `([^`]+)`\.", &first.stdout);

    let second = harness.run_script(&format!(
        "config set locale fr-FR\nconfig backups\nconfig restore {name}\nconfig show\nconfig restore\n"
    ));
    let stdout = &second.stdout;
    assert!(stdout.contains(&format!("Configuration restored from `{name}`.")), "{stdout}");
    assert_matches(r"(?m)^\s+locale\s+: en-GB$", stdout);
    assert!(stdout.contains("usage: config restore <name>"), "{stdout}");
}

#[test]
fn help_and_version_describe_the_shell() {
    let harness = CliHarness::new();
    let output = harness.run_script("help\nhelp budget\nhelp nope\nversion\nexit\nsummary\n");
    let stdout = &output.stdout;
    assert!(stdout.contains("=== Available commands ==="), "{stdout}");
    assert!(stdout.contains("Usage: budget show [<month> <year>]"), "{stdout}");
    assert!(stdout.contains("Unknown command `nope`"), "{stdout}");
    assert!(stdout.contains(&format!("=== Kitty {} ===", env!("CARGO_PKG_VERSION"))), "{stdout}");
    assert!(!stdout.contains("=== Summary"), "exit stops the script: {stdout}");
}

#[test]
fn scripts_accept_comments_and_quoted_words() {
    let harness = CliHarness::new();
    let output = harness.run_script(
        "# household setup
login A

goal add \"Roof  repair\" 900
goal add \"Unclosed 100
goal list
",
    );
    let stdout = &output.stdout;
    assert!(stdout.contains("Added goal `Roof  repair` targeting USD 900.00"), "{stdout}");
    assert!(stdout.contains("cannot read `goal add \"Unclosed 100`"), "{stdout}");
    assert!(!stdout.contains("Unknown command `#`"), "{stdout}");
}
