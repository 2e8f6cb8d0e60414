/// CLI integration tests for daybook
///
/// These tests run the binary as a black box against a temporary database.
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("todo"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("daybook"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_add_and_list_today() {
    let harness = CliTestHarness::new();

    harness.run_success(&["list"]).stdout(assertions::empty_result());

    harness
        .run_success(&["add", "Buy", "oat", "milk"])
        .stdout(predicate::str::contains("Added todo: 'Buy oat milk'"));

    harness
        .run_success(&["list"])
        .stdout(assertions::has_todo_table_headers())
        .stdout(predicate::str::contains("Buy oat milk"));

    let todos = harness.todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].user_id, helpers::OWNER);
    assert!(!todos[0].completed);
}

#[test]
fn test_blank_add_is_rejected() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "   "])
        .stderr(predicate::str::contains("Invalid input"));
    assert!(harness.todos().is_empty());
}

#[test]
fn test_repeated_add_is_ignored_within_debounce() {
    let harness = CliTestHarness::new();
    let add = |debounce_ms: &str| {
        harness
            .command()
            .env("DAYBOOK_DEBOUNCE_MS", debounce_ms)
            .args(["add", "call", "mum"])
            .assert()
            .success()
    };

    add("60000").stdout(predicate::str::contains("Added todo: 'call mum'"));
    add("60000").stdout(predicate::str::contains("was just added"));
    assert_eq!(harness.todos().len(), 1);

    add("0").stdout(predicate::str::contains("Added todo: 'call mum'"));
    assert_eq!(harness.todos().len(), 2);
}

#[test]
fn test_tomorrow_tab() {
    let harness = CliTestHarness::new();

    harness.run_success(&["add", "Pack bags", "--tomorrow"]);

    harness
        .run_success(&["list", "--tomorrow"])
        .stdout(predicate::str::contains("Pack bags"));
    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Pack bags").not());
}

#[test]
fn test_toggle_edit_delete() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Write report"]);
    let id = harness.id_of("Write report");
    let prefix = &id[..13];

    harness
        .run_success(&["toggle", prefix])
        .stdout(predicate::str::contains("Completed todo: 'Write report'"));
    assert!(harness.todos()[0].completed);

    harness
        .run_success(&["toggle", &id])
        .stdout(predicate::str::contains("Reopened todo"));
    assert!(!harness.todos()[0].completed);

    harness
        .run_success(&["edit", &id, "Write", "final", "report"])
        .stdout(predicate::str::contains("Updated todo: 'Write final report'"));

    // no terminal to confirm on
    harness
        .run_success(&["delete", &id])
        .stdout(predicate::str::contains("Deletion cancelled."));
    assert_eq!(harness.todos().len(), 1);

    harness
        .run_success(&["delete", &id, "--force"])
        .stdout(predicate::str::contains("Deleted todo"));
    assert!(harness.todos().is_empty());
}

#[test]
fn test_unknown_and_short_ids() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Something"]);

    harness
        .run_failure(&["toggle", "ffffffff"])
        .stderr(predicate::str::contains("No todo found"));
    harness
        .run_failure(&["toggle", "f"])
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_schedule_and_patterns() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Stretch", "--every", "weekdays"]);

    harness
        .run_success(&["patterns"])
        .stdout(predicate::str::contains("Stretch"))
        .stdout(predicate::str::contains("Mon,Tue,Wed,Thu,Fri"));

    let id = harness.id_of("Stretch");
    harness
        .run_success(&["schedule", &id, "sat", "sun"])
        .stdout(predicate::str::contains("Sat,Sun"));
    harness
        .run_success(&["unschedule", &id])
        .stdout(predicate::str::contains("no longer repeats"));
    harness
        .run_success(&["patterns"])
        .stdout(predicate::str::contains("paused"));

    harness
        .run_failure(&["schedule", &id, "funday"])
        .stderr(assertions::has_error());
}

#[test]
fn test_expand_creates_copies_once() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Journal", "--every", "daily"]);

    // scheduling stamps today, so only tomorrow gets a copy
    let tomorrow = (chrono::Utc::now().date_naive() + chrono::Duration::days(1)).to_string();
    let output = harness
        .command()
        .args(["expand", "--date", &tomorrow, "--json"])
        .output()
        .expect("Failed to run expand");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["created"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["created"][0]["text"], "Journal");

    let rerun = harness
        .command()
        .args(["expand", "--date", &tomorrow, "--json"])
        .output()
        .expect("Failed to run expand");
    let report: serde_json::Value = serde_json::from_slice(&rerun.stdout).unwrap();
    assert_eq!(report["created"].as_array().map(Vec::len), Some(0));
    assert_eq!(report["skipped_already_expanded"], 1);

    assert_eq!(harness.todos().len(), 2);
}

#[test]
fn test_week_and_reorder() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "First"]);
    harness.run_success(&["add", "Second"]);

    harness
        .run_success(&["week"])
        .stdout(predicate::str::contains("Week"))
        .stdout(predicate::str::contains("First"));

    let first = harness.id_of("First");
    let second = harness.id_of("Second");
    harness
        .run_success(&["reorder", &first, &second])
        .stdout(predicate::str::contains("First"));
}

#[test]
fn test_week_past_the_calendar_edge_fails_cleanly() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["week", "--year", "262142", "--month", "12", "--week", "6"])
        .code(1)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_invalid_timezone_is_reported() {
    let harness = CliTestHarness::new();

    harness
        .command()
        .env("DAYBOOK_TIMEZONE", "Berlin")
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Europe/Berlin"));
}

#[test]
fn test_note_lifecycle() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["note", "list"])
        .stdout(predicate::str::contains("No notes found"));

    harness
        .run_success(&["note", "add", "buy", "stamps"])
        .stdout(predicate::str::contains("Saved note #1"));
    harness
        .run_success(&["note", "add", "ring", "the", "dentist"])
        .stdout(predicate::str::contains("Saved note #2"));

    let listing = harness.run_success(&["note", "list", "--today"]).get_output().stdout.clone();
    let listing = String::from_utf8_lossy(&listing);
    let dentist = listing.find("ring the dentist").expect("newest note listed");
    let stamps = listing.find("buy stamps").expect("older note listed");
    assert!(dentist < stamps, "notes should be newest first:\n{}", listing);

    harness
        .run_success(&["note", "edit", "1", "buy", "more", "stamps"])
        .stdout(predicate::str::contains("Updated note #1: 'buy more stamps'"));

    harness
        .run_success(&["note", "delete", "2", "--force"])
        .stdout(predicate::str::contains("Deleted note #2"));
    harness
        .run_success(&["note", "list"])
        .stdout(predicate::str::contains("buy more stamps"))
        .stdout(predicate::str::contains("dentist").not());

    harness
        .run_failure(&["note", "delete", "2", "--force"])
        .stderr(predicate::str::contains("Note #2 not found"));
    harness
        .run_failure(&["note", "add", "  "])
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_mood_log_and_history() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["mood", "history"])
        .stdout(predicate::str::contains("No moods logged"));

    harness
        .run_success(&["mood", "log", "happy"])
        .stdout(predicate::str::contains("Logged mood: happy"));
    harness
        .run_success(&["mood", "log", "sad"])
        .stdout(predicate::str::contains("Logged mood: sad"));

    harness
        .run_success(&["mood", "history", "--range", "month"])
        .stdout(predicate::str::contains("happy"))
        .stdout(predicate::str::contains("Average over the last 30 days: 2.00"));

    harness
        .run_failure(&["mood", "log", "furious"])
        .stderr(assertions::has_error());
}
