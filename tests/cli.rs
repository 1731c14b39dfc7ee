#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn agenda(calendar: &Path) -> Command {
    let mut cmd = Command::cargo_bin("agenda-cli").unwrap();
    cmd.arg("--calendar").arg(calendar);
    cmd
}

#[test]
fn add_then_list() {
    let dir = tempdir().unwrap();
    let cal = dir.path().join("calendar.json");

    agenda(&cal)
        .args(["add", "--date", "2024-11-16", "--summary", "Test"])
        .args(["--start", "12:00", "--end", "16:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Event added"));

    agenda(&cal)
        .args(["list", "--date", "2024-11-16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12:00 → 16:00 | Test"));
}

#[test]
fn conflict_exits_with_warning_code() {
    let dir = tempdir().unwrap();
    let cal = dir.path().join("calendar.json");

    agenda(&cal)
        .args(["add", "--date", "2024-11-16", "--summary", "Test"])
        .args(["--start", "12:00", "--end", "16:00"])
        .assert()
        .success();
    let before = std::fs::read_to_string(&cal).unwrap();

    agenda(&cal)
        .args(["add", "--date", "2024-11-16", "--summary", "Coffee"])
        .args(["--start", "16:15", "--end", "17:00"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Conflict detected"));

    assert_eq!(std::fs::read_to_string(&cal).unwrap(), before);
}

#[test]
fn recurring_add_writes_every_occurrence() {
    let dir = tempdir().unwrap();
    let cal = dir.path().join("calendar.json");
    let journal = dir.path().join("mirror.jsonl");

    agenda(&cal)
        .arg("--mirror-journal")
        .arg(&journal)
        .args(["add-recurring", "--start-date", "2024-11-25", "--summary", "Dog walk"])
        .args(["--start", "17:00", "--end", "18:00", "--freq", "weekly", "--count", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 occurrence(s)"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cal).unwrap()).unwrap();
    assert_eq!(stored["calendar"].as_array().unwrap().len(), 5);

    // a series is mirrored as one event carrying its rule
    let journal = std::fs::read_to_string(&journal).unwrap();
    assert_eq!(journal.lines().count(), 1);
    assert!(journal.contains("RRULE:FREQ=WEEKLY;INTERVAL=1;COUNT=5"));
}

#[test]
fn free_lists_open_dates() {
    let dir = tempdir().unwrap();
    let cal = dir.path().join("calendar.json");

    agenda(&cal)
        .args(["add", "--date", "2024-11-17", "--summary", "Busy"])
        .args(["--start", "09:00", "--end", "10:00"])
        .assert()
        .success();

    agenda(&cal)
        .args(["--window-days", "3"])
        .args(["free", "--start", "09:00", "--end", "10:00", "--from", "2024-11-16"])
        .assert()
        .success()
        .stdout("2024-11-16\n2024-11-18\n");
}

#[test]
fn rule_prints_canonical_form() {
    let dir = tempdir().unwrap();
    agenda(&dir.path().join("calendar.json"))
        .args(["rule", "--freq", "daily", "--interval", "2"])
        .args(["--until", "2024-12-31", "--byday", "mo,fr"])
        .assert()
        .success()
        .stdout("RRULE:FREQ=DAILY;INTERVAL=2;UNTIL=20241231;BYDAY=MO,FR\n");
}

#[test]
fn invalid_day_code_fails() {
    let dir = tempdir().unwrap();
    agenda(&dir.path().join("calendar.json"))
        .args(["rule", "--freq", "weekly", "--count", "2", "--byday", "MON"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid day code"));
}
