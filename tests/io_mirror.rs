#![forbid(unsafe_code)]
use agenda::{
    io, mirror_best_effort, Event, Frequency, JournalMirror, RecurrenceRule, RemoteMirror,
    Scheduler, Terminator,
};
use chrono::{NaiveDate, NaiveTime};
use std::fs;
use tempfile::tempdir;

fn sample_event() -> Event {
    Event::new(
        "Dog walk",
        NaiveDate::from_ymd_opt(2024, 11, 25).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        "Etc/Greenwich",
    )
    .unwrap()
}

struct FailingMirror;

impl RemoteMirror for FailingMirror {
    fn create_event(&self, _: &Event, _: Option<&RecurrenceRule>) -> anyhow::Result<String> {
        anyhow::bail!("service unavailable")
    }
}

#[test]
fn csv_import_then_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.csv");
    fs::write(
        &input,
        "date,summary,start,end\n2024-11-16,Test,12:00,16:00\n2024-11-16,Too soon,16:10,17:00\n2024-11-18,Gym,07:00,08:00\n",
    )
    .unwrap();

    let requests = io::import_events_csv(&input).unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].start, NaiveTime::from_hms_opt(16, 10, 0).unwrap());

    let mut s = Scheduler::default();
    let committed = requests
        .iter()
        .filter(|r| {
            s.add_single(r.date, &r.summary, r.start, r.end)
                .unwrap()
                .is_committed()
        })
        .count();
    assert_eq!(committed, 2);

    let output = dir.path().join("out.csv");
    io::export_events_csv(&output, s.calendar()).unwrap();
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(
        text,
        "date,summary,start,end,time_zone\n2024-11-16,Test,12:00,16:00,Etc/Greenwich\n2024-11-18,Gym,07:00,08:00,Etc/Greenwich\n"
    );
}

#[test]
fn csv_import_reports_the_bad_row() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.csv");
    fs::write(
        &input,
        "date,summary,start,end\n2024-11-16,Test,12:00,16:00\n2024-13-01,Bad,09:00,10:00\n",
    )
    .unwrap();
    let err = io::import_events_csv(&input).unwrap_err();
    assert!(format!("{err:#}").contains("row 3"));
}

#[test]
fn clock_accepts_optional_seconds() {
    assert_eq!(
        io::parse_clock("09:30").unwrap(),
        io::parse_clock("09:30:00").unwrap()
    );
    assert!(io::parse_clock("9h30").is_err());
    assert!(io::parse_date("16/11/2024").is_err());
}

#[test]
fn journal_mirror_appends_one_line_per_event() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mirror.jsonl");
    let mirror = JournalMirror::new(&path);
    let rule =
        RecurrenceRule::new(Frequency::Weekly, 1, Terminator::Count(5), Vec::new()).unwrap();

    let first = mirror.create_event(&sample_event(), Some(&rule)).unwrap();
    let second = mirror.create_event(&sample_event(), None).unwrap();
    assert_ne!(first, second);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], first.as_str());
    assert_eq!(lines[0]["summary"], "Dog walk");
    assert_eq!(lines[0]["start"]["dateTime"], "2024-11-25T17:00:00");
    assert_eq!(lines[0]["recurrence"], "RRULE:FREQ=WEEKLY;INTERVAL=1;COUNT=5");
    assert!(lines[1].get("recurrence").is_none());
}

#[test]
fn mirror_failure_is_swallowed() {
    assert_eq!(mirror_best_effort(&FailingMirror, &sample_event(), None), None);
}
