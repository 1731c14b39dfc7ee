#![forbid(unsafe_code)]
use agenda::{
    load_or_empty, Frequency, JsonStorage, MalformedStore, MemoryStorage, RecurrenceRule,
    Scheduler, ScheduleOptions, Storage, Terminator,
};
use chrono::{NaiveDate, NaiveTime};
use tempfile::tempdir;

const SAMPLE: &str = r#"{
    "calendar": [
        {
            "date": "2024-11-16",
            "events": [
                {
                    "summary": "Test",
                    "start": {
                        "dateTime": "2024-11-16T12:00:00",
                        "timeZone": "America/Los_Angeles"
                    },
                    "end": {
                        "dateTime": "2024-11-16T16:00:00",
                        "timeZone": "America/Los_Angeles"
                    }
                }
            ]
        }
    ]
}"#;

fn populated() -> Scheduler {
    let mut s = Scheduler::default();
    let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    let rule =
        RecurrenceRule::new(Frequency::Daily, 2, Terminator::Count(3), Vec::new()).unwrap();
    s.add_recurring(
        NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
        "Gym",
        hm(7, 0),
        hm(8, 0),
        &rule,
    )
    .unwrap();
    s.add_single(
        NaiveDate::from_ymd_opt(2024, 11, 16).unwrap(),
        "Test",
        hm(12, 0),
        hm(16, 0),
    )
    .unwrap();
    s
}

#[test]
fn existing_store_round_trips_byte_for_byte() {
    let storage = MemoryStorage::from_bytes(SAMPLE);
    let calendar = storage.load().unwrap();
    assert_eq!(calendar.event_count(), 1);
    storage.save(&calendar).unwrap();
    assert_eq!(String::from_utf8(storage.contents()).unwrap(), SAMPLE);
}

#[test]
fn json_file_round_trip() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("calendar.json")).unwrap();
    let calendar = populated().into_calendar();

    storage.save(&calendar).unwrap();
    let loaded = storage.load().unwrap();
    assert_eq!(loaded, calendar);

    // days stay ordered by date even though the 16th was added last
    let dates: Vec<String> = loaded.days.iter().map(|d| d.date.to_string()).collect();
    assert_eq!(
        dates,
        vec!["2024-11-16", "2024-11-20", "2024-11-22", "2024-11-24"]
    );
}

#[test]
fn missing_or_empty_file_is_an_empty_calendar() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calendar.json");
    let storage = JsonStorage::open(&path).unwrap();
    assert_eq!(storage.load().unwrap().days.len(), 0);

    std::fs::write(&path, "").unwrap();
    assert_eq!(storage.load().unwrap().days.len(), 0);
}

#[test]
fn malformed_store_is_reported_then_recovered() {
    let storage = MemoryStorage::from_bytes("{\"calendar\": [ {\"date\": 42 ");
    let err = storage.load().unwrap_err();
    assert!(err.downcast_ref::<MalformedStore>().is_some());

    let calendar = load_or_empty(&storage).unwrap();
    assert_eq!(calendar.days.len(), 0);
}

#[test]
fn recovered_store_accepts_new_events() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calendar.json");
    std::fs::write(&path, "not json").unwrap();
    let storage = JsonStorage::open(&path).unwrap();

    let calendar = load_or_empty(&storage).unwrap();
    let mut s = Scheduler::with_calendar(calendar, ScheduleOptions::default());
    s.add_single(
        NaiveDate::from_ymd_opt(2024, 11, 16).unwrap(),
        "Fresh",
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )
    .unwrap();
    storage.save(s.calendar()).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"dateTime\": \"2024-11-16T09:00:00\""));
    assert_eq!(storage.load().unwrap().event_count(), 1);
}
