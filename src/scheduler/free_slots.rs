use super::conflicts;
use crate::model::Calendar;
use chrono::{Days, Duration, NaiveDate, NaiveTime};

/// Dates de `[reference, reference + window_days)` où le créneau horaire est libre.
pub fn find_free(
    calendar: &Calendar,
    start: NaiveTime,
    end: NaiveTime,
    window_days: u32,
    reference: NaiveDate,
    min_gap: Duration,
) -> Vec<NaiveDate> {
    (0..u64::from(window_days))
        .map_while(|offset| reference.checked_add_days(Days::new(offset)))
        .filter(|date| match calendar.find_day(*date) {
            // journée absente : rien à heurter
            None => true,
            Some(day) => {
                !conflicts::classify(day, date.and_time(start), date.and_time(end), min_gap)
                    .is_conflict()
            }
        })
        .collect()
}
