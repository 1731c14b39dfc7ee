use crate::model::Event;
use chrono::NaiveDateTime;

pub(super) fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Événements triés par (début, fin, libellé) : l'ordre de stockage n'est pas garanti.
pub(super) fn ordered(events: &[Event]) -> Vec<&Event> {
    let mut out: Vec<&Event> = events.iter().collect();
    out.sort_by(|a, b| {
        (a.start.date_time, a.end.date_time, &a.summary).cmp(&(
            b.start.date_time,
            b.end.date_time,
            &b.summary,
        ))
    });
    out
}
