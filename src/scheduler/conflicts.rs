use super::{util, ConflictReport, OverlapKind, Side};
use crate::model::Day;
use chrono::{Duration, NaiveDateTime};

/// Classe un créneau candidat face aux événements d'une journée.
///
/// Les événements sont parcourus dans l'ordre (début, fin, libellé) ; le premier
/// qui pose problème est rapporté. Un écart exactement égal à `min_gap` passe.
pub fn classify(
    day: &Day,
    start: NaiveDateTime,
    end: NaiveDateTime,
    min_gap: Duration,
) -> ConflictReport {
    for event in util::ordered(&day.events) {
        let (ev_start, ev_end) = (event.start.date_time, event.end.date_time);

        if util::overlaps(start, end, ev_start, ev_end) {
            return ConflictReport::Overlap {
                kind: overlap_kind(start, end, ev_start, ev_end),
                with: event.clone(),
            };
        }
        if start >= ev_end && ev_end + min_gap > start {
            return ConflictReport::TooClose {
                side: Side::Before,
                with: event.clone(),
            };
        }
        if end <= ev_start && end + min_gap > ev_start {
            return ConflictReport::TooClose {
                side: Side::After,
                with: event.clone(),
            };
        }
    }
    ConflictReport::NoConflict
}

fn overlap_kind(
    start: NaiveDateTime,
    end: NaiveDateTime,
    ev_start: NaiveDateTime,
    ev_end: NaiveDateTime,
) -> OverlapKind {
    match (start <= ev_start, end >= ev_end) {
        (true, true) => OverlapKind::Covers,
        (false, true) => OverlapKind::StartsInside,
        (true, false) => OverlapKind::EndsInside,
        (false, false) => OverlapKind::Within,
    }
}
