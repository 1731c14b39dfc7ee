use super::{conflicts, ConflictReport, Outcome, SchedError, Scheduler};
use crate::model::Event;
use crate::recurrence::{self, RecurrenceRule, RuleError};
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

pub(super) fn add_single(
    scheduler: &mut Scheduler,
    date: NaiveDate,
    summary: &str,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Outcome, SchedError> {
    let event = build_event(scheduler, summary, date, start, end)?;

    let report = check(scheduler, &event);
    if report.is_conflict() {
        debug!(%date, summary, %report, "event rejected");
        return Ok(Outcome::Rejected(report));
    }

    commit(scheduler, event.clone());
    info!(%date, summary, "event added");
    Ok(Outcome::Committed(vec![event]))
}

/// Ajout d'une série en deux phases : toutes les occurrences sont vérifiées
/// avant qu'une seule ne soit écrite.
pub(super) fn add_recurring(
    scheduler: &mut Scheduler,
    start_date: NaiveDate,
    summary: &str,
    start: NaiveTime,
    end: NaiveTime,
    rule: &RecurrenceRule,
) -> Result<Outcome, SchedError> {
    let dates = recurrence::expand(start_date, rule)?;
    if dates.is_empty() {
        return Err(RuleError::InvalidRule(format!(
            "{rule} yields no occurrence from {start_date}"
        ))
        .into());
    }

    let mut pending = Vec::with_capacity(dates.len());
    for (index, date) in dates.into_iter().enumerate() {
        let event = build_event(scheduler, summary, date, start, end)?;
        let report = check(scheduler, &event);
        if report.is_conflict() {
            debug!(%date, occurrence = index + 1, summary, %report, "series rejected");
            return Ok(Outcome::Rejected(report));
        }
        pending.push(event);
    }

    for event in &pending {
        commit(scheduler, event.clone());
    }
    info!(%start_date, summary, occurrences = pending.len(), %rule, "series added");
    Ok(Outcome::Committed(pending))
}

fn build_event(
    scheduler: &Scheduler,
    summary: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Event, SchedError> {
    Event::new(summary, date, start, end, scheduler.options.time_zone.as_str())
        .map_err(|_| SchedError::InvalidTimeRange)
}

fn check(scheduler: &Scheduler, event: &Event) -> ConflictReport {
    match scheduler.calendar.find_day(event.date()) {
        Some(day) => conflicts::classify(
            day,
            event.start.date_time,
            event.end.date_time,
            scheduler.options.min_gap(),
        ),
        None => ConflictReport::NoConflict,
    }
}

fn commit(scheduler: &mut Scheduler, event: Event) {
    scheduler
        .calendar
        .day_mut_or_insert(event.date())
        .events
        .push(event);
}
