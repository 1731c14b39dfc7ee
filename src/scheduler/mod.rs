mod conflicts;
mod free_slots;
mod mutate;
mod types;
mod util;

pub use conflicts::classify;
pub use free_slots::find_free;
pub use types::{
    ConflictReport, Outcome, OverlapKind, SchedError, ScheduleOptions, Side, DEFAULT_WINDOW_DAYS,
    MIN_GAP_MINUTES,
};

use crate::model::{Calendar, Event};
use crate::recurrence::RecurrenceRule;
use chrono::{NaiveDate, NaiveTime};

/// Scheduler : encapsule l'agenda chargé en mémoire et les options de planification
#[derive(Debug, Default)]
pub struct Scheduler {
    calendar: Calendar,
    options: ScheduleOptions,
}

impl Scheduler {
    pub fn new(options: ScheduleOptions) -> Self {
        Self {
            calendar: Calendar::default(),
            options,
        }
    }

    pub fn with_calendar(calendar: Calendar, options: ScheduleOptions) -> Self {
        Self { calendar, options }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
    pub fn into_calendar(self) -> Calendar {
        self.calendar
    }
    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    pub(crate) fn restore(&mut self, calendar: Calendar) {
        self.calendar = calendar;
    }

    /// Événements d'une date, dans l'ordre utilisé par la détection de conflits.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.calendar
            .find_day(date)
            .map(|day| util::ordered(&day.events))
            .unwrap_or_default()
    }

    /// Vérifie un créneau sans rien modifier.
    pub fn classify(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<ConflictReport, SchedError> {
        if end <= start {
            return Err(SchedError::InvalidTimeRange);
        }
        Ok(match self.calendar.find_day(date) {
            Some(day) => classify(
                day,
                date.and_time(start),
                date.and_time(end),
                self.options.min_gap(),
            ),
            None => ConflictReport::NoConflict,
        })
    }

    /// Dates libres pour ce créneau horaire sur la fenêtre configurée.
    pub fn find_free(
        &self,
        start: NaiveTime,
        end: NaiveTime,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>, SchedError> {
        if end <= start {
            return Err(SchedError::InvalidTimeRange);
        }
        Ok(find_free(
            &self.calendar,
            start,
            end,
            self.options.window_days,
            reference,
            self.options.min_gap(),
        ))
    }

    /// Ajoute un événement ponctuel si aucun conflit n'est détecté.
    pub fn add_single(
        &mut self,
        date: NaiveDate,
        summary: &str,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Outcome, SchedError> {
        mutate::add_single(self, date, summary, start, end)
    }

    /// Ajoute toutes les occurrences d'une série, ou aucune.
    pub fn add_recurring(
        &mut self,
        start_date: NaiveDate,
        summary: &str,
        start: NaiveTime,
        end: NaiveTime,
        rule: &RecurrenceRule,
    ) -> Result<Outcome, SchedError> {
        mutate::add_recurring(self, start_date, summary, start, end, rule)
    }
}
