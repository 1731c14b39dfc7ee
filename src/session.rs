//! Opérations complètes sur l'agenda persistant : ajout, sauvegarde du support,
//! puis notification du miroir distant.

use crate::mirror::{mirror_best_effort, RemoteMirror};
use crate::model::Calendar;
use crate::recurrence::RecurrenceRule;
use crate::scheduler::{Outcome, SchedError, ScheduleOptions, Scheduler};
use crate::storage::{load_or_empty, Storage};
use chrono::{NaiveDate, NaiveTime};

/// Agenda chargé depuis un support, réécrit en entier après chaque ajout engagé.
///
/// Le miroir n'est appelé qu'une fois la sauvegarde locale réussie ; ses échecs
/// sont journalisés et n'annulent rien.
pub struct Session<'a> {
    scheduler: Scheduler,
    storage: &'a dyn Storage,
    mirror: &'a dyn RemoteMirror,
}

impl<'a> Session<'a> {
    /// Charge l'agenda ; un support corrompu donne un agenda vide.
    pub fn open(
        storage: &'a dyn Storage,
        mirror: &'a dyn RemoteMirror,
        options: ScheduleOptions,
    ) -> Result<Self, SchedError> {
        let calendar = load_or_empty(storage).map_err(SchedError::Store)?;
        Ok(Self {
            scheduler: Scheduler::with_calendar(calendar, options),
            storage,
            mirror,
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn add_single(
        &mut self,
        date: NaiveDate,
        summary: &str,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Outcome, SchedError> {
        let snapshot = self.scheduler.calendar().clone();
        let outcome = self.scheduler.add_single(date, summary, start, end)?;
        if let Outcome::Committed(events) = &outcome {
            self.persist(snapshot)?;
            for event in events {
                mirror_best_effort(self.mirror, event, None);
            }
        }
        Ok(outcome)
    }

    /// Une série est transmise au miroir en un seul appel : première occurrence + règle.
    pub fn add_recurring(
        &mut self,
        start_date: NaiveDate,
        summary: &str,
        start: NaiveTime,
        end: NaiveTime,
        rule: &RecurrenceRule,
    ) -> Result<Outcome, SchedError> {
        let snapshot = self.scheduler.calendar().clone();
        let outcome = self
            .scheduler
            .add_recurring(start_date, summary, start, end, rule)?;
        if let Outcome::Committed(events) = &outcome {
            self.persist(snapshot)?;
            if let Some(first) = events.first() {
                mirror_best_effort(self.mirror, first, Some(rule));
            }
        }
        Ok(outcome)
    }

    // sauvegarde ratée : l'agenda en mémoire revient à `snapshot`
    fn persist(&mut self, snapshot: Calendar) -> Result<(), SchedError> {
        if let Err(err) = self.storage.save(self.scheduler.calendar()) {
            self.scheduler.restore(snapshot);
            return Err(SchedError::Store(err));
        }
        Ok(())
    }
}
