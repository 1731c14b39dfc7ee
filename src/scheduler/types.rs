use crate::model::{Event, DEFAULT_TIME_ZONE};
use crate::recurrence::RuleError;
use chrono::Duration;
use std::fmt;
use thiserror::Error;

/// Écart minimal par défaut entre deux événements, en minutes.
pub const MIN_GAP_MINUTES: u32 = 30;
/// Fenêtre de recherche par défaut des créneaux libres, en jours.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Options de planification
#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    pub min_gap_minutes: u32,
    pub window_days: u32,
    pub time_zone: String,
}

impl ScheduleOptions {
    pub fn min_gap(&self) -> Duration {
        Duration::minutes(i64::from(self.min_gap_minutes))
    }
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            min_gap_minutes: MIN_GAP_MINUTES,
            window_days: DEFAULT_WINDOW_DAYS,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

/// Forme du chevauchement entre le candidat et un événement existant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// Le candidat recouvre entièrement l'événement.
    Covers,
    /// Le candidat démarre dans l'événement et finit à sa fin ou après.
    StartsInside,
    /// Le candidat démarre avant l'événement (ou en même temps) et finit dedans.
    EndsInside,
    /// Le candidat est strictement contenu dans l'événement.
    Within,
}

/// Côté de l'événement existant où l'écart minimal n'est pas respecté.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Le candidat démarre trop tôt après la fin de l'événement.
    Before,
    /// Le candidat finit trop tard avant le début de l'événement.
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReport {
    NoConflict,
    Overlap { kind: OverlapKind, with: Event },
    TooClose { side: Side, with: Event },
}

impl ConflictReport {
    pub fn is_conflict(&self) -> bool {
        !matches!(self, ConflictReport::NoConflict)
    }

    /// Événement en cause, s'il y en a un.
    pub fn with_event(&self) -> Option<&Event> {
        match self {
            ConflictReport::NoConflict => None,
            ConflictReport::Overlap { with, .. } | ConflictReport::TooClose { with, .. } => {
                Some(with)
            }
        }
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = |e: &Event| {
            format!(
                "'{}' from {} to {}",
                e.summary,
                e.start.date_time.format("%Y-%m-%d %H:%M"),
                e.end.date_time.format("%H:%M")
            )
        };
        match self {
            ConflictReport::NoConflict => f.write_str("no conflict"),
            ConflictReport::Overlap { kind, with } => {
                let how = match kind {
                    OverlapKind::Covers => "completely overlaps",
                    OverlapKind::StartsInside => "starts during",
                    OverlapKind::EndsInside => "ends during",
                    OverlapKind::Within => "is contained within",
                };
                write!(f, "new event {how} the event {}", span(with))
            }
            ConflictReport::TooClose { side, with } => {
                let how = match side {
                    Side::Before => "starts too soon after",
                    Side::After => "ends too close to",
                };
                write!(f, "new event {how} the event {}", span(with))
            }
        }
    }
}

/// Issue d'un ajout : tout est engagé, ou rien.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Committed(Vec<Event>),
    Rejected(ConflictReport),
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error(transparent)]
    Rule(#[from] RuleError),
    /// Échec du support de stockage (chargement ou sauvegarde).
    #[error(transparent)]
    Store(anyhow::Error),
}
