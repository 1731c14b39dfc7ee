#![forbid(unsafe_code)]
//! Agenda — moteur local d'agenda personnel (sans BD).
//!
//! - Stockage fichier JSON (`{"calendar": [...]}`), chargé et écrit en entier.
//! - Détection de conflits avec écart minimal (30 min par défaut).
//! - Expansion de récurrences (FREQ/INTERVAL/COUNT/UNTIL/BYDAY).
//! - Suggestion de dates libres sur une fenêtre glissante.
//! - Ajout de séries tout-ou-rien, sauvegarde puis miroir distant (`Session`).

pub mod io;
pub mod mirror;
pub mod model;
pub mod recurrence;
pub mod scheduler;
pub mod session;
pub mod storage;

pub use mirror::{mirror_best_effort, JournalMirror, NoopMirror, RemoteMirror};
pub use model::{Calendar, Day, Event, EventTime};
pub use recurrence::{expand, DayCode, Frequency, RecurrenceRule, RuleError, Terminator};
pub use scheduler::{
    classify, find_free, ConflictReport, Outcome, OverlapKind, SchedError, ScheduleOptions,
    Scheduler, Side,
};
pub use session::Session;
pub use storage::{load_or_empty, JsonStorage, MalformedStore, MemoryStorage, Storage};
