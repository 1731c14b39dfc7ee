//! Miroir distant (service d'agenda externe), alimenté après l'écriture locale.

use crate::model::Event;
use crate::recurrence::RecurrenceRule;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Reçoit les événements déjà engagés localement.
///
/// Une série est transmise en un seul appel : première occurrence + règle.
pub trait RemoteMirror {
    /// Retourne l'identifiant attribué par le service distant.
    fn create_event(&self, event: &Event, recurrence: Option<&RecurrenceRule>) -> Result<String>;
}

/// Miroir inactif.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMirror;

impl RemoteMirror for NoopMirror {
    fn create_event(&self, _event: &Event, _recurrence: Option<&RecurrenceRule>) -> Result<String> {
        Ok(String::new())
    }
}

#[derive(Serialize)]
struct JournalEntry<'a> {
    id: &'a str,
    #[serde(flatten)]
    event: &'a Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurrence: Option<String>,
}

/// Journal JSON Lines des créations, en attendant une vraie synchro.
#[derive(Debug, Clone)]
pub struct JournalMirror {
    path: PathBuf,
}

impl JournalMirror {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RemoteMirror for JournalMirror {
    fn create_event(&self, event: &Event, recurrence: Option<&RecurrenceRule>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let entry = JournalEntry {
            id: &id,
            event,
            recurrence: recurrence.map(ToString::to_string),
        };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening journal {}", self.path.display()))?;
        file.write_all(&line)?;
        Ok(id)
    }
}

/// Pousse vers le miroir sans jamais faire échouer l'opération locale.
pub fn mirror_best_effort(
    mirror: &dyn RemoteMirror,
    event: &Event,
    recurrence: Option<&RecurrenceRule>,
) -> Option<String> {
    match mirror.create_event(event, recurrence) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(summary = %event.summary, error = %err, "remote mirror failed");
            None
        }
    }
}
