use crate::model::Calendar;
use anyhow::Context;
use serde::Serialize;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

pub trait Storage {
    /// Charge l'agenda complet depuis un support.
    fn load(&self) -> anyhow::Result<Calendar>;
    /// Sauvegarde l'agenda complet.
    fn save(&self, calendar: &Calendar) -> anyhow::Result<()>;
}

/// Contenu persistant illisible.
#[derive(Error, Debug)]
#[error("malformed calendar store {origin}")]
pub struct MalformedStore {
    pub origin: String,
    #[source]
    pub source: serde_json::Error,
}

/// Charge l'agenda ; un support corrompu est remplacé par un agenda vide.
///
/// Les autres erreurs (droits, E/S) remontent telles quelles.
pub fn load_or_empty(storage: &dyn Storage) -> anyhow::Result<Calendar> {
    match storage.load() {
        Ok(calendar) => Ok(calendar),
        Err(err) => match err.downcast_ref::<MalformedStore>() {
            Some(malformed) => {
                warn!(
                    origin = %malformed.origin,
                    error = %malformed.source,
                    "calendar store unreadable, starting empty"
                );
                Ok(Calendar::default())
            }
            None => Err(err),
        },
    }
}

fn encode(calendar: &Calendar) -> anyhow::Result<Vec<u8>> {
    // indentation à 4 espaces, comme les fichiers existants
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    calendar.serialize(&mut ser)?;
    Ok(out)
}

fn decode(data: &[u8], origin: &str) -> anyhow::Result<Calendar> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Calendar::default());
    }
    serde_json::from_slice(data).map_err(|source| {
        MalformedStore {
            origin: origin.to_string(),
            source,
        }
        .into()
    })
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    /// Fichier absent ou vide : agenda vide.
    fn load(&self) -> anyhow::Result<Calendar> {
        if !self.path.exists() {
            return Ok(Calendar::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        decode(&data, &self.path.display().to_string())
    }

    /// Écriture atomique (fichier temporaire puis renommage).
    fn save(&self, calendar: &Calendar) -> anyhow::Result<()> {
        let json = encode(calendar)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Support en mémoire, sérialisé comme le fichier JSON.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RefCell<Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes<B: Into<Vec<u8>>>(data: B) -> Self {
        Self {
            data: RefCell::new(data.into()),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> anyhow::Result<Calendar> {
        decode(&self.data.borrow(), "<memory>")
    }

    fn save(&self, calendar: &Calendar) -> anyhow::Result<()> {
        let json = encode(calendar)?;
        *self.data.borrow_mut() = json;
        Ok(())
    }
}
