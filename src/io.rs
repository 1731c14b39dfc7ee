use crate::model::Calendar;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Demande d'ajout lue depuis un CSV, à faire passer par le `Scheduler`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub date: NaiveDate,
    pub summary: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Date `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

/// Heure `HH:MM` (ou `HH:MM:SS`).
pub fn parse_clock(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time (expected HH:MM): {raw}"))
}

/// Import d'événements: header `date,summary,start,end` (heures `HH:MM`)
pub fn import_events_csv<P: AsRef<Path>>(path: P) -> Result<Vec<EventRequest>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let field = |idx: usize, name: &str| {
            rec.get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .with_context(|| format!("row {row}: missing {name}"))
        };
        out.push(EventRequest {
            date: parse_date(field(0, "date")?).with_context(|| format!("row {row}"))?,
            summary: field(1, "summary")?.to_string(),
            start: parse_clock(field(2, "start")?).with_context(|| format!("row {row}"))?,
            end: parse_clock(field(3, "end")?).with_context(|| format!("row {row}"))?,
        });
    }
    Ok(out)
}

/// Export JSON de l'agenda (jolie mise en forme)
pub fn export_calendar_json<P: AsRef<Path>>(path: P, calendar: &Calendar) -> Result<()> {
    let s = serde_json::to_string_pretty(calendar)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des événements: header `date,summary,start,end,time_zone`
pub fn export_events_csv<P: AsRef<Path>>(path: P, calendar: &Calendar) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "summary", "start", "end", "time_zone"])?;
    for day in &calendar.days {
        for ev in &day.events {
            let date = day.date.format("%Y-%m-%d").to_string();
            let start = ev.start.date_time.format("%H:%M").to_string();
            let end = ev.end.date_time.format("%H:%M").to_string();
            w.write_record([
                date.as_str(),
                ev.summary.as_str(),
                start.as_str(),
                end.as_str(),
                ev.start.time_zone.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
