use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Libellé de fuseau posé sur les événements créés localement.
pub const DEFAULT_TIME_ZONE: &str = "Etc/Greenwich";

/// Horodatage d'un événement : date/heure locale + libellé de fuseau.
///
/// Le libellé est transporté tel quel, jamais interprété.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime", with = "date_time_format")]
    pub date_time: NaiveDateTime,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl EventTime {
    pub fn new<Z: Into<String>>(date_time: NaiveDateTime, time_zone: Z) -> Self {
        Self {
            date_time,
            time_zone: time_zone.into(),
        }
    }
}

/// Événement d'agenda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl Event {
    /// Crée un événement sur `date` en validant que `end > start`.
    pub fn new<S: Into<String>, Z: Into<String>>(
        summary: S,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        time_zone: Z,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        let time_zone = time_zone.into();
        Ok(Self {
            summary: summary.into(),
            start: EventTime::new(date.and_time(start), time_zone.clone()),
            end: EventTime::new(date.and_time(end), time_zone),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date_time.date()
    }
}

/// Journée de l'agenda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Day {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            events: Vec::new(),
        }
    }
}

/// Agenda complet, tel que persisté (`{"calendar": [...]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Calendar {
    #[serde(rename = "calendar", default)]
    pub days: Vec<Day>,
}

impl Calendar {
    pub fn find_day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Retourne la journée `date`, créée à la volée à sa position chronologique.
    ///
    /// Un agenda chargé dans le désordre est d'abord trié par date (tri stable).
    pub fn day_mut_or_insert(&mut self, date: NaiveDate) -> &mut Day {
        let pos = match self.days.iter().position(|d| d.date == date) {
            Some(pos) => pos,
            None => {
                if !self.days.windows(2).all(|w| w[0].date <= w[1].date) {
                    self.days.sort_by_key(|d| d.date);
                }
                let pos = self.days.partition_point(|d| d.date < date);
                self.days.insert(pos, Day::empty(date));
                pos
            }
        };
        &mut self.days[pos]
    }

    pub fn event_count(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }
}

mod date_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
