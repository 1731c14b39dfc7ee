//! Règles de récurrence (sous-ensemble RRULE) et expansion en dates concrètes.
//!
//! L'expansion est volontairement naïve vis-à-vis du calendrier : un mois vaut
//! 30 jours, une année 365 jours. `BYDAY` est validé et conservé mais ne filtre
//! pas les dates produites.

use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid recurrence rule: {0}")]
    InvalidRule(String),
    #[error("invalid day code: {0} (expected one of MO, TU, WE, TH, FR, SA, SU)")]
    InvalidDayCode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Nombre de jours d'une unité de fréquence.
    fn days_per_unit(self) -> u64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 30,
            Frequency::Yearly => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl FromStr for Frequency {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(RuleError::InvalidRule(format!("unknown frequency {other:?}"))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code de jour RRULE sur deux lettres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayCode {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl DayCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DayCode::Mo => "MO",
            DayCode::Tu => "TU",
            DayCode::We => "WE",
            DayCode::Th => "TH",
            DayCode::Fr => "FR",
            DayCode::Sa => "SA",
            DayCode::Su => "SU",
        }
    }

    /// Parse une liste `"MO,WE"` / `"mo we"`; doublons retirés, ordre de semaine.
    pub fn parse_list(raw: &str) -> Result<Vec<DayCode>, RuleError> {
        let mut out = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|chunk| !chunk.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<DayCode>, _>>()?;
        out.sort();
        out.dedup();
        Ok(out)
    }
}

impl FromStr for DayCode {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MO" => Ok(DayCode::Mo),
            "TU" => Ok(DayCode::Tu),
            "WE" => Ok(DayCode::We),
            "TH" => Ok(DayCode::Th),
            "FR" => Ok(DayCode::Fr),
            "SA" => Ok(DayCode::Sa),
            "SU" => Ok(DayCode::Su),
            _ => Err(RuleError::InvalidDayCode(s.to_string())),
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borne d'une série : nombre d'occurrences ou date de fin incluse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Count(u32),
    Until(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub terminator: Terminator,
    pub by_day: Vec<DayCode>,
}

impl RecurrenceRule {
    /// Construit une règle validée.
    pub fn new(
        frequency: Frequency,
        interval: u32,
        terminator: Terminator,
        by_day: Vec<DayCode>,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            frequency,
            interval,
            terminator,
            by_day,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.interval == 0 {
            return Err(RuleError::InvalidRule("interval must be >= 1".into()));
        }
        if self.terminator == Terminator::Count(0) {
            return Err(RuleError::InvalidRule("count must be >= 1".into()));
        }
        Ok(())
    }

    fn step_days(&self) -> u64 {
        u64::from(self.interval) * self.frequency.days_per_unit()
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RRULE:FREQ={};INTERVAL={}", self.frequency, self.interval)?;
        match self.terminator {
            Terminator::Count(n) => write!(f, ";COUNT={n}")?,
            Terminator::Until(d) => write!(f, ";UNTIL={}", d.format("%Y%m%d"))?,
        }
        if !self.by_day.is_empty() {
            let codes: Vec<&str> = self.by_day.iter().map(|d| d.as_str()).collect();
            write!(f, ";BYDAY={}", codes.join(","))?;
        }
        Ok(())
    }
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim();
        let body = body.strip_prefix("RRULE:").unwrap_or(body);

        let mut frequency = None;
        let mut interval = 1u32;
        let mut count = None;
        let mut until = None;
        let mut by_day = Vec::new();

        for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RuleError::InvalidRule(format!("malformed component {part:?}")))?;
            match key.to_ascii_uppercase().as_str() {
                "FREQ" => frequency = Some(value.parse::<Frequency>()?),
                "INTERVAL" => interval = parse_number(key, value)?,
                "COUNT" => count = Some(parse_number(key, value)?),
                "UNTIL" => until = Some(parse_until(value)?),
                "BYDAY" => by_day = DayCode::parse_list(value)?,
                other => {
                    return Err(RuleError::InvalidRule(format!("unsupported component {other}")))
                }
            }
        }

        let frequency = frequency.ok_or_else(|| RuleError::InvalidRule("missing FREQ".into()))?;
        let terminator = match (count, until) {
            (Some(n), None) => Terminator::Count(n),
            (None, Some(d)) => Terminator::Until(d),
            (None, None) => {
                return Err(RuleError::InvalidRule(
                    "either COUNT or UNTIL is required".into(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(RuleError::InvalidRule(
                    "COUNT and UNTIL are mutually exclusive".into(),
                ))
            }
        };
        RecurrenceRule::new(frequency, interval, terminator, by_day)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, RuleError> {
    value.trim().parse().map_err(|_| {
        RuleError::InvalidRule(format!("{key} must be a positive integer, got {value:?}"))
    })
}

fn parse_until(value: &str) -> Result<NaiveDate, RuleError> {
    let value = value.trim();
    // `UNTIL=20241231T235959Z` : seule la partie date compte.
    let date_part = value.split_once('T').map_or(value, |(d, _)| d);
    NaiveDate::parse_from_str(date_part, "%Y%m%d")
        .map_err(|_| RuleError::InvalidRule(format!("UNTIL must be YYYYMMDD, got {value:?}")))
}

/// Itérateur des occurrences d'une série, à partir de `start` incluse.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    step: Days,
    terminator: Terminator,
    emitted: u32,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        let done = match self.terminator {
            Terminator::Count(n) => self.emitted >= n,
            Terminator::Until(until) => current > until,
        };
        if done {
            self.next = None;
            return None;
        }
        self.emitted += 1;
        self.next = current.checked_add_days(self.step);
        Some(current)
    }
}

/// Occurrences paresseuses ; échoue si la règle est invalide.
pub fn occurrences(start: NaiveDate, rule: &RecurrenceRule) -> Result<Occurrences, RuleError> {
    rule.validate()?;
    Ok(Occurrences {
        next: Some(start),
        step: Days::new(rule.step_days()),
        terminator: rule.terminator,
        emitted: 0,
    })
}

/// Développe une série en dates strictement croissantes, la première étant `start`.
pub fn expand(start: NaiveDate, rule: &RecurrenceRule) -> Result<Vec<NaiveDate>, RuleError> {
    Ok(occurrences(start, rule)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_codes_are_normalised() {
        let codes = DayCode::parse_list("we, mo MO").unwrap();
        assert_eq!(codes, vec![DayCode::Mo, DayCode::We]);
    }

    #[test]
    fn step_is_calendar_naive() {
        let rule: RecurrenceRule = "FREQ=MONTHLY;INTERVAL=2;COUNT=1".parse().unwrap();
        assert_eq!(rule.step_days(), 60);
        let rule: RecurrenceRule = "FREQ=YEARLY;COUNT=1".parse().unwrap();
        assert_eq!(rule.step_days(), 365);
    }

    #[test]
    fn until_accepts_datetime_suffix() {
        let rule: RecurrenceRule = "FREQ=DAILY;UNTIL=20241231T235959Z".parse().unwrap();
        assert_eq!(
            rule.terminator,
            Terminator::Until(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
        );
    }
}
