// dqt-core/src/domain/schedule/recurrence.rs

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(DomainError::InvalidRecurrence(format!(
                "unknown frequency '{}' (expected daily, weekly or monthly)",
                other
            ))),
        }
    }
}

/// Local wall-clock time of day, written `HH:MM` (24-hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, DomainError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| {
                DomainError::InvalidRecurrence(format!("invalid time {}:{}", hour, minute))
            })
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| DomainError::InvalidRecurrence(format!("invalid time '{}' (expected HH:MM)", s)))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Resolved meaning of a task's `day` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    /// Daily tasks ignore the day entirely.
    Any,
    Weekday(Weekday),
    /// 1-based day of month; clamped to the month length when scheduling.
    MonthDay(u32),
}

/// A validated (frequency, time, day) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub time: TimeOfDay,
    pub day: DaySelector,
}

impl Recurrence {
    pub fn new(frequency: Frequency, time: TimeOfDay, day: &str) -> Result<Self, DomainError> {
        let day = match frequency {
            Frequency::Daily => DaySelector::Any,
            Frequency::Weekly => DaySelector::Weekday(parse_weekday(day)),
            Frequency::Monthly => DaySelector::MonthDay(parse_ordinal(day)?),
        };
        Ok(Self {
            frequency,
            time,
            day,
        })
    }

    /// Parses the raw strings stored on a task.
    pub fn parse(frequency: &str, time: &str, day: &str) -> Result<Self, DomainError> {
        Self::new(frequency.parse()?, time.parse()?, day)
    }
}

/// Weekday names or abbreviations, case-insensitive. Anything else falls back
/// to Monday, the first day of the week.
pub fn parse_weekday(day: &str) -> Weekday {
    match day.trim().parse::<Weekday>() {
        Ok(wd) => wd,
        Err(_) => {
            warn!(day = %day, "Unrecognized weekday, falling back to monday");
            Weekday::Mon
        }
    }
}

/// `"1st"`, `"22nd"`, `"3rd"`, `"15th"` or a bare `"15"`.
pub fn parse_ordinal(day: &str) -> Result<u32, DomainError> {
    let lowered = day.trim().to_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lowered.strip_suffix(suffix))
        .unwrap_or(&lowered);

    match digits.parse::<u32>() {
        Ok(n) if (1..=31).contains(&n) => Ok(n),
        _ => Err(DomainError::InvalidRecurrence(format!(
            "invalid day of month '{}' (expected 1st to 31st)",
            day
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!(matches!(
            "hourly".parse::<Frequency>(),
            Err(DomainError::InvalidRecurrence(_))
        ));
    }

    #[test]
    fn test_time_of_day() {
        let t: TimeOfDay = "06:00".parse().unwrap();
        assert_eq!(t.to_string(), "06:00");
        assert_eq!(TimeOfDay::new(23, 59).unwrap().to_string(), "23:59");
        assert!("25:00".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert!(TimeOfDay::new(12, 60).is_err());
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(parse_ordinal("1st").unwrap(), 1);
        assert_eq!(parse_ordinal("22nd").unwrap(), 22);
        assert_eq!(parse_ordinal("3RD").unwrap(), 3);
        assert_eq!(parse_ordinal("15").unwrap(), 15);
        assert!(parse_ordinal("0th").is_err());
        assert!(parse_ordinal("32nd").is_err());
        assert!(parse_ordinal("monday").is_err());
    }

    #[test]
    fn test_weekday_fallback() {
        assert_eq!(parse_weekday("Friday"), Weekday::Fri);
        assert_eq!(parse_weekday("sun"), Weekday::Sun);
        assert_eq!(parse_weekday("someday"), Weekday::Mon);
    }

    #[test]
    fn test_recurrence_day_interpretation() {
        let daily = Recurrence::parse("daily", "09:00", "whatever").unwrap();
        assert_eq!(daily.day, DaySelector::Any);

        let weekly = Recurrence::parse("weekly", "09:00", "wednesday").unwrap();
        assert_eq!(weekly.day, DaySelector::Weekday(Weekday::Wed));

        assert!(Recurrence::parse("monthly", "09:00", "monday").is_err());
        assert!(Recurrence::parse("yearly", "09:00", "1st").is_err());
    }

    #[test]
    fn test_time_serde_roundtrip_shape() -> anyhow::Result<()> {
        let t: TimeOfDay = serde_yaml::from_str("'07:30'")?;
        assert_eq!(serde_json::to_string(&t)?, "\"07:30\"");
        Ok(())
    }
}
