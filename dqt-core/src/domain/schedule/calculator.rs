// dqt-core/src/domain/schedule/calculator.rs

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::domain::error::DomainError;
use crate::domain::schedule::recurrence::{DaySelector, Frequency, Recurrence, TimeOfDay};

/// Next execution instant for a (frequency, time, day) triple, strictly after
/// `reference`. Pure: the same inputs always give the same instant.
pub fn next_run(
    frequency: Frequency,
    time: TimeOfDay,
    day: &str,
    reference: NaiveDateTime,
) -> Result<NaiveDateTime, DomainError> {
    Recurrence::new(frequency, time, day)?.next_after(reference)
}

impl Recurrence {
    pub fn next_after(&self, reference: NaiveDateTime) -> Result<NaiveDateTime, DomainError> {
        let today = reference.date();
        let date = match self.day {
            // Never same-day: "next" stays stable for tasks that are already scheduled.
            DaySelector::Any => add_days(today, 1)?,
            DaySelector::Weekday(target) => {
                let current = today.weekday().num_days_from_monday();
                let wanted = target.num_days_from_monday();
                let ahead = match (wanted + 7 - current) % 7 {
                    0 => 7,
                    n => n,
                };
                add_days(today, u64::from(ahead))?
            }
            DaySelector::MonthDay(ordinal) => {
                let mut candidate = month_day(next_month_start(today)?, ordinal)?;
                // Clamping can only pull the date back inside its own month,
                // but the result must still land after the reference.
                while candidate.and_time(self.time.as_naive()) <= reference {
                    let start = NaiveDate::from_ymd_opt(candidate.year(), candidate.month(), 1)
                        .ok_or_else(out_of_range)?;
                    candidate = month_day(next_month_start(start)?, ordinal)?;
                }
                candidate
            }
        };
        Ok(date.and_time(self.time.as_naive()))
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, DomainError> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(out_of_range)
}

fn next_month_start(date: NaiveDate) -> Result<NaiveDate, DomainError> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)
}

/// `ordinal` within the month of `month_start`, clamped to the month's last day.
fn month_day(month_start: NaiveDate, ordinal: u32) -> Result<NaiveDate, DomainError> {
    let last_day = next_month_start(month_start)?
        .pred_opt()
        .ok_or_else(out_of_range)?
        .day();
    NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), ordinal.min(last_day))
        .ok_or_else(out_of_range)
}

fn out_of_range() -> DomainError {
    DomainError::InvalidRecurrence("date out of supported range".to_string())
}
