// dqt-core/src/domain/schedule/task.rs

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::rules::ActivationStatus;
use crate::domain::schedule::recurrence::{Frequency, Recurrence, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    pub time: TimeOfDay,
    /// Weekday name for weekly tasks, ordinal ("1st") for monthly ones.
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub status: ActivationStatus,
    /// `None` until the first execution.
    #[serde(default)]
    pub last_run: Option<NaiveDateTime>,
    pub next_run: NaiveDateTime,
}

/// Fields an edit may change. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub time: Option<TimeOfDay>,
    pub day: Option<String>,
    pub status: Option<ActivationStatus>,
}

impl ScheduledTask {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        frequency: Frequency,
        time: TimeOfDay,
        day: impl Into<String>,
        now: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        let day = day.into();
        let next_run = Recurrence::new(frequency, time, &day)?.next_after(now)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            frequency,
            time,
            day,
            status: ActivationStatus::Active,
            last_run: None,
            next_run,
        })
    }

    pub fn recurrence(&self) -> Result<Recurrence, DomainError> {
        Recurrence::new(self.frequency, self.time, &self.day)
    }

    pub fn is_active(&self) -> bool {
        self.status == ActivationStatus::Active
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.is_active() && self.next_run <= now
    }

    pub fn reschedule(&mut self, from: NaiveDateTime) -> Result<(), DomainError> {
        self.next_run = self.recurrence()?.next_after(from)?;
        Ok(())
    }

    /// Applies an edit and recomputes `next_run`. The task is left untouched
    /// when the new recurrence is invalid.
    pub fn edit(&mut self, patch: TaskPatch, now: NaiveDateTime) -> Result<(), DomainError> {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(frequency) = patch.frequency {
            updated.frequency = frequency;
        }
        if let Some(time) = patch.time {
            updated.time = time;
        }
        if let Some(day) = patch.day {
            updated.day = day;
        }
        if let Some(status) = patch.status {
            updated.status = status;
        }
        updated.reschedule(now)?;
        *self = updated;
        Ok(())
    }

    pub fn toggle(&mut self, now: NaiveDateTime) -> Result<ActivationStatus, DomainError> {
        self.reschedule(now)?;
        self.status = self.status.toggled();
        Ok(self.status)
    }

    /// Manual or scheduled execution at `now`.
    pub fn mark_executed(&mut self, now: NaiveDateTime) -> Result<(), DomainError> {
        self.reschedule(now)?;
        self.last_run = Some(now);
        Ok(())
    }
}

/// Active tasks whose next run falls within `window` of `now`, soonest first.
pub fn upcoming(tasks: &[ScheduledTask], now: NaiveDateTime, window: Duration) -> Vec<&ScheduledTask> {
    let horizon = now + window;
    let mut selected: Vec<&ScheduledTask> = tasks
        .iter()
        .filter(|t| t.is_active() && t.next_run <= horizon)
        .collect();
    selected.sort_by_key(|t| t.next_run);
    selected
}

/// Active tasks whose next run is not in the future.
pub fn due(tasks: &[ScheduledTask], now: NaiveDateTime) -> Vec<&ScheduledTask> {
    let mut selected: Vec<&ScheduledTask> = tasks.iter().filter(|t| t.is_due(now)).collect();
    selected.sort_by_key(|t| t.next_run);
    selected
}
