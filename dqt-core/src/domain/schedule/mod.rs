// dqt-core/src/domain/schedule/mod.rs

pub mod calculator;
pub mod recurrence;
pub mod task;

pub use calculator::next_run;
pub use recurrence::{DaySelector, Frequency, Recurrence, TimeOfDay};
pub use task::{ScheduledTask, TaskPatch, due, upcoming};
