// dqt-core/src/application/scheduling.rs

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::schedule::{Frequency, ScheduledTask, TaskPatch, TimeOfDay, upcoming};
use crate::error::DqtError;
use crate::ports::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    pub time: TimeOfDay,
    #[serde(default)]
    pub day: String,
}

#[instrument(skip(repo, draft), fields(name = %draft.name))]
pub async fn create_task(
    repo: &dyn Repository<ScheduledTask>,
    draft: TaskDraft,
    now: NaiveDateTime,
) -> Result<ScheduledTask, DqtError> {
    let mut task = ScheduledTask::new(
        Uuid::new_v4().to_string(),
        draft.name,
        draft.frequency,
        draft.time,
        draft.day,
        now,
    )?;
    task.description = draft.description;

    let created = repo.create(task).await?;
    info!(id = %created.id, next_run = %created.next_run, "Task scheduled");
    Ok(created)
}

/// Edits a task. `next_run` is always recomputed from `now`.
#[instrument(skip(repo, patch))]
pub async fn update_task(
    repo: &dyn Repository<ScheduledTask>,
    id: &str,
    patch: TaskPatch,
    now: NaiveDateTime,
) -> Result<ScheduledTask, DqtError> {
    repo.modify(id, &|task: &mut ScheduledTask| -> Result<(), DomainError> {
        task.edit(patch.clone(), now)
    })
    .await
}

#[instrument(skip(repo))]
pub async fn toggle_task(
    repo: &dyn Repository<ScheduledTask>,
    id: &str,
    now: NaiveDateTime,
) -> Result<ScheduledTask, DqtError> {
    let task = repo
        .modify(id, &|task: &mut ScheduledTask| -> Result<(), DomainError> {
            task.toggle(now).map(|_| ())
        })
        .await?;
    info!(status = ?task.status, "Task toggled");
    Ok(task)
}

/// Records a manual run at `now` and moves `next_run` forward.
/// Works on paused tasks too.
#[instrument(skip(repo))]
pub async fn run_task_now(
    repo: &dyn Repository<ScheduledTask>,
    id: &str,
    now: NaiveDateTime,
) -> Result<ScheduledTask, DqtError> {
    let task = repo
        .modify(id, &|task: &mut ScheduledTask| -> Result<(), DomainError> {
            task.mark_executed(now)
        })
        .await?;
    info!(name = %task.name, next_run = %task.next_run, "Task executed");
    Ok(task)
}

#[instrument(skip(repo))]
pub async fn delete_task(
    repo: &dyn Repository<ScheduledTask>,
    id: &str,
) -> Result<ScheduledTask, DqtError> {
    repo.delete(id).await
}

/// Active tasks due within `hours` of `now`, soonest first.
pub async fn upcoming_tasks(
    repo: &dyn Repository<ScheduledTask>,
    now: NaiveDateTime,
    hours: u32,
) -> Result<Vec<ScheduledTask>, DqtError> {
    let tasks = repo.list().await?;
    Ok(upcoming(&tasks, now, Duration::hours(i64::from(hours)))
        .into_iter()
        .cloned()
        .collect())
}
