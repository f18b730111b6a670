// dqt/src/commands/schedule.rs
//
// USE CASE: Compute run times and manage scheduled check-runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use comfy_table::{Table, presets::UTF8_FULL};
use dqt_core::application::{run_task_now, toggle_task, upcoming_tasks};
use dqt_core::domain::schedule::{Recurrence, ScheduledTask};
use dqt_core::infrastructure::store::YamlRepository;
use dqt_core::ports::Repository;

use super::{format_instant, load_config, now};

const FROM_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn open(project_dir: &Path) -> anyhow::Result<YamlRepository<ScheduledTask>> {
    let config = load_config(project_dir)?;
    Ok(YamlRepository::new(config.schedules_file(project_dir)))
}

fn print_tasks(tasks: &[ScheduledTask]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Id", "Name", "Frequency", "Time", "Day", "Status", "Last run", "Next run",
    ]);
    for task in tasks {
        table.add_row(vec![
            task.id.clone(),
            task.name.clone(),
            task.frequency.to_string(),
            task.time.to_string(),
            task.day.clone(),
            task.status.to_string(),
            task.last_run.map(format_instant).unwrap_or_else(|| "-".to_string()),
            format_instant(task.next_run),
        ]);
    }
    println!("{table}");
}

pub fn next(
    frequency: String,
    time: String,
    day: String,
    from: Option<String>,
) -> anyhow::Result<()> {
    let reference = match from {
        Some(raw) => NaiveDateTime::parse_from_str(&raw, FROM_FORMAT)
            .with_context(|| format!("Invalid --from '{}', expected YYYY-MM-DDTHH:MM", raw))?,
        None => now(),
    };
    let recurrence = Recurrence::parse(&frequency, &time, &day)?;
    let next_run = recurrence.next_after(reference)?;
    println!("Next run: {}", format_instant(next_run));
    Ok(())
}

pub async fn list(project_dir: PathBuf) -> anyhow::Result<()> {
    let repo = open(&project_dir)?;
    let tasks = repo
        .list()
        .await
        .with_context(|| format!("Failed to load tasks from {:?}", repo.path()))?;
    if tasks.is_empty() {
        println!("No scheduled tasks in {}", repo.path().display());
        return Ok(());
    }
    print_tasks(&tasks);
    Ok(())
}

pub async fn run(project_dir: PathBuf, id: String) -> anyhow::Result<()> {
    let repo = open(&project_dir)?;
    let task = run_task_now(&repo, &id, now())
        .await
        .with_context(|| format!("Failed to run task '{}'", id))?;
    println!(
        "Task '{}' executed. Next run: {}",
        task.name,
        format_instant(task.next_run)
    );
    Ok(())
}

pub async fn toggle(project_dir: PathBuf, id: String) -> anyhow::Result<()> {
    let repo = open(&project_dir)?;
    let task = toggle_task(&repo, &id, now())
        .await
        .with_context(|| format!("Failed to toggle task '{}'", id))?;
    println!("Task '{}' status changed to {}", task.name, task.status);
    Ok(())
}

pub async fn upcoming(project_dir: PathBuf, hours: u32) -> anyhow::Result<()> {
    let repo = open(&project_dir)?;
    let tasks = upcoming_tasks(&repo, now(), hours).await?;
    if tasks.is_empty() {
        println!("No active task due within {}h", hours);
        return Ok(());
    }
    print_tasks(&tasks);
    Ok(())
}
