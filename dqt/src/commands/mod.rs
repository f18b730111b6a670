// dqt/src/commands/mod.rs

pub mod check;
pub mod history;
pub mod rules;
pub mod schedule;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use std::path::Path;

use dqt_core::infrastructure::config::{ProjectConfig, load_project_config};

pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn format_instant(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
