// dqt/src/commands/history.rs
//
// USE CASE: List past quality reports.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};
use dqt_core::infrastructure::store::JsonHistory;
use dqt_core::ports::ReportHistory;

use super::{format_instant, load_config};

pub async fn execute(project_dir: PathBuf, limit: Option<usize>) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let history = JsonHistory::new(config.history_file(&project_dir));
    let records = history
        .list()
        .await
        .with_context(|| format!("Failed to read report history at {:?}", history.path()))?;

    if records.is_empty() {
        println!("No reports yet. Run 'dqt check' first.");
        return Ok(());
    }

    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Date", "Dataset", "Score", "Status", "Checks", "Passed", "Warning", "Failed",
    ]);
    // Newest first.
    for record in records.iter().skip(skip).rev() {
        let summary = record.report.summary();
        table.add_row(vec![
            format_instant(record.created_at),
            record.dataset.clone(),
            format!("{:.2}%", record.report.overall_score()),
            record.report.overall_status().to_string(),
            summary.total_checks.to_string(),
            summary.passed.to_string(),
            summary.warnings.to_string(),
            summary.failed.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
