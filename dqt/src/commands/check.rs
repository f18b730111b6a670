// dqt/src/commands/check.rs
//
// USE CASE: Run every active rule over a dataset and record the report.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use comfy_table::{Table, presets::UTF8_FULL};
use dqt_core::application::run_checks;
use dqt_core::domain::report::QualityStatus;
use dqt_core::domain::rules::{Rule, RuleEvaluator, records_from_json};
use dqt_core::infrastructure::store::{JsonHistory, YamlRepository};

use super::{load_config, now};

pub async fn execute(
    project_dir: PathBuf,
    data: PathBuf,
    dataset: Option<String>,
) -> anyhow::Result<()> {
    println!("⚙️  Loading configuration...");
    let config = load_config(&project_dir)?;
    println!("   Project: {} (v{})", config.name, config.version);

    let data_path = if data.is_absolute() {
        data
    } else {
        project_dir.join(data)
    };
    let raw = fs::read_to_string(&data_path)
        .with_context(|| format!("Failed to read dataset at {:?}", data_path))?;
    let json: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Dataset {:?} is not valid JSON", data_path))?;
    let records = records_from_json(json).map_err(|row| {
        anyhow!(
            "Dataset {:?} must be an array of objects (entry {} is not)",
            data_path,
            row
        )
    })?;

    let dataset = dataset.unwrap_or_else(|| {
        data_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    });
    println!("🔎 Checking '{}' ({} records)...", dataset, records.len());

    let rules: YamlRepository<Rule> = YamlRepository::new(config.rules_file(&project_dir));
    let history = JsonHistory::new(config.history_file(&project_dir));
    let evaluator = RuleEvaluator::new(config.evaluation.clone());

    let record = run_checks(&rules, &history, &evaluator, &dataset, &records, now())
        .await
        .context("Check-run failed")?;
    let report = &record.report;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Check", "Rule", "Status", "Score", "Detail"]);
    for check in report.checks() {
        for verdict in &check.verdicts {
            table.add_row(vec![
                check.name.clone(),
                verdict.rule_name.clone(),
                verdict.status.to_string(),
                format!("{:.1}%", verdict.score * 100.0),
                verdict.detail.clone(),
            ]);
        }
    }
    println!("{table}");

    let summary = report.summary();
    println!(
        "   Checks: {} passed, {} warning, {} failed",
        summary.passed, summary.warnings, summary.failed
    );
    println!(
        "Overall score: {:.2}% ({})",
        report.overall_score(),
        report.overall_status()
    );

    if report.overall_status() == QualityStatus::Failed {
        eprintln!("\n❌ FAILURE. Data quality is below the warning threshold.");
        // Exit with error code for CI/CD
        std::process::exit(1);
    }
    Ok(())
}
