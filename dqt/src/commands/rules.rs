// dqt/src/commands/rules.rs
//
// USE CASE: Inspect and manage quality rules.

use std::path::{Path, PathBuf};

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};
use dqt_core::application::{test_rule, toggle_rule};
use dqt_core::domain::rules::{FieldValue, Rule, RuleEvaluator};
use dqt_core::infrastructure::store::YamlRepository;
use dqt_core::ports::Repository;

use super::load_config;

fn open(project_dir: &Path) -> anyhow::Result<(YamlRepository<Rule>, RuleEvaluator)> {
    let config = load_config(project_dir)?;
    Ok((
        YamlRepository::new(config.rules_file(project_dir)),
        RuleEvaluator::new(config.evaluation),
    ))
}

pub async fn list(project_dir: PathBuf) -> anyhow::Result<()> {
    let (repo, _) = open(&project_dir)?;
    let rules = repo
        .list()
        .await
        .with_context(|| format!("Failed to load rules from {:?}", repo.path()))?;

    if rules.is_empty() {
        println!("No rules defined in {}", repo.path().display());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Id", "Name", "Type", "Field", "Operator", "Severity", "Status", "Applied",
    ]);
    for rule in &rules {
        table.add_row(vec![
            rule.id.clone(),
            rule.name.clone(),
            rule.rule_type.to_string(),
            rule.conditions.field.clone(),
            rule.conditions.operator.to_string(),
            rule.severity().to_string(),
            rule.status.to_string(),
            rule.applied_count.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn toggle(project_dir: PathBuf, id: String) -> anyhow::Result<()> {
    let (repo, _) = open(&project_dir)?;
    let rule = toggle_rule(&repo, &id)
        .await
        .with_context(|| format!("Failed to toggle rule '{}'", id))?;
    println!("Rule '{}' status changed to {}", rule.name, rule.status);
    Ok(())
}

pub async fn test(project_dir: PathBuf, id: String, value: String) -> anyhow::Result<()> {
    let (repo, evaluator) = open(&project_dir)?;
    let sample = parse_sample(&value);

    let verdict = test_rule(&repo, &evaluator, &id, &sample)
        .await
        .with_context(|| format!("Failed to test rule '{}'", id))?;

    let mark = if verdict.passed() { "✅" } else { "❌" };
    println!(
        "{} {} [{}] on {}: {}",
        mark, verdict.rule_name, verdict.severity, verdict.field, verdict.status
    );
    println!("   {}", verdict.detail);
    Ok(())
}

/// JSON literals keep their type; anything else is taken as plain text.
fn parse_sample(raw: &str) -> FieldValue {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(FieldValue::from)
        .unwrap_or_else(|_| FieldValue::from(raw))
}
