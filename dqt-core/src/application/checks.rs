// dqt-core/src/application/checks.rs

use chrono::NaiveDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::report::{Check, aggregate};
use crate::application::rules::record_application;
use crate::domain::rules::{Record, Rule, RuleEvaluator, Verdict};
use crate::error::DqtError;
use crate::ports::{ReportHistory, ReportRecord, Repository};

/// One check-run over a dataset.
///
/// Every active rule is evaluated over `records`. Verdicts are grouped into one
/// check per rule type (in the order the types first appear), the checks are
/// aggregated, and the resulting report is appended to `history`.
///
/// Evaluation errors abort the run before anything is written. Once the report
/// is built, the `applied_count` of every evaluated rule is bumped in a single
/// store write, then the report is appended.
#[instrument(skip(repo, history, evaluator, records), fields(rows = records.len()))]
pub async fn run_checks(
    repo: &dyn Repository<Rule>,
    history: &dyn ReportHistory,
    evaluator: &RuleEvaluator,
    dataset: &str,
    records: &[Record],
    now: NaiveDateTime,
) -> Result<ReportRecord, DqtError> {
    let rules: Vec<Rule> = repo.list().await?.into_iter().filter(Rule::is_active).collect();
    info!(rules = rules.len(), "Running quality checks");

    let mut groups: Vec<(&'static str, Vec<Verdict>)> = Vec::new();
    for rule in &rules {
        let verdict = evaluator.evaluate_records(rule, records)?;
        if !verdict.passed() {
            warn!(rule = %rule.name, detail = %verdict.detail, "Rule failed");
        }

        let name = rule.rule_type.check_name();
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, verdicts)) => verdicts.push(verdict),
            None => groups.push((name, vec![verdict])),
        }
    }

    let checks = groups
        .into_iter()
        .map(|(name, verdicts)| Check::from_verdicts(name, verdicts))
        .collect::<Result<Vec<_>, _>>()?;
    let report = aggregate(checks)?;

    let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
    repo.modify_all(&ids, &record_application).await?;

    let record = ReportRecord {
        id: Uuid::new_v4().to_string(),
        dataset: dataset.to_string(),
        created_at: now,
        report,
    };
    history.append(record.clone()).await?;

    info!(
        score = record.report.overall_score(),
        status = %record.report.overall_status(),
        "Check-run complete"
    );
    Ok(record)
}
