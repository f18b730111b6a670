// dqt-core/src/application/rules.rs

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::rules::{
    ActivationStatus, Condition, FieldValue, Rule, RuleEvaluator, RuleType, Verdict,
};
use crate::error::DqtError;
use crate::ports::Repository;

/// Everything needed to define a new rule. The id is assigned on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub rule_type: RuleType,
    pub conditions: Condition,
}

/// Partial edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rule_type: Option<RuleType>,
    pub conditions: Option<Condition>,
    pub status: Option<ActivationStatus>,
}

#[instrument(skip(repo, draft), fields(name = %draft.name))]
pub async fn create_rule(repo: &dyn Repository<Rule>, draft: RuleDraft) -> Result<Rule, DqtError> {
    let mut rule = Rule::new(Uuid::new_v4().to_string(), draft.name, draft.conditions);
    rule.description = draft.description;
    rule.rule_type = draft.rule_type;

    let created = repo.create(rule).await?;
    info!(id = %created.id, "Rule created");
    Ok(created)
}

/// Applies the patch as a whole: an invalid result leaves the stored rule untouched.
#[instrument(skip(repo, patch))]
pub async fn update_rule(
    repo: &dyn Repository<Rule>,
    id: &str,
    patch: RulePatch,
) -> Result<Rule, DqtError> {
    repo.modify(id, &|rule: &mut Rule| -> Result<(), DomainError> {
        if let Some(name) = &patch.name {
            rule.name = name.clone();
        }
        if let Some(description) = &patch.description {
            rule.description = description.clone();
        }
        if let Some(rule_type) = patch.rule_type {
            rule.rule_type = rule_type;
        }
        if let Some(conditions) = &patch.conditions {
            rule.conditions = conditions.clone();
        }
        if let Some(status) = patch.status {
            rule.status = status;
        }
        Ok(())
    })
    .await
}

/// Flips active/paused and returns the stored rule.
#[instrument(skip(repo))]
pub async fn toggle_rule(repo: &dyn Repository<Rule>, id: &str) -> Result<Rule, DqtError> {
    let rule = repo
        .modify(id, &|rule: &mut Rule| -> Result<(), DomainError> {
            rule.status = rule.status.toggled();
            Ok(())
        })
        .await?;
    info!(status = ?rule.status, "Rule toggled");
    Ok(rule)
}

#[instrument(skip(repo))]
pub async fn delete_rule(repo: &dyn Repository<Rule>, id: &str) -> Result<Rule, DqtError> {
    repo.delete(id).await
}

/// Evaluates one rule against a sample value and counts the application in
/// the store. Paused rules can still be tested.
#[instrument(skip(repo, evaluator, value))]
pub async fn test_rule(
    repo: &dyn Repository<Rule>,
    evaluator: &RuleEvaluator,
    id: &str,
    value: &FieldValue,
) -> Result<Verdict, DqtError> {
    let rule = fetch(repo, id).await?;
    let verdict = evaluator.evaluate(&rule, value)?;
    repo.modify(id, &record_application).await?;
    Ok(verdict)
}

/// Store-side `applied_count` bump. Counts never go down.
pub(crate) fn record_application(rule: &mut Rule) -> Result<(), DomainError> {
    rule.applied_count += 1;
    Ok(())
}

async fn fetch(repo: &dyn Repository<Rule>, id: &str) -> Result<Rule, DqtError> {
    repo.get(id).await?.ok_or_else(|| {
        DomainError::NotFound {
            kind: "Rule",
            id: id.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rules::{Operator, Severity, VerdictStatus};
    use crate::infrastructure::store::InMemoryRepository;
    use anyhow::Result;

    fn email_draft() -> RuleDraft {
        RuleDraft {
            name: "Email Format".into(),
            description: "Customer emails must look like emails".into(),
            rule_type: RuleType::DataValidation,
            conditions: Condition::new("email", Operator::Regex)
                .with_value(r"^[^@\s]+@[^@\s]+\.[a-z]{2,}$")
                .with_severity(Severity::Error),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() -> Result<()> {
        let repo: InMemoryRepository<Rule> = InMemoryRepository::new();
        let a = create_rule(&repo, email_draft()).await?;
        let b = create_rule(&repo, email_draft()).await?;

        assert_ne!(a.id, b.id);
        assert_eq!(a.applied_count, 0);
        assert!(a.is_active());
        assert_eq!(repo.list().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let repo: InMemoryRepository<Rule> = InMemoryRepository::new();
        let mut draft = email_draft();
        draft.conditions = Condition::new("email", Operator::Regex).with_value("(");

        let err = create_rule(&repo, draft).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidRule { .. })));
    }

    #[tokio::test]
    async fn test_update_is_all_or_nothing() -> Result<()> {
        let repo: InMemoryRepository<Rule> = InMemoryRepository::new();
        let rule = create_rule(&repo, email_draft()).await?;

        let patch = RulePatch {
            name: Some("Renamed".into()),
            conditions: Some(Condition::new("amount", Operator::Range)),
            ..RulePatch::default()
        };
        assert!(update_rule(&repo, &rule.id, patch).await.is_err());
        assert_eq!(repo.get(&rule.id).await?.unwrap().name, "Email Format");

        let patch = RulePatch {
            name: Some("Renamed".into()),
            ..RulePatch::default()
        };
        let updated = update_rule(&repo, &rule.id, patch).await?;
        assert_eq!(updated.name, "Renamed");
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_status() -> Result<()> {
        let repo: InMemoryRepository<Rule> = InMemoryRepository::new();
        let rule = create_rule(&repo, email_draft()).await?;

        assert_eq!(toggle_rule(&repo, &rule.id).await?.status, ActivationStatus::Paused);
        assert_eq!(toggle_rule(&repo, &rule.id).await?.status, ActivationStatus::Active);
        Ok(())
    }

    #[tokio::test]
    async fn test_rule_test_counts_applications() -> Result<()> {
        let repo: InMemoryRepository<Rule> = InMemoryRepository::new();
        let evaluator = RuleEvaluator::default();
        let rule = create_rule(&repo, email_draft()).await?;

        let ok = test_rule(&repo, &evaluator, &rule.id, &"ana@example.com".into()).await?;
        let ko = test_rule(&repo, &evaluator, &rule.id, &"not-an-email".into()).await?;
        assert_eq!(ok.status, VerdictStatus::Passed);
        assert_eq!(ko.status, VerdictStatus::Failed);

        // a type error is not an application
        let list = FieldValue::from(vec!["a@b.io"]);
        let err = test_rule(&repo, &evaluator, &rule.id, &list).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::TypeMismatch { .. })));

        let stored = repo.get(&rule.id).await?.unwrap();
        assert_eq!(stored.applied_count, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_rule() {
        let repo: InMemoryRepository<Rule> = InMemoryRepository::new();
        let err = delete_rule(&repo, "ghost").await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::NotFound { .. })));
    }
}
