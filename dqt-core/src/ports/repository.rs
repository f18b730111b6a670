// dqt-core/src/ports/repository.rs

// Storage contracts for the orchestrator side. The domain layer never calls
// these: services load value objects, hand them to pure functions, and write
// the results back.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::report::QualityReport;
use crate::domain::rules::Rule;
use crate::domain::schedule::ScheduledTask;
use crate::error::DqtError;

/// Anything a [`Repository`] can hold.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Label used in not-found and duplicate errors.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Invariant check run by adapters on every item they load or store.
    fn check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

impl Entity for Rule {
    const KIND: &'static str = "Rule";

    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), DomainError> {
        Rule::check(self)
    }
}

impl Entity for ScheduledTask {
    const KIND: &'static str = "Task";

    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), DomainError> {
        self.recurrence().map(|_| ())
    }
}

/// In-place edit handed to [`Repository::modify_all`].
pub type Edit<'a, T> = dyn Fn(&mut T) -> Result<(), DomainError> + Send + Sync + 'a;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn create(&self, item: T) -> Result<T, DqtError>;

    /// Replaces the stored item with the same id.
    async fn update(&self, item: T) -> Result<T, DqtError>;

    /// Removes and returns the item.
    async fn delete(&self, id: &str) -> Result<T, DqtError>;

    async fn get(&self, id: &str) -> Result<Option<T>, DqtError>;

    /// All items in insertion order.
    async fn list(&self) -> Result<Vec<T>, DqtError>;

    /// Runs `edit` on each listed item and saves the results, all under the
    /// store's write lock. Edited items are validated. If any id is unknown or
    /// any edit fails, nothing is saved.
    async fn modify_all(&self, ids: &[&str], edit: &Edit<'_, T>) -> Result<Vec<T>, DqtError>;

    /// [`Repository::modify_all`] for a single item.
    async fn modify(&self, id: &str, edit: &Edit<'_, T>) -> Result<T, DqtError> {
        self.modify_all(&[id], edit).await?.pop().ok_or_else(|| {
            DomainError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

/// A report as stored by the orchestrator: identity and timestamp are added
/// around the immutable domain report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    pub dataset: String,
    pub created_at: NaiveDateTime,
    pub report: QualityReport,
}

#[async_trait]
pub trait ReportHistory: Send + Sync {
    /// Appends a record. Existing records are never rewritten.
    async fn append(&self, record: ReportRecord) -> Result<(), DqtError>;

    /// Oldest first.
    async fn list(&self) -> Result<Vec<ReportRecord>, DqtError>;
}
