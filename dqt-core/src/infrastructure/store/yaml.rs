// dqt-core/src/infrastructure/store/yaml.rs

use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::DqtError;
use crate::infrastructure::fs::{read_yaml, write_yaml};
use crate::infrastructure::store::memory::{edit_each, insert, remove, replace};
use crate::ports::{Edit, Entity, Repository};

/// Repository backed by a YAML sequence on disk (`config/rules.yml`,
/// `config/schedules.yml`). Every mutation rewrites the file atomically.
pub struct YamlRepository<T> {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> YamlRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the whole file. A missing file is an empty store.
    fn load(&self) -> Result<Vec<T>, DqtError> {
        let items: Vec<T> = read_yaml(&self.path)?.unwrap_or_default();
        let mut checked = Vec::with_capacity(items.len());
        for item in items {
            insert(&mut checked, item)?;
        }
        debug!(path = ?self.path, count = checked.len(), kind = T::KIND, "Store loaded");
        Ok(checked)
    }

    fn save(&self, items: &[T]) -> Result<(), DqtError> {
        write_yaml(&self.path, &items)?;
        debug!(path = ?self.path, count = items.len(), kind = T::KIND, "Store saved");
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for YamlRepository<T> {
    async fn create(&self, item: T) -> Result<T, DqtError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load()?;
        let created = insert(&mut items, item)?;
        self.save(&items)?;
        Ok(created)
    }

    async fn update(&self, item: T) -> Result<T, DqtError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load()?;
        let updated = replace(&mut items, item)?;
        self.save(&items)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<T, DqtError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load()?;
        let removed = remove(&mut items, id)?;
        self.save(&items)?;
        Ok(removed)
    }

    async fn get(&self, id: &str) -> Result<Option<T>, DqtError> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.into_iter().find(|i| i.id() == id))
    }

    async fn list(&self) -> Result<Vec<T>, DqtError> {
        let _guard = self.lock.lock().await;
        self.load()
    }

    async fn modify_all(&self, ids: &[&str], edit: &Edit<'_, T>) -> Result<Vec<T>, DqtError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load()?;
        let edited = edit_each(&mut items, ids, edit)?;
        self.save(&items)?;
        Ok(edited)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::rules::{Condition, Operator, Rule, Severity};
    use crate::domain::schedule::{Frequency, ScheduledTask, TimeOfDay};
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rules_survive_reload() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config/rules.yml");

        let repo: YamlRepository<Rule> = YamlRepository::new(&path);
        let rule = Rule::new(
            "email-format",
            "Email Format",
            Condition::new("email", Operator::Regex)
                .with_value(r"^[^@\s]+@[^@\s]+\.[a-z]+$")
                .with_severity(Severity::Warning),
        );
        repo.create(rule.clone()).await?;

        let reopened: YamlRepository<Rule> = YamlRepository::new(&path);
        assert_eq!(reopened.list().await?, vec![rule]);
        Ok(())
    }

    #[tokio::test]
    async fn test_hand_written_file_is_validated() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("rules.yml");
        fs::write(
            &path,
            r#"
- id: r1
  name: Broken Pattern
  conditions:
    field: email
    operator: regex
    value: "[unclosed"
"#,
        )?;

        let repo: YamlRepository<Rule> = YamlRepository::new(&path);
        let err = repo.list().await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidRule { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_modify_rewrites_file_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("rules.yml");
        let repo: YamlRepository<Rule> = YamlRepository::new(&path);
        repo.create(Rule::new(
            "adult",
            "Adult",
            Condition::new("age", Operator::Range).with_bounds(Some(18.0), None),
        ))
        .await?;

        let edited = repo
            .modify("adult", &|r: &mut Rule| -> Result<(), DomainError> {
                r.applied_count += 3;
                Ok(())
            })
            .await?;
        assert_eq!(edited.applied_count, 3);

        let reopened: YamlRepository<Rule> = YamlRepository::new(&path);
        assert_eq!(reopened.get("adult").await?.unwrap().applied_count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_tasks_delete() -> Result<()> {
        let dir = tempdir()?;
        let repo: YamlRepository<ScheduledTask> =
            YamlRepository::new(dir.path().join("schedules.yml"));
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let task = ScheduledTask::new(
            "t1",
            "Nightly",
            Frequency::Daily,
            TimeOfDay::new(2, 0)?,
            "",
            now,
        )?;
        repo.create(task).await?;

        repo.delete("t1").await?;
        assert!(repo.list().await?.is_empty());
        assert!(repo.get("t1").await?.is_none());
        Ok(())
    }
}
