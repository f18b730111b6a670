// dqt-core/src/infrastructure/store/memory.rs

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::error::DomainError;
use crate::error::DqtError;
use crate::ports::{Edit, Entity, ReportHistory, ReportRecord, Repository};

// Collection edits shared by every repository adapter. Each one validates the
// item before it is stored.

pub(crate) fn insert<T: Entity>(items: &mut Vec<T>, item: T) -> Result<T, DqtError> {
    item.check()?;
    if items.iter().any(|i| i.id() == item.id()) {
        return Err(DomainError::DuplicateId {
            kind: T::KIND,
            id: item.id().to_string(),
        }
        .into());
    }
    items.push(item.clone());
    Ok(item)
}

pub(crate) fn replace<T: Entity>(items: &mut [T], item: T) -> Result<T, DqtError> {
    item.check()?;
    let slot = items
        .iter_mut()
        .find(|i| i.id() == item.id())
        .ok_or_else(|| not_found::<T>(item.id()))?;
    *slot = item.clone();
    Ok(item)
}

pub(crate) fn remove<T: Entity>(items: &mut Vec<T>, id: &str) -> Result<T, DqtError> {
    let pos = items
        .iter()
        .position(|i| i.id() == id)
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(items.remove(pos))
}

/// Edits a staged copy and swaps it in only when every edit succeeded.
pub(crate) fn edit_each<T: Entity>(
    items: &mut Vec<T>,
    ids: &[&str],
    edit: &Edit<'_, T>,
) -> Result<Vec<T>, DqtError> {
    let mut staged = items.clone();
    for id in ids {
        let slot = staged
            .iter_mut()
            .find(|i| i.id() == *id)
            .ok_or_else(|| not_found::<T>(id))?;
        edit(slot)?;
        slot.check()?;
    }
    let edited = ids
        .iter()
        .filter_map(|id| staged.iter().find(|i| i.id() == *id).cloned())
        .collect();
    *items = staged;
    Ok(edited)
}

fn not_found<T: Entity>(id: &str) -> DqtError {
    DomainError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
    .into()
}

pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Seeds the store. Items are validated like any other insert.
    pub fn with_items(items: Vec<T>) -> Result<Self, DqtError> {
        let mut seeded = Vec::with_capacity(items.len());
        for item in items {
            insert(&mut seeded, item)?;
        }
        Ok(Self {
            items: RwLock::new(seeded),
        })
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, item: T) -> Result<T, DqtError> {
        insert(&mut *self.items.write().await, item)
    }

    async fn update(&self, item: T) -> Result<T, DqtError> {
        replace(&mut *self.items.write().await, item)
    }

    async fn delete(&self, id: &str) -> Result<T, DqtError> {
        remove(&mut *self.items.write().await, id)
    }

    async fn get(&self, id: &str) -> Result<Option<T>, DqtError> {
        Ok(self.items.read().await.iter().find(|i| i.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, DqtError> {
        Ok(self.items.read().await.clone())
    }

    async fn modify_all(&self, ids: &[&str], edit: &Edit<'_, T>) -> Result<Vec<T>, DqtError> {
        edit_each(&mut *self.items.write().await, ids, edit)
    }
}

#[derive(Default)]
pub struct InMemoryHistory {
    records: RwLock<Vec<ReportRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportHistory for InMemoryHistory {
    async fn append(&self, record: ReportRecord) -> Result<(), DqtError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReportRecord>, DqtError> {
        Ok(self.records.read().await.clone())
    }
}
