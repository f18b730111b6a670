// dqt-core/src/infrastructure/store/history.rs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::DqtError;
use crate::infrastructure::fs::{read_json, write_json};
use crate::ports::{ReportHistory, ReportRecord};

/// Append-only report log stored as a JSON array (`target/history.json`).
pub struct JsonHistory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<ReportRecord>, DqtError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }
}

#[async_trait]
impl ReportHistory for JsonHistory {
    async fn append(&self, record: ReportRecord) -> Result<(), DqtError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load()?;
        info!(id = %record.id, dataset = %record.dataset, "Appending report to history");
        records.push(record);
        write_json(&self.path, &records)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReportRecord>, DqtError> {
        let _guard = self.lock.lock().await;
        self.load()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::report::{Check, aggregate};
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(id: &str, day: u32, score: f64) -> Result<ReportRecord> {
        Ok(ReportRecord {
            id: id.to_string(),
            dataset: "customers".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            report: aggregate(vec![Check::new("Data Validation", score)?])?,
        })
    }

    #[tokio::test]
    async fn test_append_keeps_order_across_instances() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("target/history.json");

        JsonHistory::new(&path).append(record("a", 1, 0.95)?).await?;
        JsonHistory::new(&path).append(record("b", 2, 0.70)?).await?;

        let listed = JsonHistory::new(&path).list().await?;
        let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!((listed[1].report.overall_score() - 70.0).abs() < 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_history() -> Result<()> {
        let dir = tempdir()?;
        let history = JsonHistory::new(dir.path().join("history.json"));
        assert!(history.list().await?.is_empty());
        Ok(())
    }
}
