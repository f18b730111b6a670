// dqt-core/src/domain/rules/verdict.rs

use crate::domain::rules::rule::{Operator, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Passed,
    Failed,
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Row accounting for rules evaluated over a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RowStats {
    pub processed: usize,
    pub passed: usize,
    pub failed: usize,
    /// First offending row indexes, capped by the evaluation options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failing_rows: Vec<usize>,
}

impl RowStats {
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        self.passed as f64 / self.processed as f64
    }
}

/// Outcome of one rule against one value or record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub rule_id: String,
    pub rule_name: String,
    pub field: String,
    pub operator: Operator,
    pub status: VerdictStatus,
    /// Contribution in [0, 1]: 1/0 for scalar checks, a ratio otherwise.
    pub score: f64,
    pub severity: Severity,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowStats>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.status == VerdictStatus::Passed
    }
}
