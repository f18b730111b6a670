// dqt-core/src/domain/report/check.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::rules::Verdict;

/// Minimum overall score (percent) for a passing report.
pub const PASS_THRESHOLD: f64 = 90.0;
/// Minimum overall score (percent) for a warning; anything lower fails.
pub const WARNING_THRESHOLD: f64 = 75.0;

// The cut points are shared with historical reports and must not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
    Failed,
    Warning,
    Passed,
}

impl QualityStatus {
    /// Maps a score in percent onto the fixed status bands.
    pub fn from_percent(score: f64) -> Self {
        if score >= PASS_THRESHOLD {
            Self::Passed
        } else if score >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Warning => "warning",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named group of verdicts (e.g. "Missing Values Analysis") with its score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub verdicts: Vec<Verdict>,
}

impl Check {
    /// A check whose score was computed elsewhere.
    pub fn new(name: impl Into<String>, score: f64) -> Result<Self, DomainError> {
        let check = Self {
            name: name.into(),
            score,
            verdicts: Vec::new(),
        };
        check.ensure_score()?;
        Ok(check)
    }

    /// Scores the check as the mean of its verdict scores.
    pub fn from_verdicts(name: impl Into<String>, verdicts: Vec<Verdict>) -> Result<Self, DomainError> {
        let name = name.into();
        if verdicts.is_empty() {
            return Err(DomainError::EmptyInput(name));
        }
        let score = verdicts.iter().map(|v| v.score).sum::<f64>() / verdicts.len() as f64;
        let check = Self {
            name,
            score,
            verdicts,
        };
        check.ensure_score()?;
        Ok(check)
    }

    pub fn status(&self) -> QualityStatus {
        QualityStatus::from_percent(self.score * 100.0)
    }

    pub(crate) fn ensure_score(&self) -> Result<(), DomainError> {
        if (0.0..=1.0).contains(&self.score) {
            Ok(())
        } else {
            Err(DomainError::InvalidScore {
                check: self.name.clone(),
                score: self.score,
            })
        }
    }
}
