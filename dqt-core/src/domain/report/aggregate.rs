// dqt-core/src/domain/report/aggregate.rs

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::report::check::{Check, QualityStatus};

/// Result of one check-run. Score and status are derived from the checks
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    checks: Vec<Check>,
    overall_score: f64,
    overall_status: QualityStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

impl QualityReport {
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Percentage in [0, 100].
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    pub fn overall_status(&self) -> QualityStatus {
        self.overall_status
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |status: QualityStatus| {
            self.checks
                .iter()
                .filter(|c| c.status() == status)
                .count()
        };
        ReportSummary {
            total_checks: self.checks.len(),
            passed: count(QualityStatus::Passed),
            warnings: count(QualityStatus::Warning),
            failed: count(QualityStatus::Failed),
        }
    }
}

/// Folds checks into a report: `100 × mean(score)`, every check weighted equally.
pub fn aggregate(checks: Vec<Check>) -> Result<QualityReport, DomainError> {
    if checks.is_empty() {
        return Err(DomainError::EmptyCheckSet);
    }
    for check in &checks {
        check.ensure_score()?;
    }

    // Summing in sorted order makes the mean bit-identical for any input order.
    let mut scores: Vec<f64> = checks.iter().map(|c| c.score).collect();
    scores.sort_by(f64::total_cmp);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let overall_score = (mean * 100.0).clamp(0.0, 100.0);

    Ok(QualityReport {
        overall_status: QualityStatus::from_percent(overall_score),
        overall_score,
        checks,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn checks(scores: &[f64]) -> Vec<Check> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| Check::new(format!("check-{}", i), *s).unwrap())
            .collect()
    }

    #[test]
    fn test_reference_example() -> Result<()> {
        let report = aggregate(checks(&[0.95, 0.87, 0.92]))?;
        assert!((report.overall_score() - 91.333_333).abs() < 1e-3);
        assert_eq!(report.overall_status(), QualityStatus::Passed);
        Ok(())
    }

    #[test]
    fn test_empty_check_set_is_rejected() {
        assert_eq!(aggregate(vec![]), Err(DomainError::EmptyCheckSet));
    }

    #[test]
    fn test_order_invariance() -> Result<()> {
        let scores = [0.1, 0.7, 0.33, 0.999, 0.5, 0.123_456_789];
        let base = aggregate(checks(&scores))?.overall_score();

        let mut rotated = scores.to_vec();
        for _ in 0..scores.len() {
            rotated.rotate_left(1);
            assert_eq!(aggregate(checks(&rotated))?.overall_score(), base);
        }
        let mut reversed = scores.to_vec();
        reversed.reverse();
        assert_eq!(aggregate(checks(&reversed))?.overall_score(), base);
        Ok(())
    }

    #[test]
    fn test_status_cut_points() {
        assert_eq!(QualityStatus::from_percent(90.0), QualityStatus::Passed);
        assert_eq!(QualityStatus::from_percent(89.999), QualityStatus::Warning);
        assert_eq!(QualityStatus::from_percent(75.0), QualityStatus::Warning);
        assert_eq!(QualityStatus::from_percent(74.999), QualityStatus::Failed);
        assert_eq!(QualityStatus::from_percent(0.0), QualityStatus::Failed);
    }

    #[test]
    fn test_status_from_aggregate() -> Result<()> {
        assert_eq!(aggregate(checks(&[0.8, 0.8]))?.overall_status(), QualityStatus::Warning);
        assert_eq!(aggregate(checks(&[0.5, 0.9]))?.overall_status(), QualityStatus::Failed);
        assert_eq!(aggregate(checks(&[1.0]))?.overall_score(), 100.0);
        Ok(())
    }

    #[test]
    fn test_invalid_scores() {
        assert!(matches!(
            Check::new("over", 1.2),
            Err(DomainError::InvalidScore { .. })
        ));
        assert!(Check::new("nan", f64::NAN).is_err());

        let smuggled = vec![Check {
            name: "raw".into(),
            score: -0.1,
            verdicts: vec![],
        }];
        assert!(matches!(aggregate(smuggled), Err(DomainError::InvalidScore { .. })));
    }

    #[test]
    fn test_summary_counts() -> Result<()> {
        let report = aggregate(checks(&[0.95, 0.8, 0.4, 0.99]))?;
        let summary = report.summary();
        assert_eq!(summary.total_checks, 4);
        assert_eq!((summary.passed, summary.warnings, summary.failed), (2, 1, 1));
        Ok(())
    }

    #[test]
    fn test_check_from_verdicts() -> Result<()> {
        use crate::domain::rules::{Condition, FieldValue, Operator, Rule, evaluate};

        let rule = Rule::new(
            "r",
            "Age range",
            Condition::new("age", Operator::Range).with_bounds(Some(0.0), Some(120.0)),
        );
        let verdicts = vec![
            evaluate(&rule, &FieldValue::Number(30.0))?,
            evaluate(&rule, &FieldValue::Number(300.0))?,
        ];
        let check = Check::from_verdicts("Ranges", verdicts)?;
        assert_eq!(check.score, 0.5);
        assert_eq!(check.status(), QualityStatus::Failed);
        assert!(matches!(
            Check::from_verdicts("none", vec![]),
            Err(DomainError::EmptyInput(_))
        ));
        Ok(())
    }
}
