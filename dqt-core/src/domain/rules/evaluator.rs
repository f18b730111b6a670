// dqt-core/src/domain/rules/evaluator.rs

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::rules::rule::{Condition, Operator, Rule, ValueType};
use crate::domain::rules::value::{FieldValue, Record};
use crate::domain::rules::verdict::{RowStats, Verdict, VerdictStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    /// Text values counted as missing in addition to null and blank strings.
    #[serde(default)]
    pub missing_markers: Vec<String>,
    /// How many failing row indexes a verdict keeps.
    #[serde(default = "default_max_failed_rows")]
    pub max_failed_rows: usize,
}

fn default_max_failed_rows() -> usize {
    10
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            missing_markers: Vec::new(),
            max_failed_rows: default_max_failed_rows(),
        }
    }
}

/// Applies rule operators to values. Holds no state besides its options,
/// so one instance can be shared across concurrent check-runs.
#[derive(Debug, Clone, Default)]
pub struct RuleEvaluator {
    options: EvaluationOptions,
}

/// Evaluates `rule` against a single value with default options.
pub fn evaluate(rule: &Rule, value: &FieldValue) -> Result<Verdict, DomainError> {
    RuleEvaluator::default().evaluate(rule, value)
}

/// Same as [`evaluate`], and bumps `applied_count` when evaluation succeeds.
pub fn evaluate_and_record(rule: &mut Rule, value: &FieldValue) -> Result<Verdict, DomainError> {
    RuleEvaluator::default().apply(rule, value)
}

/// Evaluates `rule` over a record set with default options.
pub fn evaluate_records(rule: &Rule, records: &[Record]) -> Result<Verdict, DomainError> {
    RuleEvaluator::default().evaluate_records(rule, records)
}

struct RowOutcome {
    passed: bool,
    note: String,
}

impl RowOutcome {
    fn new(passed: bool, note: impl Into<String>) -> Self {
        Self {
            passed,
            note: note.into(),
        }
    }
}

// Operator resolved once per evaluation (regex compiled, bounds checked).
enum Prepared<'r> {
    Completeness { threshold: f64 },
    Row(RowCheck<'r>),
}

// Operators that judge each value on its own.
enum RowCheck<'r> {
    Pattern(Regex),
    Bounds { min: Option<f64>, max: Option<f64> },
    Equality { expected: &'r FieldValue, negate: bool },
    Containment { needle: &'r FieldValue, negate: bool },
}

impl RuleEvaluator {
    pub fn new(options: EvaluationOptions) -> Self {
        Self { options }
    }

    pub fn evaluate(&self, rule: &Rule, value: &FieldValue) -> Result<Verdict, DomainError> {
        let cond = &rule.conditions;
        let verdict = match prepare(rule)? {
            Prepared::Completeness { threshold } => {
                let values: Vec<&FieldValue> = match value {
                    FieldValue::List(items) => items.iter().collect(),
                    scalar => vec![scalar],
                };
                self.completeness(rule, &values, threshold)?
            }
            Prepared::Row(check) => {
                let outcome = self.test_value(cond, &check, value)?;
                let status = if outcome.passed {
                    VerdictStatus::Passed
                } else {
                    VerdictStatus::Failed
                };
                build_verdict(
                    rule,
                    status,
                    if outcome.passed { 1.0 } else { 0.0 },
                    outcome.note,
                    None,
                )
            }
        };

        debug!(
            rule = %rule.name,
            operator = %cond.operator,
            status = %verdict.status,
            "rule evaluated"
        );
        Ok(verdict)
    }

    /// Evaluates and records the application on the rule. Failed verdicts
    /// count as applied; evaluation errors do not.
    pub fn apply(&self, rule: &mut Rule, value: &FieldValue) -> Result<Verdict, DomainError> {
        let verdict = self.evaluate(rule, value)?;
        rule.applied_count += 1;
        Ok(verdict)
    }

    pub fn evaluate_records(&self, rule: &Rule, records: &[Record]) -> Result<Verdict, DomainError> {
        let cond = &rule.conditions;
        let prepared = prepare(rule)?;
        if records.is_empty() {
            return Err(DomainError::EmptyInput(cond.field.clone()));
        }

        let column: Vec<&FieldValue> = records
            .iter()
            .map(|r| r.get(&cond.field).unwrap_or(&FieldValue::Null))
            .collect();

        let check = match prepared {
            Prepared::Completeness { threshold } => {
                return self.completeness(rule, &column, threshold);
            }
            Prepared::Row(check) => check,
        };

        let mut stats = RowStats {
            processed: column.len(),
            ..Default::default()
        };
        let mut first_failure: Option<String> = None;
        for (idx, value) in column.iter().enumerate() {
            let outcome = self.test_value(cond, &check, value)?;
            if outcome.passed {
                stats.passed += 1;
            } else {
                stats.failed += 1;
                if stats.failing_rows.len() < self.options.max_failed_rows {
                    stats.failing_rows.push(idx);
                }
                first_failure.get_or_insert_with(|| format!("row {}: {}", idx, outcome.note));
            }
        }

        let status = if stats.failed == 0 {
            VerdictStatus::Passed
        } else {
            VerdictStatus::Failed
        };
        let mut detail = format!("{}/{} rows passed", stats.passed, stats.processed);
        if let Some(first) = first_failure {
            detail.push_str(&format!(" (first failure at {})", first));
        }
        let score = stats.success_rate();

        debug!(
            rule = %rule.name,
            rows = stats.processed,
            failed = stats.failed,
            "rule evaluated over records"
        );
        Ok(build_verdict(rule, status, score, detail, Some(stats)))
    }

    fn completeness(
        &self,
        rule: &Rule,
        values: &[&FieldValue],
        threshold: f64,
    ) -> Result<Verdict, DomainError> {
        if values.is_empty() {
            return Err(DomainError::EmptyInput(rule.conditions.field.clone()));
        }

        let mut stats = RowStats {
            processed: values.len(),
            ..Default::default()
        };
        for (idx, value) in values.iter().enumerate() {
            if value.is_missing(&self.options.missing_markers) {
                stats.failed += 1;
                if stats.failing_rows.len() < self.options.max_failed_rows {
                    stats.failing_rows.push(idx);
                }
            } else {
                stats.passed += 1;
            }
        }

        let ratio = stats.success_rate();
        let status = if ratio >= threshold {
            VerdictStatus::Passed
        } else {
            VerdictStatus::Failed
        };
        let detail = format!(
            "completeness {:.2}% ({} of {} missing), threshold {:.2}%",
            ratio * 100.0,
            stats.failed,
            stats.processed,
            threshold * 100.0
        );
        Ok(build_verdict(rule, status, ratio, detail, Some(stats)))
    }

    fn test_value(
        &self,
        cond: &Condition,
        check: &RowCheck<'_>,
        value: &FieldValue,
    ) -> Result<RowOutcome, DomainError> {
        match check {
            RowCheck::Pattern(re) => match value {
                FieldValue::Null => Ok(RowOutcome::new(false, "value is missing")),
                FieldValue::List(_) => Err(mismatch(cond, "a scalar value", value)),
                other => {
                    let text = other.as_text().unwrap_or_default();
                    let matched = re.is_match(&text);
                    Ok(RowOutcome::new(
                        matched,
                        if matched {
                            format!("{} matches pattern", other)
                        } else {
                            format!("{} does not match pattern", other)
                        },
                    ))
                }
            },
            RowCheck::Bounds { min, max } => match value {
                FieldValue::Null => Ok(RowOutcome::new(false, "value is missing")),
                FieldValue::Number(n) => Ok(check_bounds(*n, *min, *max)),
                other => Err(mismatch(cond, "a number", other)),
            },
            RowCheck::Equality { expected, negate } => {
                let equal = self.values_equal(cond, value, expected)?;
                let passed = equal != *negate;
                let note = match (equal, negate) {
                    (true, false) => format!("{} equals {}", value, expected),
                    (false, false) => format!("{} differs from {}", value, expected),
                    (true, true) => format!("{} must not equal {}", value, expected),
                    (false, true) => format!("{} differs from {}", value, expected),
                };
                Ok(RowOutcome::new(passed, note))
            }
            RowCheck::Containment { needle, negate } => {
                let found = match value {
                    FieldValue::Null => false,
                    FieldValue::Text(haystack) => {
                        let Some(needle_text) = needle.as_text() else {
                            return Err(mismatch(cond, "a textual value", needle));
                        };
                        if cond.case_sensitive {
                            haystack.contains(&needle_text)
                        } else {
                            haystack.to_lowercase().contains(&needle_text.to_lowercase())
                        }
                    }
                    FieldValue::List(items) => items
                        .iter()
                        .any(|item| same_kind(item, needle) && loosely_equal(cond, item, needle)),
                    other => return Err(mismatch(cond, "a string or a list", other)),
                };
                let passed = found != *negate;
                let note = if value.is_null() {
                    "value is missing".to_string()
                } else if found {
                    format!("{} contains {}", value, needle)
                } else {
                    format!("{} does not contain {}", value, needle)
                };
                Ok(RowOutcome::new(passed, note))
            }
        }
    }

    fn values_equal(
        &self,
        cond: &Condition,
        actual: &FieldValue,
        expected: &FieldValue,
    ) -> Result<bool, DomainError> {
        let actual = coerce(cond, actual)?;
        let expected = coerce(cond, expected)?;

        if actual.is_null() || expected.is_null() {
            return Ok(actual.is_null() && expected.is_null());
        }
        if !same_kind(&actual, &expected) {
            return Err(mismatch(cond, expected.kind(), &actual));
        }
        Ok(loosely_equal(cond, &actual, &expected))
    }
}

fn prepare(rule: &Rule) -> Result<Prepared<'_>, DomainError> {
    let cond = &rule.conditions;
    let invalid = |reason: &str| DomainError::InvalidRule {
        rule: rule.name.clone(),
        reason: reason.to_string(),
    };

    if cond.field.is_empty() {
        return Err(invalid("condition field must not be empty"));
    }

    match cond.operator {
        Operator::Regex => {
            let pattern = cond
                .pattern()
                .ok_or_else(|| invalid("regex requires a textual 'value' pattern"))?;
            let re = RegexBuilder::new(pattern)
                .case_insensitive(!cond.case_sensitive)
                .build()
                .map_err(|e| DomainError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
            Ok(Prepared::Row(RowCheck::Pattern(re)))
        }
        Operator::Range => {
            match (cond.min_value, cond.max_value) {
                (None, None) => return Err(invalid("range requires min_value or max_value")),
                (Some(min), Some(max)) if min > max => {
                    return Err(invalid("min_value exceeds max_value"));
                }
                _ => {}
            }
            Ok(Prepared::Row(RowCheck::Bounds {
                min: cond.min_value,
                max: cond.max_value,
            }))
        }
        Operator::Completeness => {
            let threshold = cond
                .normalized_threshold()
                .ok_or_else(|| invalid("completeness requires a threshold"))?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(invalid("threshold must lie in [0, 1] or [0, 100]"));
            }
            Ok(Prepared::Completeness { threshold })
        }
        Operator::Equals | Operator::NotEquals => {
            let expected = cond
                .value
                .as_ref()
                .ok_or_else(|| invalid("equality operators require a 'value'"))?;
            Ok(Prepared::Row(RowCheck::Equality {
                expected,
                negate: cond.operator == Operator::NotEquals,
            }))
        }
        Operator::Contains | Operator::NotContains => {
            let needle = cond
                .value
                .as_ref()
                .ok_or_else(|| invalid("containment operators require a 'value'"))?;
            Ok(Prepared::Row(RowCheck::Containment {
                needle,
                negate: cond.operator == Operator::NotContains,
            }))
        }
    }
}

fn check_bounds(n: f64, min: Option<f64>, max: Option<f64>) -> RowOutcome {
    if let Some(lo) = min {
        if !(n >= lo) {
            return RowOutcome::new(false, format!("{} is below min_value {}", n, lo));
        }
    }
    if let Some(hi) = max {
        if !(n <= hi) {
            return RowOutcome::new(false, format!("{} is above max_value {}", n, hi));
        }
    }
    RowOutcome::new(true, format!("{} is within bounds", n))
}

/// Applies the condition's explicit `value_type`, if any. Without one, values
/// are compared as they are.
fn coerce(cond: &Condition, value: &FieldValue) -> Result<FieldValue, DomainError> {
    let Some(target) = cond.value_type else {
        return Ok(value.clone());
    };
    if value.is_null() {
        return Ok(FieldValue::Null);
    }

    match (target, value) {
        (ValueType::String, FieldValue::List(_)) => Err(mismatch(cond, "a scalar value", value)),
        (ValueType::String, other) => Ok(FieldValue::Text(other.as_text().unwrap_or_default())),
        (ValueType::Number, FieldValue::Number(n)) => Ok(FieldValue::Number(*n)),
        (ValueType::Number, FieldValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(FieldValue::Number)
            .map_err(|_| mismatch(cond, "a numeric string", value)),
        (ValueType::Boolean, FieldValue::Bool(b)) => Ok(FieldValue::Bool(*b)),
        (ValueType::Boolean, FieldValue::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(FieldValue::Bool(true)),
            "false" => Ok(FieldValue::Bool(false)),
            _ => Err(mismatch(cond, "a boolean string", value)),
        },
        (ValueType::Number, other) => Err(mismatch(cond, "a number", other)),
        (ValueType::Boolean, other) => Err(mismatch(cond, "a boolean", other)),
    }
}

fn same_kind(a: &FieldValue, b: &FieldValue) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

// Assumes both sides share a kind; mismatched kinds compare unequal.
fn loosely_equal(cond: &Condition, a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => {
            if cond.case_sensitive {
                x == y
            } else {
                x.to_lowercase() == y.to_lowercase()
            }
        }
        (FieldValue::List(xs), FieldValue::List(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|(x, y)| same_kind(x, y) && loosely_equal(cond, x, y))
        }
        (x, y) => x == y,
    }
}

fn build_verdict(
    rule: &Rule,
    status: VerdictStatus,
    score: f64,
    detail: String,
    rows: Option<RowStats>,
) -> Verdict {
    Verdict {
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        field: rule.conditions.field.clone(),
        operator: rule.conditions.operator,
        status,
        score,
        severity: rule.severity(),
        detail,
        rows,
    }
}

fn mismatch(cond: &Condition, expected: &str, found: &FieldValue) -> DomainError {
    DomainError::TypeMismatch {
        operator: cond.operator.to_string(),
        field: cond.field.clone(),
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}
