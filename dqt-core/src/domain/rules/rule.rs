// dqt-core/src/domain/rules/rule.rs

use crate::domain::error::DomainError;
use crate::domain::rules::value::FieldValue;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    #[default]
    DataValidation,
    BusinessLogic,
    QualityThreshold,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataValidation => "data_validation",
            Self::BusinessLogic => "business_logic",
            Self::QualityThreshold => "quality_threshold",
        }
    }

    /// Human label used to name the check a rule contributes to.
    pub fn check_name(&self) -> &'static str {
        match self {
            Self::DataValidation => "Data Validation",
            Self::BusinessLogic => "Business Logic",
            Self::QualityThreshold => "Quality Thresholds",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared by rules and scheduled tasks: paused items are kept but skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    #[default]
    Active,
    Paused,
}

impl ActivationStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Ordered so that `Severity::Info < Severity::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Regex,
    Range,
    Completeness,
    Equals,
    NotEquals,
    Contains,
    NotContains,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Self::Regex,
        Self::Range,
        Self::Completeness,
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::NotContains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Range => "range",
            Self::Completeness => "completeness",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
        }
    }
}

impl FromStr for Operator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| DomainError::UnsupportedOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explicit coercion target for equality operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_condition"))]
pub struct Condition {
    #[validate(length(min = 1, message = "field cannot be empty"))]
    pub field: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
}

fn default_true() -> bool {
    true
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: None,
            min_value: None,
            max_value: None,
            threshold: None,
            severity: Severity::default(),
            case_sensitive: true,
            value_type: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Completeness threshold as a ratio. Values above 1 are read as percentages.
    pub fn normalized_threshold(&self) -> Option<f64> {
        self.threshold
            .map(|t| if t > 1.0 { t / 100.0 } else { t })
    }

    /// The regex source, if the condition carries a textual value.
    pub fn pattern(&self) -> Option<&str> {
        match &self.value {
            Some(FieldValue::Text(p)) => Some(p),
            _ => None,
        }
    }
}

fn validate_condition(cond: &Condition) -> Result<(), ValidationError> {
    let fail = |code: &'static str, msg: String| {
        let mut err = ValidationError::new(code);
        err.message = Some(msg.into());
        Err(err)
    };

    match cond.operator {
        Operator::Regex => {
            let Some(pattern) = cond.pattern() else {
                return fail("regex_value", "regex requires a textual 'value' pattern".into());
            };
            if let Err(e) = RegexBuilder::new(pattern)
                .case_insensitive(!cond.case_sensitive)
                .build()
            {
                return fail("regex_value", format!("invalid pattern: {}", e));
            }
        }
        Operator::Range => match (cond.min_value, cond.max_value) {
            (None, None) => {
                return fail("range_bounds", "range requires min_value or max_value".into());
            }
            (Some(min), Some(max)) if min > max => {
                return fail("range_bounds", format!("min_value {} exceeds max_value {}", min, max));
            }
            _ => {}
        },
        Operator::Completeness => match cond.threshold {
            None => return fail("threshold", "completeness requires a threshold".into()),
            Some(t) if !(0.0..=100.0).contains(&t) => {
                return fail("threshold", format!("threshold {} is outside [0, 1] or [0, 100]", t));
            }
            _ => {}
        },
        Operator::Equals | Operator::NotEquals | Operator::Contains | Operator::NotContains => {
            if cond.value.is_none() {
                return fail("value", format!("{} requires a 'value'", cond.operator));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Rule {
    pub id: String,
    #[validate(length(min = 2, max = 100, message = "name must be 2 to 100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "description is limited to 500 characters"))]
    pub description: String,
    #[serde(rename = "type", default)]
    pub rule_type: RuleType,
    #[serde(default)]
    pub status: ActivationStatus,
    #[validate(nested)]
    pub conditions: Condition,
    #[serde(default)]
    pub applied_count: u64,
}

impl Rule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, conditions: Condition) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rule_type: RuleType::default(),
            status: ActivationStatus::Active,
            conditions,
            applied_count: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ActivationStatus::Active
    }

    pub fn severity(&self) -> Severity {
        self.conditions.severity
    }

    /// Checks the definition invariants and folds validator output into a domain error.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate().map_err(|errors| DomainError::InvalidRule {
            rule: self.name.clone(),
            reason: flatten_errors(&errors),
        })
    }
}

fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut reasons: Vec<String> = Vec::new();
    collect_reasons(errors, &mut reasons);
    reasons.sort();
    reasons.join("; ")
}

fn collect_reasons(errors: &ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    if *field == "__all__" {
                        out.push(msg);
                    } else {
                        out.push(format!("{}: {}", field, msg));
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_reasons(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_reasons(inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_operator_parsing() {
        assert_eq!("not_equals".parse::<Operator>().unwrap(), Operator::NotEquals);
        assert_eq!(" REGEX ".parse::<Operator>().unwrap(), Operator::Regex);
        assert!(matches!(
            "between".parse::<Operator>(),
            Err(DomainError::UnsupportedOperator(op)) if op == "between"
        ));
    }

    #[test]
    fn test_unknown_operator_rejected_on_load() {
        let yaml = "field: age\noperator: greater_than\nvalue: 3";
        let err = serde_yaml::from_str::<Condition>(yaml).unwrap_err();
        assert!(err.to_string().contains("Unsupported rule operator"));
    }

    #[test]
    fn test_rule_yaml_shape() -> Result<()> {
        let yaml = r#"
id: "1"
name: Email Format Validation
type: data_validation
status: active
conditions:
  field: email
  operator: regex
  value: '^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$'
  severity: error
applied_count: 1247
"#;
        let rule: Rule = serde_yaml::from_str(yaml)?;
        assert_eq!(rule.rule_type, RuleType::DataValidation);
        assert_eq!(rule.conditions.operator, Operator::Regex);
        assert!(rule.conditions.case_sensitive);
        assert_eq!(rule.applied_count, 1247);
        rule.check()?;
        Ok(())
    }

    #[test]
    fn test_invalid_definitions() {
        let bad_regex = Rule::new(
            "r1",
            "Broken",
            Condition::new("email", Operator::Regex).with_value("(unclosed"),
        );
        assert!(matches!(bad_regex.check(), Err(DomainError::InvalidRule { .. })));

        let no_bounds = Rule::new("r2", "Age", Condition::new("age", Operator::Range));
        let err = no_bounds.check().unwrap_err();
        assert!(err.to_string().contains("min_value or max_value"));

        let inverted = Rule::new(
            "r3",
            "Age",
            Condition::new("age", Operator::Range).with_bounds(Some(10.0), Some(1.0)),
        );
        assert!(inverted.check().is_err());

        let no_threshold = Rule::new("r4", "Complete", Condition::new("id", Operator::Completeness));
        assert!(no_threshold.check().is_err());

        let empty_field = Rule::new(
            "r5",
            "Empty field",
            Condition::new("", Operator::Equals).with_value("x"),
        );
        let err = empty_field.check().unwrap_err();
        assert!(err.to_string().contains("field cannot be empty"));

        let short_name = Rule::new(
            "r6",
            "X",
            Condition::new("id", Operator::Completeness).with_threshold(0.9),
        );
        assert!(short_name.check().is_err());
    }

    #[test]
    fn test_threshold_normalization() {
        let pct = Condition::new("id", Operator::Completeness).with_threshold(95.0);
        assert_eq!(pct.normalized_threshold(), Some(0.95));
        let ratio = Condition::new("id", Operator::Completeness).with_threshold(0.8);
        assert_eq!(ratio.normalized_threshold(), Some(0.8));
    }

    #[test]
    fn test_status_toggle_and_severity_order() {
        assert_eq!(ActivationStatus::Active.toggled(), ActivationStatus::Paused);
        assert_eq!(ActivationStatus::Paused.toggled(), ActivationStatus::Active);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
