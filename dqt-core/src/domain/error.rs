// dqt-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    #[diagnostic(
        code(dqt::domain::invalid_pattern),
        help("The rule 'value' must be a valid regular expression.")
    )]
    InvalidPattern { pattern: String, reason: String },

    #[error("Operator '{operator}' cannot be applied to field '{field}': expected {expected}, found {found}")]
    #[diagnostic(code(dqt::domain::type_mismatch))]
    TypeMismatch {
        operator: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("Cannot aggregate an empty set of checks")]
    #[diagnostic(
        code(dqt::domain::empty_check_set),
        help("A quality report needs at least one check.")
    )]
    EmptyCheckSet,

    #[error("Unsupported rule operator: '{0}'")]
    #[diagnostic(
        code(dqt::domain::unsupported_operator),
        help("Expected one of: regex, range, completeness, equals, not_equals, contains, not_contains.")
    )]
    UnsupportedOperator(String),

    #[error("Invalid recurrence: {0}")]
    #[diagnostic(code(dqt::domain::invalid_recurrence))]
    InvalidRecurrence(String),

    #[error("Rule '{rule}' is invalid: {reason}")]
    #[diagnostic(code(dqt::domain::invalid_rule))]
    InvalidRule { rule: String, reason: String },

    #[error("Check '{check}' has a score of {score} outside [0, 1]")]
    #[diagnostic(code(dqt::domain::invalid_score))]
    InvalidScore { check: String, score: f64 },

    #[error("No values to evaluate for field '{0}'")]
    #[diagnostic(
        code(dqt::domain::empty_input),
        help("Completeness and row checks need at least one record.")
    )]
    EmptyInput(String),

    #[error("{kind} '{id}' not found")]
    #[diagnostic(code(dqt::domain::not_found))]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' already exists")]
    #[diagnostic(code(dqt::domain::duplicate_id))]
    DuplicateId { kind: &'static str, id: String },
}
