// dqt-core/src/domain/rules/mod.rs

pub mod evaluator;
pub mod rule;
pub mod value;
pub mod verdict;

// Re-exports
pub use evaluator::{
    EvaluationOptions, RuleEvaluator, evaluate, evaluate_and_record, evaluate_records,
};
pub use rule::{ActivationStatus, Condition, Operator, Rule, RuleType, Severity, ValueType};
pub use value::{FieldValue, Record, records_from_json};
pub use verdict::{RowStats, Verdict, VerdictStatus};
