// dqt-core/src/domain/report/mod.rs

pub mod aggregate;
pub mod check;

pub use aggregate::{QualityReport, ReportSummary, aggregate};
pub use check::{Check, PASS_THRESHOLD, QualityStatus, WARNING_THRESHOLD};
