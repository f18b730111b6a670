// dqt-core/src/domain/mod.rs

pub mod error;
pub mod project;
pub mod report;
pub mod rules;
pub mod schedule;

// Re-exports
pub use error::DomainError;
