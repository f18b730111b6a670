// dqt-core/src/ports/mod.rs

pub mod repository;

pub use repository::{Edit, Entity, ReportHistory, ReportRecord, Repository};
