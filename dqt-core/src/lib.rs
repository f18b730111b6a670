// dqt-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// Storage contracts used by the services (repositories, report history).
pub mod ports;

// Pure core: rule evaluation, schedule calculation, report aggregation.
// Depends on nothing else in the crate.
pub mod domain;

// Adapters: project config, YAML/JSON stores, atomic file writes.
pub mod infrastructure;

// Use cases: rule lifecycle, check-runs, task scheduling.
pub mod application;

pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use domain::report::aggregate;
pub use domain::rules::{evaluate, evaluate_and_record, evaluate_records};
pub use domain::schedule::next_run;
pub use error::DqtError;
