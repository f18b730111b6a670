// dqt-core/src/application/mod.rs

pub mod checks;
pub mod rules;
pub mod scheduling;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI do `use dqt_core::application::{run_checks, toggle_rule};`

pub use checks::run_checks;
pub use rules::{RuleDraft, RulePatch, create_rule, delete_rule, test_rule, toggle_rule, update_rule};
pub use scheduling::{
    TaskDraft, create_task, delete_task, run_task_now, toggle_task, update_task, upcoming_tasks,
};
