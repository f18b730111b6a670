// dqt-core/src/domain/project/configuration.rs

use crate::domain::rules::EvaluationOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    #[serde(rename = "rules-path", default = "default_rules_path")]
    pub rules_path: String,

    #[serde(rename = "schedules-path", default = "default_schedules_path")]
    pub schedules_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(default)]
    pub evaluation: EvaluationOptions,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            profile: default_profile(),
            config_paths: Vec::new(),
            rules_path: default_rules_path(),
            schedules_path: default_schedules_path(),
            target_path: default_target_path(),
            evaluation: EvaluationOptions::default(),
        }
    }

    pub fn rules_file(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.rules_path)
    }

    pub fn schedules_file(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.schedules_path)
    }

    /// Report history lives in the target directory.
    pub fn history_file(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.target_path).join("history.json")
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_profile() -> String {
    "dev".to_string()
}
fn default_rules_path() -> String {
    "config/rules.yml".to_string()
}
fn default_schedules_path() -> String {
    "config/schedules.yml".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
