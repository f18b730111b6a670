// dqt-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::project::ProjectConfig;
use crate::domain::rules::EvaluationOptions;
use crate::infrastructure::error::InfrastructureError;

const CANDIDATES: [&str; 2] = ["dqt.yaml", "dqt_project.yaml"];

/// Loads the project file, layers satellite configs on top, then applies
/// `DQT_*` environment overrides.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    load_project_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_project_config`] with an explicit environment lookup.
pub fn load_project_config_with(
    project_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    let mut config: ProjectConfig = load_fragment(&config_path)?;

    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    apply_env_overrides(&mut config, env);

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CANDIDATES
    )))
}

fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| InfrastructureError::yaml(path, e))
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let eval_path = config_dir.join("evaluation.yml");
    if eval_path.exists() {
        #[derive(Deserialize)]
        struct EvaluationWrapper {
            evaluation: EvaluationOptions,
        }

        let wrapper: EvaluationWrapper = load_fragment(&eval_path)?;
        config.evaluation = wrapper.evaluation;
        info!("Evaluation settings loaded");
    }

    Ok(())
}

fn apply_env_overrides(config: &mut ProjectConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(val) = env("DQT_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = env("DQT_PROFILE") {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_applied() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("dqt.yaml"), "name: shop\n")?;

        let config = load_project_config_with(dir.path(), no_env)?;

        assert_eq!(config.name, "shop");
        assert_eq!(config.profile, "dev");
        assert_eq!(config.rules_path, "config/rules.yml");
        assert_eq!(config.evaluation.max_failed_rows, 10);
        assert_eq!(
            config.history_file(dir.path()),
            dir.path().join("target").join("history.json")
        );
        Ok(())
    }

    #[test]
    fn test_satellite_and_env_layering() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("dqt_project.yaml"),
            "name: shop\nconfig-paths: [config]\nevaluation:\n  max_failed_rows: 3\n",
        )?;
        fs::create_dir(dir.path().join("config"))?;
        fs::write(
            dir.path().join("config/evaluation.yml"),
            "evaluation:\n  missing_markers: ['N/A', '-']\n",
        )?;

        let config = load_project_config_with(dir.path(), |key| {
            (key == "DQT_TARGET_PATH").then(|| "/tmp/out".to_string())
        })?;

        assert_eq!(config.evaluation.missing_markers, vec!["N/A", "-"]);
        // the satellite replaces the whole block
        assert_eq!(config.evaluation.max_failed_rows, 10);
        assert_eq!(config.target_path, "/tmp/out");
        assert_eq!(config.profile, "dev");
        Ok(())
    }

    #[test]
    fn test_missing_project_file() {
        let dir = tempdir().unwrap();
        let err = load_project_config_with(dir.path(), no_env).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
    }

    #[test]
    fn test_corrupt_satellite_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("dqt.yaml"), "name: shop\nconfig-paths: [config]\n")?;
        fs::create_dir(dir.path().join("config"))?;
        fs::write(dir.path().join("config/evaluation.yml"), "evaluation: [")?;

        let err = load_project_config_with(dir.path(), no_env).unwrap_err();
        assert!(matches!(err, InfrastructureError::Yaml { .. }));
        Ok(())
    }
}
