// dqt-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dqt::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error in {path}: {source}")]
    #[diagnostic(
        code(dqt::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    // --- STORES / HISTORY ---
    #[error("JSON Error in {path}: {source}")]
    #[diagnostic(code(dqt::infra::json))]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(dqt::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found: {0}")]
    #[diagnostic(code(dqt::infra::config_missing))]
    ConfigNotFound(String),
}

impl InfrastructureError {
    pub fn yaml(path: impl AsRef<std::path::Path>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn json(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
