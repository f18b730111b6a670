// dqt-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes `content` through a temporary file in the target directory, then
/// renames it over `path`. Readers see either the old file or the new one.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Loads a YAML document, or `None` when the file does not exist yet.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, InfrastructureError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| InfrastructureError::yaml(path, e))
}

pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), InfrastructureError> {
    let content = serde_yaml::to_string(value).map_err(|e| InfrastructureError::yaml(path, e))?;
    atomic_write(path, content)
}

/// Loads a JSON document, or `None` when the file does not exist yet.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, InfrastructureError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| InfrastructureError::json(path, e))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), InfrastructureError> {
    let content =
        serde_json::to_string_pretty(value).map_err(|e| InfrastructureError::json(path, e))?;
    atomic_write(path, content)
}
