//! `config.yaml` loading.
//!
//! Loading never takes a tool down: the `*_or_default` entry points map a
//! missing file to the defaults silently, and an unreadable or malformed file
//! to the defaults with a warning naming the path.

use chartkit_types::ProjectConfig;
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reads a YAML document. `Ok(None)` when the file does not exist.
pub fn load_yaml_value(path: &Path) -> Result<Option<Value>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    // An empty file parses to Null; treat it like an empty mapping.
    let value: Value = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

fn into_config(path: &Path, value: Value) -> Result<ProjectConfig, ConfigError> {
    if value.is_null() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_value(value).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Strict load. `Ok(None)` when the file does not exist.
pub fn load_config(path: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
    match load_yaml_value(path)? {
        Some(value) => into_config(path, value).map(Some),
        None => Ok(None),
    }
}

/// Soft load: any failure degrades to [`ProjectConfig::default`].
pub fn load_config_or_default(path: &Path) -> ProjectConfig {
    match load_config(path) {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::debug!("No config at '{}', using defaults.", path.display());
            ProjectConfig::default()
        }
        Err(e) => {
            log::warn!("{e}; using defaults.");
            ProjectConfig::default()
        }
    }
}

/// Loads the repository config and overlays the keys a page config sets.
///
/// Either file may be absent or broken; a broken page config is ignored
/// with a warning and the repository config is used unchanged.
pub fn load_merged_config(repo_config: &Path, page_config: &Path) -> ProjectConfig {
    let base = match load_yaml_value(repo_config) {
        Ok(value) => value.unwrap_or(Value::Null),
        Err(e) => {
            log::warn!("{e}; using defaults.");
            Value::Null
        }
    };

    let merged = match load_yaml_value(page_config) {
        Ok(Some(overlay)) => {
            let mut merged = base.clone();
            merge_yaml(&mut merged, overlay);
            match into_config(page_config, merged) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("{e}; ignoring page config.");
                    base
                }
            }
        }
        Ok(None) => base,
        Err(e) => {
            log::warn!("{e}; ignoring page config.");
            base
        }
    };

    into_config(repo_config, merged).unwrap_or_else(|e| {
        log::warn!("{e}; using defaults.");
        ProjectConfig::default()
    })
}

/// Recursively overlays mapping keys; any non-mapping value replaces.
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, Value::Null) if !base.is_null() => {}
        (base, overlay) => *base = overlay,
    }
}
