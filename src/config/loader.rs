//! Configuration discovery, layering and loading.
//!
//! Files are merged in this order, later layers winning:
//! 1. User global config (`~/.fims/config.yml`)
//! 2. Project config (`.fims/config.yml`)
//! 3. Local overrides (`.fims/config.local.yml`)
//!
//! Unlike most tools, no file is required: an empty layer stack yields the
//! default configuration (local backend, manual positions).

use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::FimsConfig;
use crate::error::{FimsError, Result};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".fims";

/// Existing configuration files, in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub user_global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let existing = |p: PathBuf| if p.exists() { Some(p) } else { None };
        Self {
            user_global: dirs::home_dir()
                .map(|home| home.join(CONFIG_DIR).join("config.yml"))
                .and_then(existing),
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// All existing paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Deep merge two YAML values.
///
/// Mappings merge recursively, a null in `overlay` deletes the key, and
/// anything else in `overlay` replaces the base value.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                } else {
                    let combined = match base_map.get(key) {
                        Some(existing) => deep_merge(existing, value),
                        None => value.clone(),
                    };
                    merged.insert(key.clone(), combined);
                }
            }
            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

fn read_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FimsError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            FimsError::Io(e)
        }
    })?;

    // An empty file parses as null; treat it as an empty layer.
    let value: Value = serde_yaml::from_str(&content).map_err(|e| FimsError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(if value.is_null() {
        Value::Mapping(Default::default())
    } else {
        value
    })
}

fn into_config(value: Value, source: &Path) -> Result<FimsConfig> {
    serde_yaml::from_value(value).map_err(|e| FimsError::ConfigParseError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge every config layer for a project.
pub fn load_merged_config(project_root: &Path) -> Result<FimsConfig> {
    let paths = ConfigPaths::discover(project_root);

    let mut merged = Value::Mapping(Default::default());
    for path in paths.all_existing() {
        tracing::debug!("Loading config layer {}", path.display());
        merged = deep_merge(&merged, &read_value(path)?);
    }

    into_config(merged, &project_root.join(CONFIG_DIR).join("config.yml"))
}

/// Load configuration, honouring an explicit `--config` file.
///
/// An explicit file is loaded on its own, without layering, and must exist.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<FimsConfig> {
    match config_override {
        Some(path) => into_config(read_value(path)?, path),
        None => load_merged_config(project_root),
    }
}

/// Directory for small state files such as the position cache.
pub fn state_dir(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("state")
}
