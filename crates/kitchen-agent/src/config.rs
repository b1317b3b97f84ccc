//! Configuration loading, from `.kitchen/config.yaml` or an explicit file.

use std::path::{Path, PathBuf};

use kitchen_exec::ExecutorConfig;
use kitchen_planner::PlannerConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AgentConfig;

/// Project-relative location of the config file.
pub const PROJECT_CONFIG: &str = ".kitchen/config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config from {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Everything tunable about a run. Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Global seed; each agent derives its own streams from it.
    pub seed: u64,
    pub agent: AgentConfig,
    pub planner: PlannerConfig,
    pub executor: ExecutorConfig,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            agent: AgentConfig::default(),
            planner: PlannerConfig::default(),
            executor: ExecutorConfig::default(),
        }
    }
}

impl KitchenConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_yaml(path)
    }

    /// Load from a project root (looks for `.kitchen/config.yaml`); defaults when absent.
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        load_from_project(project_root)
    }
}

/// Read a config struct out of a YAML file. Front ends with keys of their own deserialize a
/// wider struct from the same file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// [`load_yaml`] on `.kitchen/config.yaml` under `project_root`; defaults when absent.
pub fn load_from_project<T>(project_root: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let config_path = project_root.join(PROJECT_CONFIG);
    if config_path.exists() {
        load_yaml(&config_path)
    } else {
        Ok(T::default())
    }
}
