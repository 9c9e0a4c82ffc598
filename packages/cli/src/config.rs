// ABOUTME: Runtime configuration for the command-line driver
// ABOUTME: Combines gateway settings with the data directory and comment author

use std::env;
use std::path::PathBuf;

use blueprint_ai::{ConfigError as GatewayConfigError, GatewayConfig};
use blueprint_config as env_vars;
use blueprint_core::constants::DEFAULT_COMMENT_AUTHOR;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Gateway(#[from] GatewayConfigError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub data_dir: PathBuf,
    pub author: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway = GatewayConfig::from_lookup(&lookup)?;

        let data_dir = lookup(env_vars::BLUEPRINT_DATA_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(blueprint_core::blueprint_dir);

        let author = lookup(env_vars::BLUEPRINT_AUTHOR)
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMENT_AUTHOR.to_string());

        Ok(Self {
            gateway,
            data_dir,
            author,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("blueprint.db")
    }
}
