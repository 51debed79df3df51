use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::constants;

/// Application configuration, read from `config.toml` in the config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub management_endpoint: String,
    pub management_audience: String,
    pub vault_dns_suffix: String,
    pub request_timeout_secs: u64,
    pub default_location: Option<String>,
    pub default_vault: Option<String>,
    pub servers_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            management_endpoint: constants::MANAGEMENT_ENDPOINT.to_string(),
            management_audience: constants::MANAGEMENT_AUDIENCE.to_string(),
            vault_dns_suffix: constants::VAULT_DNS_SUFFIX.to_string(),
            request_timeout_secs: 60,
            default_location: None,
            default_vault: None,
            servers_file: None,
        }
    }
}

impl Config {
    /// Directory holding `config.toml` and `sessions.json`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("azure-ops")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".azure-ops")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn sessions_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("sessions.json"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            debug!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}
