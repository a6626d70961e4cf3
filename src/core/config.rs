use crate::core::currency::Currency;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FRANKFURTER_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig {
                base_url: DEFAULT_FRANKFURTER_URL.to_string(),
            }),
        }
    }
}

/// Initial selection for every selector pair.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct DefaultsConfig {
    #[serde(default = "default_from")]
    pub from: Currency,
    #[serde(default = "default_to")]
    pub to: Currency,
}

fn default_from() -> Currency {
    Currency::DEFAULT_FROM
}

fn default_to() -> Currency {
    Currency::DEFAULT_TO
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: default_from(),
            to: default_to(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChartConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_flags_dir() -> String {
    "flags".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default = "default_flags_dir")]
    pub flags_dir: String,
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            defaults: DefaultsConfig::default(),
            flags_dir: default_flags_dir(),
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or the built-in defaults
    /// when no config file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn frankfurter_base_url(&self) -> &str {
        self.providers
            .frankfurter
            .as_ref()
            .map_or(DEFAULT_FRANKFURTER_URL, |p| &p.base_url)
    }
}
