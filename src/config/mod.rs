use crate::api::DEFAULT_API_BASE;
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the classification/answer API.
    pub api_base_url: String,
    /// Directory holding the persisted session set.
    pub data_dir: PathBuf,
    pub reveal: RevealConfig,

    #[serde(skip)]
    pub config_path: PathBuf,
}

/// Incremental reveal of assistant replies: `step_chars` characters per
/// `tick_ms` milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub enabled: bool,
    pub step_chars: usize,
    pub tick_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step_chars: 2,
            tick_ms: 14,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            data_dir: PathBuf::new(),
            reveal: RevealConfig::default(),
            config_path: PathBuf::new(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".to_string()))?;
        let aerodoc_dir = home.join(".aerodoc");
        let config_path = aerodoc_dir.join("config.toml");

        if !aerodoc_dir.exists() {
            fs::create_dir_all(&aerodoc_dir)?;
        }

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|error| ConfigError::Load(error.to_string()))?;
            config.config_path = config_path;
            if config.data_dir.as_os_str().is_empty() {
                config.data_dir = aerodoc_dir.join("chats");
            }
            Ok(config)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                data_dir: aerodoc_dir.join("chats"),
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|error| ConfigError::Load(error.to_string()))?;
        fs::write(&self.config_path, toml_str)?;
        Ok(())
    }
}
