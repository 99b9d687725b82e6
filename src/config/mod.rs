use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::ConfigError,
    utils::{atomic, paths},
};

const CONFIG_FILE: &str = "config.json";

/// User preferences for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub screen_reader_mode: bool,
    #[serde(default)]
    pub quiet_mode: bool,
    /// When disabled, progress lives in memory only and is lost on exit.
    #[serde(default = "Config::default_true")]
    pub persist_progress: bool,
    /// Optional custom location for the saved session. Defaults to `<app dir>/session.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui_color_enabled: true,
            screen_reader_mode: false,
            quiet_mode: false,
            persist_progress: true,
            session_file: None,
        }
    }
}

impl Config {
    fn default_true() -> bool {
        true
    }

    pub fn resolve_session_file(&self, base: &Path) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| paths::session_file_in(base))
    }
}

/// Loads and saves [`Config`] under an application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        let config_path = base.join(CONFIG_FILE);
        Ok(Self {
            base_dir: base,
            config_path,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        atomic::write_atomic(&self.config_path, &json)?;
        Ok(())
    }
}
