use crate::settings::{Keymap, Settings};
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::warn;

pub const API_URL_ENV: &str = "TOME_API_URL";
pub const AUTH_TOKEN_ENV: &str = "TOME_AUTH_TOKEN";

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: Keymap,
    filepath: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    #[serde(rename = "Setting")]
    setting: Settings,
    #[serde(rename = "Keymap")]
    keymap: Keymap,
}

impl Config {
    /// Load `configuration.json` from the application data directory,
    /// writing the defaults there on first run.
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let config = Self::load_from(prefix.join("configuration.json"))?;
        if !config.filepath.exists() {
            config.save()?;
        }
        Ok(config)
    }

    /// Load configuration from a custom path. A missing file gives defaults;
    /// an unreadable one is reported and ignored.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let file = if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<ConfigFile>(&config_str) {
                Ok(file) => file,
                Err(err) => {
                    warn!(path = %filepath.display(), error = %err, "ignoring malformed configuration");
                    ConfigFile::default()
                }
            }
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            settings: file.setting,
            keymap: file.keymap,
            filepath,
        })
    }

    /// Defaults not backed by any file, for when no data directory exists.
    pub fn with_defaults() -> Self {
        Self {
            settings: Settings::default(),
            keymap: Keymap::default(),
            filepath: PathBuf::new(),
        }
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Apply `TOME_API_URL` and `TOME_AUTH_TOKEN` on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty()) {
            self.settings.api_base_url = url;
        }
        if let Some(token) = std::env::var(AUTH_TOKEN_ENV).ok().filter(|v| !v.trim().is_empty()) {
            self.settings.auth_token = Some(token);
        }
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("tome"));
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("tome");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".tome"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".tome"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
