use crate::error::{FolioError, Result};
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BIND: &str = "127.0.0.1:1337";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_REMOTE_NAME: &str = "wordpress";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 5;

/// Configuration for folio, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolioConfig {
    /// Address `folio serve` listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Upload directory; relative paths are resolved against the data dir
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Base URL of a WordPress-compatible proxy merged into hybrid listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Tag given to remote articles in hybrid listings
    #[serde(default = "default_remote_name")]
    pub remote_name: String,

    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,

    /// Bearer token required by the webhook endpoints. Unset means open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_token: Option<String>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOAD_DIR)
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_remote_name() -> String {
    DEFAULT_REMOTE_NAME.to_string()
}

fn default_remote_timeout_secs() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            remote_url: None,
            remote_name: default_remote_name(),
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            webhook_token: None,
        }
    }
}

impl FolioConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FolioError::Io)?;
        let config: FolioConfig =
            serde_json::from_str(&content).map_err(FolioError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FolioError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FolioError::Serialization)?;
        fs::write(config_path, content).map_err(FolioError::Io)?;
        Ok(())
    }

    pub fn upload_dir_in(&self, data_dir: &Path) -> PathBuf {
        if self.upload_dir.is_absolute() {
            self.upload_dir.clone()
        } else {
            data_dir.join(&self.upload_dir)
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "bind",
            "upload_dir",
            "max_upload_bytes",
            "remote_url",
            "remote_name",
            "remote_timeout_secs",
            "webhook_token",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "bind" => self.bind.clone(),
            "upload_dir" => self.upload_dir.display().to_string(),
            "max_upload_bytes" => self.max_upload_bytes.to_string(),
            "remote_url" => self.remote_url.clone().unwrap_or_default(),
            "remote_name" => self.remote_name.clone(),
            "remote_timeout_secs" => self.remote_timeout_secs.to_string(),
            "webhook_token" => self.webhook_token.clone().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    /// Sets a key from its string form. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match key {
            "bind" => self.bind = value.to_string(),
            "upload_dir" => self.upload_dir = PathBuf::from(value),
            "max_upload_bytes" => {
                self.max_upload_bytes = value
                    .parse()
                    .map_err(|_| format!("Invalid byte count: {}", value))?
            }
            "remote_url" => self.remote_url = optional(value),
            "remote_name" => self.remote_name = value.to_string(),
            "remote_timeout_secs" => {
                self.remote_timeout_secs = value
                    .parse()
                    .map_err(|_| format!("Invalid timeout: {}", value))?
            }
            "webhook_token" => self.webhook_token = optional(value),
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}
