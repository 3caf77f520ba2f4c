use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `tmdb.apikey`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "api_key", rename = "apikey")]
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(alias = "base_url", rename = "baseurl")]
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(alias = "image_base", rename = "imagebase")]
    #[serde(default = "default_image_base")]
    pub image_base: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Upstream request timeout in seconds. Unset leaves reqwest's default
    /// (no timeout).
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_base: default_image_base(),
            language: default_language(),
            timeout: None,
        }
    }
}

// Keep the key out of debug output and logs.
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("image_base", &self.image_base)
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TmdbConfig {
    /// The upstream credential, if one is configured and non-empty.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Load the config file if it exists, fall back to defaults if it does
    /// not, then apply environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Config::default()
        };
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.tmdb.api_key = Some(key);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}
