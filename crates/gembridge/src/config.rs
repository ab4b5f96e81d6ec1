use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{GembridgeError, Result};

/// Main configuration structure for Gembridge
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Relay gateway configuration
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Relay gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// API credential. Absent means the shim never activates and the client
    /// behaves like the plain Gemini client.
    #[serde(default)]
    pub api_key: Option<ApiKey>,
    /// Base service endpoint of the relay gateway
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default model identifier for generation requests
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// An API credential, either a plain string or a secret-wrapped value.
///
/// The wrapped form (`api_key = { secret = "..." }` in TOML) exists for
/// configurations that keep credentials behind a redaction boundary;
/// [`ApiKey::reveal`] returns the inner value in both cases.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiKey {
    /// Plain string credential
    Plain(String),
    /// Secret-wrapped credential
    Wrapped(SecretKey),
}

/// A credential kept behind a redaction boundary
#[derive(Clone, Deserialize)]
pub struct SecretKey {
    secret: String,
}

impl ApiKey {
    /// Return the underlying credential value
    pub fn reveal(&self) -> &str {
        match self {
            ApiKey::Plain(value) => value,
            ApiKey::Wrapped(key) => &key.secret,
        }
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        ApiKey::Plain(value.to_string())
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        ApiKey::Plain(value)
    }
}

// Credentials never appear in logs or debug output.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl Config {
    /// Load configuration from a file, or from the default search paths.
    ///
    /// Search order when no explicit path is given:
    /// `~/.gembridge/config.toml`, the platform config directory, then
    /// `config.toml` in the working directory. Missing files fall back to
    /// defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(&path);
        }

        let default_paths = [
            dirs::home_dir().map(|h| h.join(".gembridge").join("config.toml")),
            dirs::config_dir().map(|c| c.join("gembridge").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GembridgeError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| GembridgeError::Config(format!("Failed to parse config: {e}")))
    }
}
