//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use buddy_assistant::Endpoint;

/// Default hosted endpoint; overridable via config or environment.
const DEFAULT_API_URL: &str = "https://cloud.flowiseai.com";
const DEFAULT_CHATFLOW_ID: &str = "30c97938-1c04-4822-998d-e00b368a8833";

/// Configuration for buddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant endpoint
    pub api_url: Option<String>,
    /// API key for the assistant endpoint
    pub api_key: Option<String>,
    /// Chatflow to address on that endpoint
    pub chatflow_id: Option<String>,
    /// Display currency for prices
    pub currency: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("techbuddy")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for TECHBUDDY_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("TECHBUDDY_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        fs::create_dir_all(dir)?;

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            api_url: Some(DEFAULT_API_URL.to_string()),
            api_key: None,
            chatflow_id: Some(DEFAULT_CHATFLOW_ID.to_string()),
            currency: Some("JOD".to_string()),
        };

        default_config.save()?;
        Ok(path)
    }

    /// Resolve the assistant endpoint. Environment variables take
    /// precedence over the config file, which falls back to the defaults.
    pub fn endpoint(&self) -> Endpoint {
        let api_url = std::env::var("TECHBUDDY_API_URL")
            .ok()
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_key = std::env::var("TECHBUDDY_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
            .unwrap_or_default();

        let chatflow_id = self
            .chatflow_id
            .clone()
            .unwrap_or_else(|| DEFAULT_CHATFLOW_ID.to_string());

        Endpoint::new(api_url, chatflow_id, api_key)
    }

    /// Display currency, defaulting to JOD.
    pub fn currency(&self) -> String {
        self.currency.clone().unwrap_or_else(|| "JOD".to_string())
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# buddy configuration file
# Place at ~/.config/techbuddy/config.toml (Linux/Mac) or %APPDATA%\techbuddy\config.toml (Windows)

# Base URL of the hosted assistant endpoint
api_url = "https://cloud.flowiseai.com"

# API key for the endpoint (can also use TECHBUDDY_API_KEY)
# api_key = "..."

# Chatflow to address on that endpoint
chatflow_id = "30c97938-1c04-4822-998d-e00b368a8833"

# Display currency for prices
currency = "JOD"
"#
}
