use crate::error::{ProjectFlowError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "projectflow";

/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "PROJECTFLOW_API_URL";

/// Environment variable overriding `demo` ("1", "true", "yes" enable it).
pub const DEMO_ENV: &str = "PROJECTFLOW_DEMO";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for the ProjectFlow client.
///
/// Missing fields in a config file fall back to their defaults, so partial
/// configs work.
///
/// # Example
///
/// ```toml
/// api_url = "http://127.0.0.1:8000"
/// request_timeout_secs = 10
/// demo = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the ProjectFlow REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Use the built-in demo data instead of the REST API.
    #[serde(default)]
    pub demo: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            demo: false,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply `PROJECTFLOW_API_URL` / `PROJECTFLOW_DEMO` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(env::var(API_URL_ENV).ok(), env::var(DEMO_ENV).ok())
    }

    fn with_overrides(mut self, api_url: Option<String>, demo: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(flag) = demo {
            self.demo = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }
}

// ============================================================================
// Config Validation
// ============================================================================

use std::error::Error;
use std::fmt;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `api_url` is not an http(s) URL.
    InvalidApiUrl(String),
    /// `request_timeout_secs` is zero.
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl(url) => write!(
                f,
                "Invalid api_url '{}'. It must start with http:// or https://",
                url
            ),
            ConfigError::ZeroTimeout => {
                write!(f, "request_timeout_secs must be greater than zero")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validate a configuration for logical consistency.
///
/// # Validation Rules
///
/// - `api_url` must be an `http://` or `https://` URL
/// - `request_timeout_secs` must be non-zero
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    let url = config.api_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(config.api_url.clone()));
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    Ok(())
}

// ============================================================================
// Config File Management
// ============================================================================

const CONFIG_FILENAME: &str = "config.toml";

/// Default config file content with explanatory comments.
const DEFAULT_CONFIG_WITH_COMMENTS: &str = r#"# ProjectFlow Configuration

# Base URL of the ProjectFlow REST API
api_url = "http://127.0.0.1:8000"

# Timeout for each API request, in seconds
request_timeout_secs = 10

# Demo mode: use built-in sample projects and accounts instead of the API
# - true: work offline against demo data (changes are not saved)
# - false: talk to the API at api_url
demo = false
"#;

/// Get the projectflow config directory path (~/.config/projectflow/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        ProjectFlowError::Config("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Ensure the config directory exists. Returns whether it was newly created.
pub fn ensure_config_dir() -> Result<(PathBuf, bool)> {
    let dir = config_dir()?;
    let created = !dir.exists();
    fs::create_dir_all(&dir)?;
    Ok((dir, created))
}

/// Get the path to `~/.config/projectflow/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/projectflow/config.toml`.
///
/// If the file doesn't exist, it is created with default values and comments.
pub fn load_config() -> Result<Config> {
    let config_path = config_path()?;

    if !config_path.exists() {
        ensure_config_dir()?;
        fs::write(&config_path, DEFAULT_CONFIG_WITH_COMMENTS)?;
        return Ok(Config::default());
    }

    parse_config(&fs::read_to_string(&config_path)?, &config_path)
}

fn parse_config(content: &str, path: &std::path::Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| {
        ProjectFlowError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            path, e
        ))
    })
}

/// Get the effective configuration: file, then environment overrides, then
/// validation.
pub fn get_effective_config() -> Result<Config> {
    let config = load_config()?.with_env_overrides();
    validate_config(&config).map_err(|e| ProjectFlowError::Config(e.to_string()))?;
    log::debug!("effective config: {:?}", config);
    Ok(config)
}
