use crate::error::{Result, YutoriError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.yutori.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding an API key
pub const API_KEY_ENV: &str = "YUTORI_API_KEY";

/// Per-user directory holding credentials and settings (under $HOME)
pub const CONFIG_DIR: &str = ".yutori";
pub const SETTINGS_FILE: &str = "settings.toml";

const DEFAULT_CLERK_INSTANCE_URL: &str = "https://clerk.yutori.com";
const DEFAULT_CLERK_CLIENT_ID: &str = "TGiyfoPbG01Sakpe";
const DEFAULT_AUTH_API_BASE_URL: &str = "https://api.dev.yutori.com/v1";
const DEFAULT_SIGN_UP_ENDPOINT: &str = "/client/sign_up";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    /// Verbose logging (not stored in settings file)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// OAuth endpoints used by `yutori auth login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_clerk_instance_url")]
    pub clerk_instance_url: String,

    #[serde(default = "default_clerk_client_id")]
    pub clerk_client_id: String,

    /// Key-generation API, separate from the data API
    #[serde(default = "default_auth_api_base_url")]
    pub auth_api_base_url: String,

    /// Path on the key-generation API that creates the account on register
    #[serde(default = "default_sign_up_endpoint")]
    pub sign_up_endpoint: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            clerk_instance_url: default_clerk_instance_url(),
            clerk_client_id: default_clerk_client_id(),
            auth_api_base_url: default_auth_api_base_url(),
            sign_up_endpoint: default_sign_up_endpoint(),
        }
    }
}

fn default_clerk_instance_url() -> String {
    DEFAULT_CLERK_INSTANCE_URL.to_string()
}

fn default_clerk_client_id() -> String {
    DEFAULT_CLERK_CLIENT_ID.to_string()
}

fn default_auth_api_base_url() -> String {
    DEFAULT_AUTH_API_BASE_URL.to_string()
}

fn default_sign_up_endpoint() -> String {
    DEFAULT_SIGN_UP_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

fn default_poll_timeout() -> u64 {
    600
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_base_url)
    /// 2. Environment variables
    /// 3. Settings file (~/.yutori/settings.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = settings_path() {
            if path.exists() {
                config = config.merge(Self::from_file(&path)?);
            }
        }

        config.merge_env()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(mut self, other: Self) -> Self {
        if other.api.base_url != DEFAULT_BASE_URL {
            self.api.base_url = other.api.base_url;
        }
        if other.api.timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.api.timeout_secs = other.api.timeout_secs;
        }

        if other.auth.clerk_instance_url != DEFAULT_CLERK_INSTANCE_URL {
            self.auth.clerk_instance_url = other.auth.clerk_instance_url;
        }
        if other.auth.clerk_client_id != DEFAULT_CLERK_CLIENT_ID {
            self.auth.clerk_client_id = other.auth.clerk_client_id;
        }
        if other.auth.auth_api_base_url != DEFAULT_AUTH_API_BASE_URL {
            self.auth.auth_api_base_url = other.auth.auth_api_base_url;
        }
        if other.auth.sign_up_endpoint != DEFAULT_SIGN_UP_ENDPOINT {
            self.auth.sign_up_endpoint = other.auth.sign_up_endpoint;
        }

        if other.polling.interval_secs != default_poll_interval() {
            self.polling.interval_secs = other.polling.interval_secs;
        }
        if other.polling.timeout_secs != default_poll_timeout() {
            self.polling.timeout_secs = other.polling.timeout_secs;
        }

        self
    }

    /// Apply environment variable overrides
    fn merge_env(mut self) -> Result<Self> {
        if let Some(url) = non_empty_env("YUTORI_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(raw) = non_empty_env("YUTORI_TIMEOUT_SECS") {
            self.api.timeout_secs = raw.parse().map_err(|_| {
                YutoriError::InvalidArgument(format!(
                    "YUTORI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?;
        }
        if let Some(url) = non_empty_env("CLERK_INSTANCE_URL") {
            self.auth.clerk_instance_url = url;
        }
        if let Some(id) = non_empty_env("CLERK_CLIENT_ID") {
            self.auth.clerk_client_id = id;
        }
        if let Some(url) = non_empty_env("YUTORI_AUTH_API_BASE_URL") {
            self.auth.auth_api_base_url = url;
        }
        Ok(self)
    }

    /// Apply a `--base-url` flag if one was given
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url.to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

/// Strip trailing slashes so paths can be appended with a single `/`.
pub fn sanitize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// ~/.yutori
pub fn config_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_DIR))
}

fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
