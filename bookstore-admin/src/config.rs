//! Configuration loading for the admin console.
//!
//! Loads configuration from a TOML file and/or environment variables using
//! figment, so the console runs the same way from a config file or a
//! container.
//!
//! # Configuration Sources (in order of priority, lowest to highest)
//!
//! 1. Default values (from `#[serde(default)]` attributes)
//! 2. TOML config file (if it exists)
//! 3. Environment variables (prefix: `BOOKSTORE_ADMIN_`, nested with `__`)
//!
//! # Environment Variable Naming
//!
//! - `BOOKSTORE_ADMIN_SERVER__LISTEN_ADDR` → `server.listen_addr`
//! - `BOOKSTORE_ADMIN_SERVER__SECURE_COOKIES` → `server.secure_cookies`
//! - `BOOKSTORE_ADMIN_BACKEND__BASE_URL` → `backend.base_url`
//! - `BOOKSTORE_ADMIN_BACKEND__REQUEST_TIMEOUT_SECS` → `backend.request_timeout_secs`

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "BOOKSTORE_ADMIN_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Console HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Bookstore backend the console talks to
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Mark the session cookie `Secure`. Enable when served over HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            secure_cookies: false,
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the REST API; endpoint paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Accept self-signed certificates (development backends only)
    #[serde(default)]
    pub allow_invalid_tls: bool,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            allow_invalid_tls: false,
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5400/api/".to_string()
}

impl Config {
    /// Load configuration from `path` (if present) and the environment.
    ///
    /// # Example
    ///
    /// ```bash
    /// # Point the console at a staging backend
    /// export BOOKSTORE_ADMIN_BACKEND__BASE_URL=https://staging.example.com/api/
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        Self::figment(path)
            .extract()
            .with_context(|| {
                format!("Failed to load config from {} and environment", path.display())
            })
    }

    fn figment(path: &Path) -> Figment {
        let mut figment = Figment::new();
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default config file path
    /// - macOS: ~/Library/Application Support/bookstore-admin/config.toml
    /// - Linux: ~/.config/bookstore-admin/config.toml
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bookstore-admin")
            .join("config.toml")
    }

    /// Get the default data directory (logs)
    /// - macOS: ~/Library/Application Support/bookstore-admin/
    /// - Linux: ~/.local/share/bookstore-admin/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bookstore-admin")
    }
}

/// Create a default configuration template
pub fn default_config_template() -> String {
    let defaults = Config::default();
    format!(
        r#"# Bookstore Admin Console Configuration
#
# Every value can be overridden from the environment, e.g.
#   BOOKSTORE_ADMIN_BACKEND__BASE_URL=https://books.example.com/api/

[server]
listen_addr = "{listen_addr}"
# Set to true when the console is served over HTTPS
secure_cookies = false

[backend]
base_url = "{base_url}"
# Accept self-signed certificates (development only)
allow_invalid_tls = false
# Give up on a backend request after this many seconds
# request_timeout_secs = 30
"#,
        listen_addr = defaults.server.listen_addr,
        base_url = defaults.backend.base_url,
    )
}
