//! Application configuration
//!
//! Values are resolved in order (highest priority wins): environment
//! variables, then `skiff.toml` when present, then defaults.

use std::env;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde::{Deserialize, Serialize};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "skiff.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server listening address
    /// Env: SKIFF_HOST
    /// Default: "127.0.0.1"
    pub host: String,

    /// Server listening port
    /// Env: SKIFF_PORT
    /// Default: 4321
    pub port: u16,

    /// Enable verbose diagnostics in the embedding application
    /// Env: SKIFF_DEBUG
    /// Default: false
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 4321, debug: false }
    }
}

impl AppConfig {
    /// Load with full supersedence: defaults, then `skiff.toml` if it
    /// exists, then environment variables.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_env_vars();
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_vars(&mut self) {
        if let Ok(host) = env::var("SKIFF_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("SKIFF_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(debug) = env::var("SKIFF_DEBUG") {
            self.debug = debug == "1" || debug.eq_ignore_ascii_case("true");
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("server host must not be empty");
        }
        Ok(())
    }

    /// The `host:port` string handed to `TcpListener::bind`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4321);
        assert!(!config.debug);
        assert_eq!(config.addr(), "127.0.0.1:4321");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiff.toml");
        std::fs::write(&path, "host = \"0.0.0.0\"\nport = 8080\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        // Missing keys keep their defaults.
        assert!(!config.debug);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let config = AppConfig { host: String::new(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        // Process-global env vars: keep this the only test that touches them.
        env::set_var("SKIFF_HOST", "10.0.0.1");
        env::set_var("SKIFF_PORT", "9999");
        env::set_var("SKIFF_DEBUG", "true");

        let mut config = AppConfig::default();
        config.apply_env_vars();

        env::remove_var("SKIFF_HOST");
        env::remove_var("SKIFF_PORT");
        env::remove_var("SKIFF_DEBUG");

        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.port, 9999);
        assert!(config.debug);
    }
}
