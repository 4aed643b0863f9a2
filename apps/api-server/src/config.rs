//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PORT=8080                                                          │
//! │     ALLOWED_ORIGINS=https://app.example.com                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $BILLEASE_CONFIG, or                                               │
//! │     ~/.config/billease/billease.toml (Linux)                           │
//! │     ~/Library/Application Support/com.billease.suite/billease.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     port 3001, any origin, development                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billease.toml
//! port = 3001
//! bind_addr = "0.0.0.0"
//! allowed_origins = ["http://localhost:5173"]
//! environment = "development"
//! compression_threshold = 1024
//! compression_level = 6
//! body_limit_bytes = 10485760
//! log_filter = "info,billease=debug,tower_http=info"
//! ```

use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment.
///
/// Production turns off per-request trace spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
            Environment::Test => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::InvalidValue {
                key: "BILLEASE_ENV".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

fn default_port() -> u16 {
    3001
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_compression_threshold() -> u16 {
    1024
}

fn default_compression_level() -> u32 {
    6
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

fn default_log_filter() -> String {
    "info,billease=debug,tower_http=info".to_string()
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// CORS origins; empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default)]
    pub environment: Environment,

    /// Responses smaller than this many bytes are sent uncompressed.
    #[serde(default = "default_compression_threshold")]
    pub compression_threshold: u16,

    /// gzip level, 0-9.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Maximum request body size.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            bind_addr: default_bind_addr(),
            allowed_origins: Vec::new(),
            environment: Environment::default(),
            compression_threshold: default_compression_threshold(),
            compression_level: default_compression_level(),
            body_limit_bytes: default_body_limit(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`$BILLEASE_CONFIG` or the platform config dir)
    /// 3. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("BILLEASE_CONFIG")
            .map(PathBuf::from)
            .or_else(Self::default_config_path);
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Loads configuration from an optional file and an environment lookup.
    pub fn load_from(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading server config from file");
                let contents =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::from_toml(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = env("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(addr) = env("BILLEASE_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(origins) = env("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(environment) = env("BILLEASE_ENV") {
            self.environment = environment.parse()?;
        }
        if let Some(threshold) = env("BILLEASE_COMPRESSION_THRESHOLD") {
            self.compression_threshold = parse_var("BILLEASE_COMPRESSION_THRESHOLD", &threshold)?;
        }
        if let Some(level) = env("BILLEASE_COMPRESSION_LEVEL") {
            self.compression_level = parse_var("BILLEASE_COMPRESSION_LEVEL", &level)?;
        }
        if let Some(limit) = env("BILLEASE_BODY_LIMIT") {
            self.body_limit_bytes = parse_var("BILLEASE_BODY_LIMIT", &limit)?;
        }
        if let Some(filter) = env("BILLEASE_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > 9 {
            return Err(ConfigError::Invalid(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        if self.body_limit_bytes == 0 {
            return Err(ConfigError::Invalid(
                "body_limit_bytes must be greater than 0".into(),
            ));
        }
        if let Some(origin) = self
            .allowed_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid(format!("Invalid CORS origin: {origin}")));
        }
        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "billease", "suite")
            .map(|dirs| dirs.config_dir().join("billease.toml"))
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Per-request trace spans are off in production.
    pub fn trace_requests(&self) -> bool {
        self.environment != Environment::Production
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::load_from(None, env_of(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3001);
        assert_eq!(config.body_limit_bytes, 10 * 1024 * 1024);
        assert!(config.allowed_origins.is_empty());
        assert!(config.trace_requests());
    }

    #[test]
    fn test_toml_keys_fill_defaults() {
        let config = ServerConfig::from_toml("port = 4000\nenvironment = \"production\"").unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.compression_level, 6);
        assert!(!config.trace_requests());
    }

    #[test]
    fn test_env_overrides_file() {
        let path = std::env::temp_dir().join(format!("billease-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "port = 4000\ncompression_level = 3\n").unwrap();

        let config = ServerConfig::load_from(
            Some(&path),
            env_of(&[
                ("PORT", "5000"),
                ("ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.port, 5000);
        assert_eq!(config.compression_level, 3);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("billease-does-not-exist.toml");
        let config = ServerConfig::load_from(Some(&path), env_of(&[])).unwrap();
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ServerConfig::load_from(None, env_of(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT: 'eighty'");

        let err =
            ServerConfig::load_from(None, env_of(&[("BILLEASE_COMPRESSION_LEVEL", "12")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(ServerConfig::load_from(None, env_of(&[("BILLEASE_ENV", "staging")])).is_err());
        assert!(ServerConfig::from_toml("port = \"x\"").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(Environment::Test.to_string(), "test");
    }
}
