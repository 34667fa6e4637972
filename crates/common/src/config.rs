//! Client configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default backend URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Persisted session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Persisted session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted `token` and `user` entries.
    #[serde(default = "default_session_dir")]
    pub dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: default_session_dir(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_session_dir() -> PathBuf {
    PathBuf::from(".cinerate")
}

fn default_log_filter() -> String {
    "cinerate=info".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` in the working directory (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `CINERATE_ENV`)
    /// 4. Environment variables with `CINERATE__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("CINERATE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CINERATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CINERATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.session.dir, PathBuf::from(".cinerate"));
        assert_eq!(config.log.filter, "cinerate=info");
        assert!(!config.log.json);
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[api]\nbase_url = \"https://movies.example.com\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://movies.example.com");
        assert_eq!(config.session.dir, PathBuf::from(".cinerate"));
        assert_eq!(config.log.filter, "cinerate=info");
    }

    #[test]
    fn test_from_missing_file_fails() {
        let result = Config::from_file("/nonexistent/cinerate.toml");
        assert!(result.is_err());
    }
}
