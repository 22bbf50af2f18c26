//! Configuration loading and management for crux.
//!
//! Loads settings from `crux.toml` with an environment variable override for the
//! backend deployment URL. Every section has defaults, so a missing file is fine.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deployment endpoint used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "https://cruxai-app.onrender.com";

/// Environment variable overriding `backend.base_url`
pub const BACKEND_URL_ENV: &str = "CRUX_BACKEND_URL";

const CONFIG_FILE_NAME: &str = "crux.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid backend url: {0}")]
    InvalidBackendUrl(String),
}

/// Summarization backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the `/summarize-*` endpoints hang off
    pub base_url: String,
    /// Append the backend's error detail to the user-facing failure message
    pub show_error_detail: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Where the TUI writes its log file (defaults to the local data dir)
    pub directory: Option<PathBuf>,
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Colour theme: "crux" or "mono"
    pub theme: String,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from an explicit path, or from the default locations
    /// (crux.toml in cwd or home). No file at the default locations means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match Self::find_config_file() {
                Some(path) => Self::load_from(&path)?,
                None => Config::default(),
            },
        };

        let config = config.with_backend_override(std::env::var(BACKEND_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Replace the backend URL when an override is present and non-blank
    pub fn with_backend_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
        self
    }

    /// Check values that would only fail later, at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let raw = self.backend.base_url.trim();
        let invalid = || ConfigError::InvalidBackendUrl(raw.to_string());
        let url = Url::parse(raw).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("crux")
            .join(CONFIG_FILE_NAME);
        home_config.exists().then_some(home_config)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            show_error_detail: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    /// Directory for the TUI log file
    pub fn log_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("crux")
        })
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "crux".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert!(!config.backend.show_error_detail);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.theme, "crux");
    }

    #[test]
    fn load_from_reads_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nbase_url = \"http://127.0.0.1:5000\"\n\n[ui]\ntheme = \"mono\""
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert!(!config.backend.show_error_detail);
        assert_eq!(config.ui.theme, "mono");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_with_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\nbase_url = 3").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn backend_override_replaces_url() {
        let config = Config::default().with_backend_override(Some(" http://localhost:8080 ".into()));
        assert_eq!(config.backend.base_url, "http://localhost:8080");
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = Config::default().with_backend_override(Some("   ".into()));
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        let config = Config::default().with_backend_override(Some("ftp://example.com".into()));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBackendUrl(_))
        ));
    }

    #[test]
    fn validate_rejects_malformed_urls() {
        for url in ["http://", "file:///tmp/crux", "localhost:5000", "not a url"] {
            let config = Config::default().with_backend_override(Some(url.into()));
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidBackendUrl(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn validate_accepts_default_and_local_urls() {
        assert!(Config::default().validate().is_ok());
        let local = Config::default().with_backend_override(Some("http://127.0.0.1:5000".into()));
        assert!(local.validate().is_ok());
    }

    #[test]
    fn log_dir_prefers_configured_directory() {
        let logging = LoggingConfig {
            directory: Some(PathBuf::from("/tmp/crux-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(logging.log_dir(), PathBuf::from("/tmp/crux-logs"));
    }
}
