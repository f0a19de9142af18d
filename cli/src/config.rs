//! Configuration file and environment overrides.
//!
//! Precedence, lowest first: built-in defaults, `surveyor.toml`, `SURVEYOR_*`
//! environment variables, command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use surveyor_db::pool::DEFAULT_DATABASE_URL;
use surveyor_http::{DEFAULT_FORM_URL, HttpSourceConfig};
use surveyor_runtime::DEFAULT_RESTART_DELAY;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "surveyor.toml";

pub const DEFAULT_LOG_FILTER: &str = "info,surveyor=info";

pub const ENV_SOURCE_URL: &str = "SURVEYOR_SOURCE_URL";
pub const ENV_SOURCE_FILE: &str = "SURVEYOR_SOURCE_FILE";
pub const ENV_DATABASE_URL: &str = "SURVEYOR_DATABASE_URL";
pub const ENV_RESTART_DELAY_MS: &str = "SURVEYOR_RESTART_DELAY_MS";
pub const ENV_MASTER_KEY: &str = "SURVEYOR_MASTER_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Top-level `surveyor.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyorConfig {
    pub source: SourceConfig,
    pub store: StoreConfig,
    pub session: SessionSettings,
    /// `tracing` filter directive; `RUST_LOG` still wins.
    pub log_filter: Option<String>,
}

/// Where the catalog comes from. `file` wins over `url` when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub file: Option<PathBuf>,
    pub timeout_secs: u64,
    pub master_key: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FORM_URL.to_string(),
            file: None,
            timeout_secs: 10,
            master_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub restart_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            restart_delay_ms: DEFAULT_RESTART_DELAY.as_millis() as u64,
        }
    }
}

impl SurveyorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the effective configuration for this process.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `SURVEYOR_*` overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup(ENV_SOURCE_URL) {
            self.source.url = url;
        }
        if let Some(file) = lookup(ENV_SOURCE_FILE) {
            self.source.file = Some(PathBuf::from(file));
        }
        if let Some(key) = lookup(ENV_MASTER_KEY) {
            self.source.master_key = Some(key);
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.store.database_url = url;
        }
        if let Some(raw) = lookup(ENV_RESTART_DELAY_MS) {
            self.session.restart_delay_ms =
                raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: ENV_RESTART_DELAY_MS,
                    value: raw,
                })?;
        }
        Ok(self)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.session.restart_delay_ms)
    }

    pub fn http_source(&self) -> HttpSourceConfig {
        let mut config = HttpSourceConfig::new(&self.source.url)
            .with_timeout(Duration::from_secs(self.source.timeout_secs.max(1)));
        config.master_key = self.source.master_key.clone();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SurveyorConfig::default();
        assert_eq!(config.source.url, DEFAULT_FORM_URL);
        assert_eq!(config.store.database_url, "sqlite://surveyor.db");
        assert_eq!(config.restart_delay(), Duration::from_millis(2000));
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SurveyorConfig::from_toml(
            r#"
            log_filter = "debug"

            [source]
            file = "form.json"

            [session]
            restart_delay_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.source.file, Some(PathBuf::from("form.json")));
        assert_eq!(config.source.url, DEFAULT_FORM_URL);
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.restart_delay(), Duration::from_millis(500));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let err = SurveyorConfig::from_toml("[session]\nrestart_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = SurveyorConfig::from_toml("[store]\ndatabase_url = \"sqlite://file.db\"")
            .unwrap()
            .with_env(env(&[
                (ENV_DATABASE_URL, "sqlite::memory:"),
                (ENV_MASTER_KEY, "k"),
                (ENV_RESTART_DELAY_MS, " 10 "),
                (ENV_SOURCE_URL, ""),
            ]))
            .unwrap();

        assert_eq!(config.store.database_url, "sqlite::memory:");
        assert_eq!(config.source.master_key.as_deref(), Some("k"));
        assert_eq!(config.restart_delay(), Duration::from_millis(10));
        assert_eq!(config.source.url, DEFAULT_FORM_URL);
    }

    #[test]
    fn test_bad_env_delay() {
        let err = SurveyorConfig::default()
            .with_env(env(&[(ENV_RESTART_DELAY_MS, "two seconds")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value `two seconds` for SURVEYOR_RESTART_DELAY_MS"
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surveyor.toml");
        std::fs::write(&path, "[source]\nurl = \"http://localhost/form\"\ntimeout_secs = 3").unwrap();

        let config = SurveyorConfig::from_file(&path).unwrap();
        let http = config.http_source();
        assert_eq!(http.url, "http://localhost/form");
        assert_eq!(http.timeout, Duration::from_secs(3));

        assert!(matches!(
            SurveyorConfig::from_file(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
