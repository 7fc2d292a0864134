//! App configuration, read from a RON file.
//!
//! The file named by `RELATED_VIEW_CONFIG` (or `./related_view.ron`) is
//! optional; missing fields fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use related_view_engine::{FetchSettings, CHANGE_EVENT_CHANNEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use view_logging::{view_info, view_warn, LogDestination};

const CONFIG_ENV: &str = "RELATED_VIEW_CONFIG";
const CONFIG_FILENAME: &str = "related_view.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub parent_key: String,
    pub channel: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            parent_key: String::new(),
            channel: CHANGE_EVENT_CHANNEL.to_string(),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("./related_view.log"),
            log_level: "info".to_string(),
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_bytes: fetch.max_bytes,
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
        }
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            view_warn!("No config at {:?}, using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    view_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.channel, "/data/OpportunityChangeEvent");
    }

    #[test]
    fn partial_file_overrides_given_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(base_url: "https://crm.example.com/api", parent_key: "001XY", request_timeout_ms: 500)"#
        )
        .unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.base_url, "https://crm.example.com/api");
        assert_eq!(config.parent_key, "001XY");
        assert_eq!(
            config.fetch_settings().request_timeout,
            Duration::from_millis(500)
        );
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(base_url: 42)").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);
    }
}
