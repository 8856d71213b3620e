use super::Result;
use crate::api::query::TableName;
use crate::core::guard::OverlapPolicy;
use crate::core::view::{ViewConfig, ViewVariant};
use crate::error::{ConfigError, StorageError};
use crate::utils::validation::validate_url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const URL_ENV: &str = "LEADGRID_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub table: String,
    pub page_size: usize,
    pub row_height: f64,
    pub overscan: usize,
    pub viewport_height: f64,
    pub overlap_policy: OverlapPolicy,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        let view = ViewConfig::default();
        Self {
            api_url: None,
            table: TableName::Listings.as_str().to_string(),
            page_size: view.page_size,
            row_height: view.row_height,
            overscan: view.overscan,
            viewport_height: view.viewport_height,
            overlap_policy: view.overlap_policy,
            timeout_seconds: crate::api::client::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 8] = [
        "api_url",
        "table",
        "page_size",
        "row_height",
        "overscan",
        "viewport_height",
        "overlap_policy",
        "timeout_seconds",
    ];

    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(config_dir.join("leadgrid").join("config.toml"))
    }

    /// Current value of a key as it would be written by `config set`.
    pub fn get_value(&self, key: &str) -> std::result::Result<String, ConfigError> {
        Ok(match key {
            "api_url" => self.api_url.clone().unwrap_or_default(),
            "table" => self.table.clone(),
            "page_size" => self.page_size.to_string(),
            "row_height" => self.row_height.to_string(),
            "overscan" => self.overscan.to_string(),
            "viewport_height" => self.viewport_height.to_string(),
            "overlap_policy" => self.overlap_policy.to_string(),
            "timeout_seconds" => self.timeout_seconds.to_string(),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        })
    }

    /// Parse and store one key. The config is unchanged on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "api_url" => {
                validate_url(value).map_err(|e| invalid(&e.to_string()))?;
                self.api_url = Some(value.trim_end_matches('/').to_string());
            }
            "table" => {
                let table: TableName = value.parse().map_err(|e: crate::error::ValidationError| {
                    invalid(&e.to_string())
                })?;
                self.table = table.as_str().to_string();
            }
            "page_size" => {
                self.page_size = match value.parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => return Err(invalid("expected a positive integer")),
                }
            }
            "row_height" => {
                self.row_height = match value.parse::<f64>() {
                    Ok(h) if h.is_finite() && h > 0.0 => h,
                    _ => return Err(invalid("expected a positive number")),
                }
            }
            "overscan" => {
                self.overscan = value
                    .parse()
                    .map_err(|_| invalid("expected a non-negative integer"))?
            }
            "viewport_height" => {
                self.viewport_height = match value.parse::<f64>() {
                    Ok(h) if h.is_finite() && h >= 0.0 => h,
                    _ => return Err(invalid("expected a non-negative number")),
                }
            }
            "overlap_policy" => {
                self.overlap_policy = match value {
                    "drop" => OverlapPolicy::Drop,
                    "latest_wins" => OverlapPolicy::LatestWins,
                    _ => return Err(invalid("expected 'drop' or 'latest_wins'")),
                }
            }
            "timeout_seconds" => {
                self.timeout_seconds = match value.parse::<u64>() {
                    Ok(n) if n > 0 => n,
                    _ => return Err(invalid("expected a positive integer")),
                }
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Base URL from the command line or environment, then the config file.
    pub fn resolve_api_url(&self, override_url: Option<String>) -> std::result::Result<String, ConfigError> {
        override_url
            .or_else(|| self.api_url.clone())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "api_url".to_string(),
                hint: format!(
                    "Pass --url, set {} or run `leadgrid config set api_url <URL>`",
                    URL_ENV
                ),
            })
    }

    pub fn view_config(&self, variant: ViewVariant) -> ViewConfig {
        ViewConfig {
            page_size: self.page_size,
            row_height: self.row_height,
            overscan: self.overscan,
            viewport_height: self.viewport_height,
            overlap_policy: self.overlap_policy,
            variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, None);
        assert_eq!(config.table, "listings");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.row_height, 72.0);
        assert_eq!(config.overscan, 5);
        assert_eq!(config.overlap_policy, OverlapPolicy::LatestWins);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config
            .set_value("api_url", "https://crm.example.com/")
            .expect("api_url");
        config.set_value("page_size", "50").expect("page_size");
        config
            .set_value("overlap_policy", "drop")
            .expect("overlap_policy");

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");
        let loaded = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(loaded, config);
        assert_eq!(loaded.api_url.as_deref(), Some("https://crm.example.com"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "page_size = 10\n").expect("write");

        let loaded = Config::load(Some(config_path)).expect("load");
        assert_eq!(loaded.page_size, 10);
        assert_eq!(loaded.row_height, 72.0);
        assert_eq!(loaded.table, "listings");
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "page_size = [").expect("write");

        assert!(matches!(
            Config::load(Some(config_path)),
            Err(StorageError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("page_size", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.set_value("table", "users").is_err());
        assert!(config.set_value("row_height", "-2").is_err());
        assert!(config.set_value("overlap_policy", "queue").is_err());
        assert!(matches!(
            config.set_value("colour", "blue"),
            Err(ConfigError::UnknownKey { .. })
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_get_value_round_trips_every_key() {
        let mut config = Config::default();
        config.api_url = Some("https://crm.example.com".to_string());
        for key in Config::KEYS {
            let value = config.get_value(key).expect("known key");
            let mut copy = config.clone();
            copy.set_value(key, &value).expect("value accepted");
            assert_eq!(copy, config, "key {}", key);
        }
    }

    #[test]
    fn test_resolve_api_url() {
        let mut config = Config::default();
        assert!(matches!(
            config.resolve_api_url(None),
            Err(ConfigError::MissingField { .. })
        ));

        config.api_url = Some("https://from-file.example.com".to_string());
        assert_eq!(
            config.resolve_api_url(None).expect("url"),
            "https://from-file.example.com"
        );
        assert_eq!(
            config
                .resolve_api_url(Some("https://flag.example.com".to_string()))
                .expect("url"),
            "https://flag.example.com"
        );
    }
}
