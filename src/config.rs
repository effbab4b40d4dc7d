//! Client configuration: a TOML file in the app directory plus environment
//! overrides.
//!
//! Resolution order is defaults, then `config.toml`, then `BRDGEN_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// File name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Router base path used for static hosting.
pub const DEFAULT_BASE_PATH: &str = "/BRDGen-Report/";
/// Identity toolkit REST endpoint for password sign-in.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

pub const API_URL_ENV: &str = "BRDGEN_API_URL";
pub const BASE_PATH_ENV: &str = "BRDGEN_BASE_PATH";
pub const DEMO_MODE_ENV: &str = "BRDGEN_DEMO_MODE";
pub const IDENTITY_API_KEY_ENV: &str = "BRDGEN_IDENTITY_API_KEY";

/// Errors that may occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to resolve config directory: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Top-level client settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the analysis backend, without a trailing slash.
    pub api_base: String,
    /// Router base path, always starting and ending with `/`.
    pub base_path: String,
    /// Synthesize a local identity when remote sign-in fails.
    pub demo_mode: bool,
    pub identity: IdentitySettings,
    pub http: HttpSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            demo_mode: false,
            identity: IdentitySettings::default(),
            http: HttpSettings::default(),
        }
    }
}

/// Remote identity provider settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Web API key; without it every remote sign-in fails.
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_IDENTITY_ENDPOINT.to_string(),
        }
    }
}

/// Timeouts for the shared HTTP agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub connect_timeout_secs: u64,
    /// Generous because `/generate` runs the whole backend pipeline.
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 300,
            write_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load settings from the app directory and apply environment overrides.
    ///
    /// The first launch writes the defaults out so there is a file to edit.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        let mut config = Self::load_from(&path)?;
        if !path.exists()
            && let Err(err) = config.save()
        {
            tracing::warn!(error = %err, "Could not write default settings");
        }
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load settings from a specific file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.normalized())
    }

    /// Persist settings to the app directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|source| ConfigError::SerializeToml {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `BRDGEN_*` overrides using the provided lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.api_base = url;
        }
        if let Some(base) = lookup(BASE_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            self.base_path = base;
        }
        if let Some(flag) = lookup(DEMO_MODE_ENV) {
            self.demo_mode = parse_flag(&flag);
        }
        if let Some(key) = lookup(IDENTITY_API_KEY_ENV) {
            self.identity.api_key = Some(key);
        }
        *self = std::mem::take(self).normalized();
    }

    fn normalized(mut self) -> Self {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if self.api_base.is_empty() {
            self.api_base = DEFAULT_API_BASE.to_string();
        }
        self.base_path = normalize_base_path(&self.base_path);
        self.identity.api_key = self
            .identity
            .api_key
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self.identity.endpoint = self.identity.endpoint.trim_end_matches('/').to_string();
        self
    }
}

/// Resolve the configuration file path, creating the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn first_load_writes_default_settings() {
        let home = tempdir().unwrap();
        let _guard = crate::app_dirs::ConfigBaseGuard::set(home.path().to_path_buf());
        AppConfig::load().unwrap();
        let path = config_path().unwrap();
        assert!(path.is_file());
        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn defaults_point_at_localhost_and_subpath() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.base_path, "/BRDGen-Report/");
        assert!(!config.demo_mode);
    }

    #[test]
    fn env_overrides_are_normalized() {
        let mut config = AppConfig::default();
        config.apply_env(lookup(&[
            (API_URL_ENV, "https://api.example.com/"),
            (BASE_PATH_ENV, "/"),
            (DEMO_MODE_ENV, "true"),
            (IDENTITY_API_KEY_ENV, "  key-123 "),
        ]));
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.base_path, "/");
        assert!(config.demo_mode);
        assert_eq!(config.identity.api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn blank_env_values_keep_defaults() {
        let mut config = AppConfig::default();
        config.apply_env(lookup(&[(API_URL_ENV, "  "), (DEMO_MODE_ENV, "0")]));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(!config.demo_mode);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "base_path = \"app\"\n[http]\nread_timeout_secs = 5\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.base_path, "/app/");
        assert_eq!(config.http.read_timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.demo_mode = true;
        config.identity.api_key = Some("abc".into());
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "demo_mode = [").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
