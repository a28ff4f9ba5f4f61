//! Store connection settings.
//!
//! Read from the `[store]` table of the service's TOML config. The
//! `SUPABASE_URL` and `SUPABASE_KEY` environment variables take precedence
//! over the file so credentials can stay out of it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_URL: &str = "SUPABASE_URL";
pub const ENV_KEY: &str = "SUPABASE_KEY";

const DEFAULT_TABLE: &str = "songs";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing store setting '{setting}' (set it in the config file or via {env})")]
    MissingCredentials {
        setting: &'static str,
        env: &'static str,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Connection settings for the hosted `songs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,

    /// API key sent as `apikey` and bearer token.
    #[serde(default)]
    pub key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Parse a standalone store table from TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Override settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override settings from a variable lookup; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            self.url = url;
        }
        if let Some(key) = lookup(ENV_KEY).filter(|v| !v.trim().is_empty()) {
            self.key = key;
        }
    }

    /// Check that credentials are present and the URL looks usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingCredentials {
                setting: "url",
                env: ENV_URL,
            });
        }
        if self.key.trim().is_empty() {
            return Err(ConfigError::MissingCredentials {
                setting: "key",
                env: ENV_KEY,
            });
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "store url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::Invalid("store table name is empty".into()));
        }
        Ok(())
    }

    /// `{url}/rest/v1/{table}`
    pub fn table_endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_fill_missing_settings() {
        let config = StoreConfig::from_toml(r#"url = "https://abc.supabase.co""#).unwrap();
        assert_eq!(config.table, "songs");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.key.is_empty());
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = StoreConfig::from_toml(
            r#"
url = "https://file.supabase.co"
key = "file-key"
"#,
        )
        .unwrap();
        config.apply_overrides(lookup(&[(ENV_KEY, "env-key"), (ENV_URL, "  ")]));
        assert_eq!(config.key, "env-key");
        assert_eq!(config.url, "https://file.supabase.co");
    }

    #[test]
    fn missing_key_fails_validation() {
        let mut config = StoreConfig::default();
        config.apply_overrides(lookup(&[(ENV_URL, "https://abc.supabase.co")]));
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredentials { setting: "key", .. }
        ));
    }

    #[test]
    fn url_scheme_is_checked() {
        let config = StoreConfig {
            url: "abc.supabase.co".into(),
            key: "k".into(),
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn table_endpoint_strips_trailing_slash() {
        let config = StoreConfig {
            url: "https://abc.supabase.co/".into(),
            key: "k".into(),
            ..StoreConfig::default()
        };
        assert_eq!(
            config.table_endpoint(),
            "https://abc.supabase.co/rest/v1/songs"
        );
    }

    #[test]
    fn from_file_reports_missing_path() {
        let err = StoreConfig::from_file(Path::new("/nonexistent/songrank.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "url = \"https://abc.supabase.co\"\nkey = \"k\"\ntimeout_secs = 5\n")
            .unwrap();
        let config = StoreConfig::from_file(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert!(config.validate().is_ok());
    }
}
