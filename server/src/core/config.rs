use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STORE_TIMEOUT_SECS};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Remote store configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoreFileConfig {
    /// Base URL of the store API (or use PUFFBOARD_STORE_URL env var)
    pub url: Option<String>,
    /// API key (or use PUFFBOARD_STORE_API_KEY env var)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub store: Option<StoreFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Store
        if let Some(store) = other.store {
            let current = self.store.get_or_insert_with(StoreFileConfig::default);
            if store.url.is_some() {
                tracing::trace!(url = ?store.url, "Merging store.url");
                current.url = store.url;
            }
            if store.api_key.is_some() {
                tracing::trace!(api_key = "***", "Merging store.api_key");
                current.api_key = store.api_key;
            }
            if store.timeout_secs.is_some() {
                tracing::trace!(timeout_secs = ?store.timeout_secs, "Merging store.timeout_secs");
                current.timeout_secs = store.timeout_secs;
            }
        }

        // Debug
        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store API, without trailing slash
    pub url: String,
    /// Bearer token for the store API
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub debug: bool,
}

/// Whether a host string binds all interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();

        let overlay_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            tracing::debug!(config = %path.display(), "Config file loaded");
        }

        let file_server = file_config.server.unwrap_or_default();
        let file_store = file_config.store.unwrap_or_default();

        // Layer configs: defaults -> file config -> CLI/env overrides
        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let store_url = cli
            .store_url
            .clone()
            .or(file_store.url)
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        let store_api_key = cli
            .store_api_key
            .clone()
            .or(file_store.api_key)
            .unwrap_or_default();

        let store_timeout_secs = cli
            .store_timeout_secs
            .or(file_store.timeout_secs)
            .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS);

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let config = Self {
            server: ServerConfig { host, port },
            store: StoreConfig {
                url: store_url,
                api_key: store_api_key,
                timeout_secs: store_timeout_secs,
            },
            debug,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            store_url = %config.store.url,
            store_timeout_secs = config.store.timeout_secs,
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would cause a bind failure
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.store.url.is_empty() {
            anyhow::bail!(
                "Configuration error: store.url is required (set PUFFBOARD_STORE_URL or store.url in {})",
                CONFIG_FILE_NAME
            );
        }
        if !self.store.url.starts_with("http://") && !self.store.url.starts_with("https://") {
            anyhow::bail!(
                "Configuration error: store.url must start with http:// or https://, got: {}",
                self.store.url
            );
        }

        if self.store.api_key.is_empty() {
            tracing::warn!("store.api_key is empty; store requests will be unauthenticated");
        }

        if self.store.timeout_secs == 0 {
            anyhow::bail!("Configuration error: store.timeout_secs must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_store() -> CliConfig {
        CliConfig {
            host: None,
            port: None,
            config: None,
            debug: false,
            store_url: Some("https://gcp-us-east1.example-store.com/".to_string()),
            store_api_key: Some("tpk_test".to_string()),
            store_timeout_secs: None,
        }
    }

    #[test]
    fn defaults_apply_when_no_file_config() {
        let config = AppConfig::load(&cli_with_store()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.store.timeout_secs, DEFAULT_STORE_TIMEOUT_SECS);
        assert!(!config.debug);
    }

    #[test]
    fn store_url_trailing_slash_is_trimmed() {
        let config = AppConfig::load(&cli_with_store()).unwrap();
        assert_eq!(config.store.url, "https://gcp-us-east1.example-store.com");
    }

    #[test]
    fn missing_store_url_is_rejected() {
        let mut cli = cli_with_store();
        cli.store_url = None;
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn non_http_store_url_is_rejected() {
        let mut cli = cli_with_store();
        cli.store_url = Some("ftp://example.com".to_string());
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn file_config_merge_prefers_overlay() {
        let mut base = FileConfig::default();
        let overlay: FileConfig = serde_json::from_str(
            r#"{"server": {"port": 9000}, "store": {"url": "https://a.example.com"}}"#,
        )
        .unwrap();
        base.merge(overlay);
        assert_eq!(base.server.unwrap().port, Some(9000));
        assert_eq!(
            base.store.unwrap().url.as_deref(),
            Some("https://a.example.com")
        );
    }

    #[test]
    fn all_interfaces_detection() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
