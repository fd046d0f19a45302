//! Application configuration
//!
//! Loaded from a TOML file, then overridden by environment variables:
//!
//! - `CF_MANAGER_ENCRYPTION_KEY`: secret the credential vault key is derived from
//! - `CF_MANAGER_API_BASE_URL`: upstream API base URL
//! - `CF_MANAGER_LOG_LEVEL`: log filter directive (e.g. `info`, `cf_manager_core=debug`)
//!
//! Every section is optional in the file. The encryption key has no default
//! and must come from one of the two sources.
//!
//! ```toml
//! [upstream]
//! base_url = "https://api.cloudflare.com/client/v4"
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//! max_retries = 2
//!
//! [vault]
//! encryption_key = "..."
//!
//! [bulk]
//! concurrency = 1
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use std::path::Path;
use std::time::Duration;

use cf_manager_core::error::{CoreError, CoreResult};
use cf_manager_provider::{ClientConfig, CF_API_BASE};
use serde::Deserialize;

pub const ENV_ENCRYPTION_KEY: &str = "CF_MANAGER_ENCRYPTION_KEY";
pub const ENV_API_BASE_URL: &str = "CF_MANAGER_API_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "CF_MANAGER_LOG_LEVEL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub vault: VaultConfig,
    pub bulk: BulkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// 仅对幂等请求生效
    pub max_retries: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            base_url: CF_API_BASE.to_string(),
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            max_retries: defaults.max_retries,
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub encryption_key: Option<String>,
}

// 密钥不可出现在日志中
impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "****"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// Items in flight at once; 1 means strictly sequential.
    pub concurrency: usize,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Loads the file at `path` (if any) and applies process environment overrides.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        log::info!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigError(format!("Failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> CoreResult<Self> {
        toml::from_str(contents)
            .map_err(|e| CoreError::ConfigError(format!("Invalid TOML format: {e}")))
    }

    /// 按变量名查找覆盖值；空值视为未设置
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_ENCRYPTION_KEY) {
            self.vault.encryption_key = Some(key);
        }
        if let Some(url) = get(ENV_API_BASE_URL) {
            self.upstream.base_url = url;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    /// The vault secret; there is deliberately no built-in fallback.
    pub fn encryption_key(&self) -> CoreResult<&str> {
        self.vault
            .encryption_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CoreError::ConfigError(format!(
                    "encryption key is not configured (set {ENV_ENCRYPTION_KEY} or [vault].encryption_key)"
                ))
            })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.upstream.base_url.clone(),
            connect_timeout: Duration::from_secs(self.upstream.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.upstream.request_timeout_secs),
            max_retries: self.upstream.max_retries,
        }
    }
}
