//! Cloudflare v4 REST client

mod accounts;
mod api;
mod d1;
mod dns;
mod error;
mod http;
mod kv;
mod pages;
mod pagination;
mod workers;

use std::fmt;
use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::mask_secret;

pub const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Accounts / Workers scripts / KV namespaces / Zones 单页大小
pub(crate) const PAGE_SIZE_DEFAULT: u32 = 50;
/// DNS Records API 单页大小
pub(crate) const PAGE_SIZE_RECORDS: u32 = 100;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// 默认重试次数（仅幂等请求）
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Transport settings shared by every client built from one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Retries for transient failures of idempotent requests (0 disables).
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: CF_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Client bound to one bearer token.
///
/// Instances are cheap to build and meant to live for a single logical
/// operation; the token is never logged.
pub struct CloudflareClient {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) base_url: String,
    pub(crate) max_retries: u32,
}

impl CloudflareClient {
    pub fn new(api_token: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_http_client(config)?,
            api_token: api_token.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }
}

impl fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("api_token", &mask_secret(&self.api_token))
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// 创建带超时配置的 HTTP Client
fn create_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ProviderError::NetworkError {
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Percent-encodes one path segment (script names, KV keys).
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_public_api() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, CF_API_BASE);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9000/");
        let client = CloudflareClient::new("token", &config).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn debug_output_masks_token() {
        let client =
            CloudflareClient::new("super-secret-token-value", &ClientConfig::default()).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret-token-value"));
        assert!(debug.contains("supe****"));
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(segment("user/42 profile"), "user%2F42%20profile");
        assert_eq!(segment("plain"), "plain");
    }
}
