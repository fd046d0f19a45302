//! API 客户端工厂

use std::sync::Arc;

use cf_manager_provider::{create_client, ClientConfig, CloudflareApi};

use crate::error::CoreResult;

/// Builds an upstream client from a decrypted token.
///
/// Called once per logical operation; implementations must not cache
/// clients or tokens.
pub trait ClientFactory: Send + Sync {
    fn create(&self, api_token: &str) -> CoreResult<Arc<dyn CloudflareApi>>;
}

/// 默认实现：基于 reqwest 的 HTTP 客户端
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory {
    config: ClientConfig,
}

impl HttpClientFactory {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl ClientFactory for HttpClientFactory {
    fn create(&self, api_token: &str) -> CoreResult<Arc<dyn CloudflareApi>> {
        Ok(create_client(api_token, &self.config)?)
    }
}
