//! Application bootstrap for cf-manager.
//!
//! Provides `AppConfig` (TOML + environment configuration), logging
//! initialisation, credential store adapters, and `AppState` (service
//! container) built through `AppStateBuilder`.

pub mod adapters;
pub mod config;
pub mod logging;

use std::sync::Arc;

use cf_manager_core::bulk::BulkRunner;
use cf_manager_core::crypto::CredentialVault;
use cf_manager_core::error::{CoreError, CoreResult};
use cf_manager_core::services::{
    AccountService, D1Service, DnsService, KvService, PagesService, ServiceContext,
    WorkersService,
};
use cf_manager_core::traits::{ClientFactory, CredentialStore, HttpClientFactory};

use crate::config::AppConfig;

/// Application state.
///
/// Holds the `ServiceContext` and one instance of every service. Frontends
/// construct this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (store, vault, client factory, bulk runner)
    pub ctx: Arc<ServiceContext>,
    pub account_service: AccountService,
    pub workers_service: WorkersService,
    pub kv_service: KvService,
    pub d1_service: D1Service,
    pub dns_service: DnsService,
    pub pages_service: PagesService,
}

/// Builder for constructing `AppState`.
///
/// # Required
/// - `credential_store`: where encrypted credentials live
/// - `encryption_key`: secret the vault key is derived from (no default)
///
/// # Optional
/// - `client_factory`: defaults to `HttpClientFactory` with default settings
/// - `bulk_runner`: defaults to sequential execution
pub struct AppStateBuilder {
    credential_store: Option<Arc<dyn CredentialStore>>,
    client_factory: Option<Arc<dyn ClientFactory>>,
    encryption_key: Option<String>,
    bulk_runner: BulkRunner,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            credential_store: None,
            client_factory: None,
            encryption_key: None,
            bulk_runner: BulkRunner::default(),
        }
    }

    /// Applies everything the configuration carries: vault key, upstream
    /// client settings and bulk concurrency.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        Ok(Self::new()
            .encryption_key(config.encryption_key()?)
            .client_factory(Arc::new(HttpClientFactory::new(config.client_config())))
            .bulk_runner(BulkRunner::new().with_concurrency(config.bulk.concurrency)))
    }

    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    #[must_use]
    pub fn client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn bulk_runner(mut self, runner: BulkRunner) -> Self {
        self.bulk_runner = runner;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if the credential store is missing
    /// and `CoreError::ConfigError` if the encryption key is missing or empty.
    pub fn build(self) -> CoreResult<AppState> {
        let credential_store = self.credential_store.ok_or_else(|| {
            CoreError::ValidationError("credential_store is required".to_string())
        })?;
        let encryption_key = self
            .encryption_key
            .ok_or_else(|| CoreError::ConfigError("encryption key is required".to_string()))?;
        let vault = Arc::new(CredentialVault::new(&encryption_key)?);
        let client_factory = self
            .client_factory
            .unwrap_or_else(|| Arc::new(HttpClientFactory::default()));

        let ctx = Arc::new(
            ServiceContext::new(credential_store, vault, client_factory)
                .with_bulk_runner(self.bulk_runner),
        );
        log::info!(
            "Application state ready (bulk concurrency {})",
            self.bulk_runner.concurrency()
        );

        Ok(AppState {
            account_service: AccountService::new(Arc::clone(&ctx)),
            workers_service: WorkersService::new(Arc::clone(&ctx)),
            kv_service: KvService::new(Arc::clone(&ctx)),
            d1_service: D1Service::new(Arc::clone(&ctx)),
            dns_service: DnsService::new(Arc::clone(&ctx)),
            pages_service: PagesService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
