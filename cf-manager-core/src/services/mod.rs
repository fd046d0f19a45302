//! 业务逻辑服务层

mod account_service;
mod d1_service;
mod dns_service;
mod kv_service;
mod pages_service;
mod workers_service;

pub use account_service::AccountService;
pub use d1_service::D1Service;
pub use dns_service::DnsService;
pub use kv_service::KvService;
pub use pages_service::PagesService;
pub use workers_service::WorkersService;

use std::sync::Arc;

use cf_manager_provider::{CloudflareApi, ProviderError};

use crate::bulk::BulkRunner;
use crate::crypto::CredentialVault;
use crate::error::{CoreError, CoreResult};
use crate::traits::{ClientFactory, CredentialStore};
use crate::types::Credential;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现与进程级加密密钥。
pub struct ServiceContext {
    /// 凭证存储
    pub credential_store: Arc<dyn CredentialStore>,
    /// 凭证加解密
    pub vault: Arc<CredentialVault>,
    /// 上游客户端工厂
    pub client_factory: Arc<dyn ClientFactory>,
    /// 批量操作执行器
    pub bulk_runner: BulkRunner,
}

/// A credential resolved for one logical operation.
///
/// Holds the client only; the decrypted token is dropped as soon as the
/// client is built.
pub struct ResolvedAccount {
    pub client: Arc<dyn CloudflareApi>,
    /// Upstream account id used in account-scoped paths
    pub provider_account_id: String,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        vault: Arc<CredentialVault>,
        client_factory: Arc<dyn ClientFactory>,
    ) -> Self {
        Self {
            credential_store,
            vault,
            client_factory,
            bulk_runner: BulkRunner::default(),
        }
    }

    #[must_use]
    pub fn with_bulk_runner(mut self, bulk_runner: BulkRunner) -> Self {
        self.bulk_runner = bulk_runner;
        self
    }

    /// 解密凭证并创建客户端（不需要上游账户 ID 的操作，如 zones）
    pub async fn client(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> CoreResult<Arc<dyn CloudflareApi>> {
        let credential = self.find_credential(user_id, credential_id).await?;
        self.build_client(&credential)
    }

    /// Resolves `(user, credential)` to a client plus the upstream account id.
    ///
    /// A credential stored without an account id gets it backfilled from the
    /// first account the token can see.
    pub async fn resolve(&self, user_id: &str, credential_id: &str) -> CoreResult<ResolvedAccount> {
        let credential = self.find_credential(user_id, credential_id).await?;
        let client = self.build_client(&credential)?;

        let provider_account_id = if let Some(id) = credential.provider_account_id {
            id
        } else {
            let accounts = client
                .list_accounts()
                .await
                .map_err(|e| self.handle_provider_error(credential_id, e))?;
            let first = accounts.items.into_iter().next().ok_or_else(|| {
                CoreError::InvalidCredentials(format!(
                    "credential {credential_id} has no access to any account"
                ))
            })?;
            self.credential_store
                .set_provider_account_id(credential_id, &first.id)
                .await?;
            log::info!("Backfilled provider account for credential {credential_id}");
            first.id
        };

        Ok(ResolvedAccount {
            client,
            provider_account_id,
        })
    }

    async fn find_credential(&self, user_id: &str, credential_id: &str) -> CoreResult<Credential> {
        self.credential_store
            .find(user_id, credential_id)
            .await?
            .ok_or_else(|| CoreError::CredentialNotFound(credential_id.to_string()))
    }

    /// 明文 token 只在此函数内存在
    fn build_client(&self, credential: &Credential) -> CoreResult<Arc<dyn CloudflareApi>> {
        let token = self.vault.decrypt(&credential.encrypted_secret)?;
        if token.is_empty() {
            return Err(CoreError::DecryptionError(format!(
                "credential {} has no stored secret",
                credential.id
            )));
        }
        self.client_factory.create(&token)
    }

    /// 处理上游错误，凭证失效时记录警告
    pub fn handle_provider_error(&self, credential_id: &str, err: ProviderError) -> CoreError {
        if let ProviderError::InvalidCredentials { .. } = &err {
            log::warn!("Credential {credential_id} was rejected by the upstream");
        }
        CoreError::Provider(err)
    }
}

/// 非空校验
pub(crate) fn require_non_empty(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{field} must not be empty")));
    }
    Ok(())
}
