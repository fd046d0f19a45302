//! 凭证（逻辑账户）管理服务

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ProviderError};
use crate::services::{require_non_empty, ServiceContext};
use crate::types::{Account, AggregatedResult, Credential, CredentialSummary, RegisterCredentialRequest};

/// 凭证管理服务
pub struct AccountService {
    ctx: Arc<ServiceContext>,
}

impl AccountService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Registers a new credential for `user_id`.
    ///
    /// The token is validated first by listing the accounts it can see; at
    /// least one must be returned and the first becomes the credential's
    /// provider account. Nothing is stored when validation fails.
    pub async fn register_credential(
        &self,
        user_id: &str,
        request: RegisterCredentialRequest,
    ) -> CoreResult<CredentialSummary> {
        require_non_empty("account name", &request.account_name)?;
        require_non_empty("api token", &request.api_token)?;
        let token = request.api_token.trim();

        let client = self.ctx.client_factory.create(token)?;
        let accounts = client.list_accounts().await.map_err(|e| match e {
            ProviderError::InvalidCredentials { .. } | ProviderError::PermissionDenied { .. } => {
                CoreError::InvalidCredentials(e.to_string())
            }
            other => CoreError::Provider(other),
        })?;
        let first = accounts.items.into_iter().next().ok_or_else(|| {
            CoreError::InvalidCredentials("token has no access to any account".to_string())
        })?;

        let credential = Credential {
            id: Uuid::new_v4().to_string(),
            owner_user_id: user_id.to_string(),
            account_name: request.account_name.trim().to_string(),
            encrypted_secret: self.ctx.vault.encrypt(token)?,
            provider_account_id: Some(first.id),
            created_at: Utc::now(),
        };
        self.ctx.credential_store.save(&credential).await?;

        log::info!(
            "Registered credential {} for user {user_id}",
            credential.id
        );
        Ok(CredentialSummary::from(&credential))
    }

    /// 列出用户凭证（不含密文）
    pub async fn list_credentials(&self, user_id: &str) -> CoreResult<Vec<CredentialSummary>> {
        let credentials = self.ctx.credential_store.list_by_user(user_id).await?;
        Ok(credentials.iter().map(CredentialSummary::from).collect())
    }

    /// 删除凭证
    pub async fn delete_credential(&self, user_id: &str, credential_id: &str) -> CoreResult<()> {
        if self
            .ctx
            .credential_store
            .find(user_id, credential_id)
            .await?
            .is_none()
        {
            return Err(CoreError::CredentialNotFound(credential_id.to_string()));
        }
        self.ctx.credential_store.delete(credential_id).await?;
        log::info!("Deleted credential {credential_id} of user {user_id}");
        Ok(())
    }

    /// 列出凭证可见的上游账户
    pub async fn list_provider_accounts(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> CoreResult<AggregatedResult<Account>> {
        let client = self.ctx.client(user_id, credential_id).await?;
        client
            .list_accounts()
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }
}
