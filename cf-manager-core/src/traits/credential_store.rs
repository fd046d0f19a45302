//! 凭证存储抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Credential;

/// 凭证存储 Trait
///
/// Persistence is owned by the embedding application; the core only needs
/// lookups scoped to the owning user plus the provider-account backfill.
/// `cf-manager-app` ships in-memory and JSON-file implementations.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 按所有者查找单个凭证
    ///
    /// # Returns
    /// * `Ok(Some(credential))` - 凭证存在且属于该用户
    /// * `Ok(None)` - 凭证不存在或属于其他用户
    async fn find(&self, user_id: &str, credential_id: &str) -> CoreResult<Option<Credential>>;

    /// 列出用户的全部凭证
    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Credential>>;

    /// 保存凭证（新建）
    async fn save(&self, credential: &Credential) -> CoreResult<()>;

    /// 删除凭证
    async fn delete(&self, credential_id: &str) -> CoreResult<()>;

    /// 回填上游账户 ID
    ///
    /// Only applies while the stored value is `None`; an already-set id is
    /// left untouched.
    async fn set_provider_account_id(
        &self,
        credential_id: &str,
        provider_account_id: &str,
    ) -> CoreResult<()>;
}
