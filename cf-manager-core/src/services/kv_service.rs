//! Workers KV 管理服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{require_non_empty, ServiceContext};
use crate::types::{
    AggregatedResult, BulkOutcome, KvEntry, KvKey, KvNamespace, KvValue, PutValueRequest,
};

/// Workers KV 管理服务
pub struct KvService {
    ctx: Arc<ServiceContext>,
}

impl KvService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list_namespaces(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> CoreResult<AggregatedResult<KvNamespace>> {
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .list_kv_namespaces(&account.provider_account_id)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn create_namespace(
        &self,
        user_id: &str,
        credential_id: &str,
        title: &str,
    ) -> CoreResult<KvNamespace> {
        require_non_empty("namespace title", title)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .create_kv_namespace(&account.provider_account_id, title.trim())
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn delete_namespace(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
    ) -> CoreResult<()> {
        require_non_empty("namespace id", namespace_id)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .delete_kv_namespace(&account.provider_account_id, namespace_id)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn list_keys(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
        prefix: Option<&str>,
    ) -> CoreResult<AggregatedResult<KvKey>> {
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .list_kv_keys(&account.provider_account_id, namespace_id, prefix)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    /// 读取值；JSON 文本会被解析
    pub async fn get_value(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> CoreResult<KvValue> {
        require_non_empty("key", key)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        let bytes = account
            .client
            .get_kv_value(&account.provider_account_id, namespace_id, key)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))?;
        Ok(KvValue::from_bytes(bytes))
    }

    pub async fn put_value(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
        key: &str,
        request: &PutValueRequest,
    ) -> CoreResult<()> {
        require_non_empty("key", key)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .put_kv_value(
                &account.provider_account_id,
                namespace_id,
                key,
                &request.value,
                request.metadata.as_ref(),
            )
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn delete_key(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> CoreResult<()> {
        require_non_empty("key", key)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .delete_kv_value(&account.provider_account_id, namespace_id, key)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    /// 批量删除键，单个失败不影响其余
    pub async fn bulk_delete(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
        keys: Vec<String>,
    ) -> CoreResult<BulkOutcome> {
        if keys.is_empty() {
            return Err(CoreError::ValidationError(
                "keys to delete must not be empty".to_string(),
            ));
        }

        let account = self.ctx.resolve(user_id, credential_id).await?;
        let client = &account.client;
        let provider_account_id = account.provider_account_id.as_str();

        Ok(self
            .ctx
            .bulk_runner
            .run(keys, |key: &String| key.clone(), |key| async move {
                client
                    .delete_kv_value(provider_account_id, namespace_id, &key)
                    .await
            })
            .await)
    }

    /// 批量写入键值对
    pub async fn bulk_import(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
        entries: Vec<KvEntry>,
    ) -> CoreResult<BulkOutcome> {
        if entries.is_empty() {
            return Err(CoreError::ValidationError(
                "entries to import must not be empty".to_string(),
            ));
        }

        let account = self.ctx.resolve(user_id, credential_id).await?;
        let client = &account.client;
        let provider_account_id = account.provider_account_id.as_str();

        Ok(self
            .ctx
            .bulk_runner
            .run(
                entries,
                |entry: &KvEntry| entry.key.clone(),
                |entry| async move {
                    if entry.key.trim().is_empty() {
                        return Err(CoreError::ValidationError(
                            "key must not be empty".to_string(),
                        ));
                    }
                    client
                        .put_kv_value(
                            provider_account_id,
                            namespace_id,
                            &entry.key,
                            &entry.value,
                            entry.metadata.as_ref(),
                        )
                        .await
                        .map_err(CoreError::from)
                },
            )
            .await)
    }

    /// Reads every key of a namespace with its value.
    ///
    /// Listing failures abort the export; a key whose value cannot be read
    /// (or is not UTF-8 text) is logged and left out.
    pub async fn export_namespace(
        &self,
        user_id: &str,
        credential_id: &str,
        namespace_id: &str,
    ) -> CoreResult<Vec<KvEntry>> {
        let account = self.ctx.resolve(user_id, credential_id).await?;
        let keys = account
            .client
            .list_kv_keys(&account.provider_account_id, namespace_id, None)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys.items {
            let bytes = match account
                .client
                .get_kv_value(&account.provider_account_id, namespace_id, &key.name)
                .await
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Export of {namespace_id}: skipping key '{}': {e}", key.name);
                    continue;
                }
            };
            let Ok(value) = String::from_utf8(bytes) else {
                log::warn!(
                    "Export of {namespace_id}: skipping key '{}': value is not UTF-8",
                    key.name
                );
                continue;
            };
            entries.push(KvEntry {
                key: key.name,
                value,
                metadata: key.metadata,
            });
        }

        Ok(entries)
    }
}
