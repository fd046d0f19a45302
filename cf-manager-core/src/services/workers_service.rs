//! Workers 脚本管理服务

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::{require_non_empty, ServiceContext};
use crate::types::{AggregatedResult, ScriptBinding, ScriptSettings, WorkerScript};

/// Workers 脚本管理服务
pub struct WorkersService {
    ctx: Arc<ServiceContext>,
}

impl WorkersService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list_scripts(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> CoreResult<AggregatedResult<WorkerScript>> {
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .list_scripts(&account.provider_account_id)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    /// 获取脚本源码
    pub async fn get_script(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
    ) -> CoreResult<String> {
        require_non_empty("script name", script_name)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .get_script_content(&account.provider_account_id, script_name)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn create_script(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
        content: &str,
    ) -> CoreResult<WorkerScript> {
        self.upload(user_id, credential_id, script_name, content).await
    }

    /// 上游的创建与更新是同一个 PUT
    pub async fn update_script(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
        content: &str,
    ) -> CoreResult<WorkerScript> {
        self.upload(user_id, credential_id, script_name, content).await
    }

    pub async fn delete_script(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
    ) -> CoreResult<()> {
        require_non_empty("script name", script_name)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .delete_script(&account.provider_account_id, script_name)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn get_settings(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
    ) -> CoreResult<ScriptSettings> {
        require_non_empty("script name", script_name)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .get_script_settings(&account.provider_account_id, script_name)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    /// Replaces the script's bindings.
    ///
    /// The upstream has no partial settings update, so the client re-uploads
    /// the current script together with the new binding list.
    pub async fn update_bindings(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
        bindings: &[ScriptBinding],
    ) -> CoreResult<WorkerScript> {
        require_non_empty("script name", script_name)?;
        for binding in bindings {
            validate_binding(binding)?;
        }

        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .update_script_bindings(&account.provider_account_id, script_name, bindings)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    async fn upload(
        &self,
        user_id: &str,
        credential_id: &str,
        script_name: &str,
        content: &str,
    ) -> CoreResult<WorkerScript> {
        require_non_empty("script name", script_name)?;
        require_non_empty("script content", content)?;

        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .upload_script(&account.provider_account_id, script_name, content)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }
}

fn validate_binding(binding: &ScriptBinding) -> CoreResult<()> {
    require_non_empty("binding name", binding.name())?;
    match binding {
        ScriptBinding::PlainText { .. } => Ok(()),
        ScriptBinding::KvNamespace { namespace_id, .. } => {
            require_non_empty("binding namespace_id", namespace_id)
        }
        ScriptBinding::D1Database { database_id, .. } => {
            require_non_empty("binding database_id", database_id)
        }
    }
}
