//! Pages 项目与部署服务

use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreResult;
use crate::services::{require_non_empty, ServiceContext};
use crate::types::{PagesDeployment, PagesProject};

pub struct PagesService {
    ctx: Arc<ServiceContext>,
}

impl PagesService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list_projects(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> CoreResult<Vec<PagesProject>> {
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .list_pages_projects(&account.provider_account_id)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn list_deployments(
        &self,
        user_id: &str,
        credential_id: &str,
        project_name: &str,
    ) -> CoreResult<Vec<PagesDeployment>> {
        require_non_empty("project name", project_name)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .list_pages_deployments(&account.provider_account_id, project_name)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    /// 请求体原样透传给上游
    pub async fn create_deployment(
        &self,
        user_id: &str,
        credential_id: &str,
        project_name: &str,
        body: &Value,
    ) -> CoreResult<PagesDeployment> {
        require_non_empty("project name", project_name)?;
        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .create_pages_deployment(&account.provider_account_id, project_name, body)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }
}
