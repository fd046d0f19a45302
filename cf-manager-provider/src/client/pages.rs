//! Pages endpoints

use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::traits::ErrorContext;
use crate::types::{PagesDeployment, PagesProject};

use super::http::Body;
use super::{CloudflareClient, segment};

impl CloudflareClient {
    pub async fn list_pages_projects(&self, account_id: &str) -> Result<Vec<PagesProject>> {
        self.get(
            &format!("/accounts/{account_id}/pages/projects"),
            &[],
            &ErrorContext::resource(format!("pages projects of account '{account_id}'")),
        )
        .await
    }

    pub async fn list_pages_deployments(
        &self,
        account_id: &str,
        project_name: &str,
    ) -> Result<Vec<PagesDeployment>> {
        self.get(
            &format!(
                "/accounts/{account_id}/pages/projects/{}/deployments",
                segment(project_name)
            ),
            &[],
            &ErrorContext::resource(format!("pages project '{project_name}'")),
        )
        .await
    }

    /// 触发新部署，请求体原样转发
    pub async fn create_pages_deployment(
        &self,
        account_id: &str,
        project_name: &str,
        body: &Value,
    ) -> Result<PagesDeployment> {
        self.write(
            Method::POST,
            &format!(
                "/accounts/{account_id}/pages/projects/{}/deployments",
                segment(project_name)
            ),
            Body::Json(body.clone()),
            &ErrorContext::resource(format!("pages project '{project_name}'")),
        )
        .await
    }
}
