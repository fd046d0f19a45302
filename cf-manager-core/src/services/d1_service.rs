//! D1 数据库服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{D1Database, Page};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 20;

/// D1 数据库服务（只读列表）
pub struct D1Service {
    ctx: Arc<ServiceContext>,
}

impl D1Service {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Lists one page of databases; the caller drives paging through
    /// the returned `result_info`.
    pub async fn list_databases(
        &self,
        user_id: &str,
        credential_id: &str,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> CoreResult<Page<D1Database>> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
        if page == 0 || per_page == 0 {
            return Err(CoreError::ValidationError(
                "page and per_page must be at least 1".to_string(),
            ));
        }

        let account = self.ctx.resolve(user_id, credential_id).await?;
        account
            .client
            .list_d1_databases(&account.provider_account_id, page, per_page)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }
}
