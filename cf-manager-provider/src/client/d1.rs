//! D1 endpoints

use reqwest::Method;

use crate::error::Result;
use crate::traits::ErrorContext;
use crate::types::{D1Database, Page};

use super::CloudflareClient;
use super::http::Body;

impl CloudflareClient {
    /// 获取 D1 数据库列表（单页，由调用方翻页）
    pub async fn list_d1_databases(
        &self,
        account_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<D1Database>> {
        let path = format!("/accounts/{account_id}/d1/database");
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let envelope = self
            .call::<Vec<D1Database>>(
                Method::GET,
                &path,
                &query,
                Body::Empty,
                &ErrorContext::resource(format!("d1 databases of account '{account_id}'")),
            )
            .await?;

        Ok(Page {
            items: envelope.result.unwrap_or_default(),
            result_info: envelope.result_info,
        })
    }
}
