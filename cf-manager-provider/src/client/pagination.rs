//! 分页聚合
//!
//! Two continuation protocols exist upstream: numeric `page`/`per_page` with
//! `total_pages` in `result_info`, and an opaque `cursor` (KV keys). Both
//! loops stop on the first empty page or missing continuation signal, and any
//! failing page aborts the whole listing.

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::traits::ErrorContext;
use crate::types::{AggregatedResult, ResultInfo};

use super::CloudflareClient;
use super::http::Body;

/// 数字分页：当 `page < total_pages` 时返回下一页页码
pub(crate) fn next_page(current: u32, info: Option<&ResultInfo>) -> Option<u32> {
    let total_pages = info?.total_pages?;
    (current < total_pages).then(|| current + 1)
}

/// 游标分页：返回非空游标
pub(crate) fn next_cursor(info: Option<&ResultInfo>) -> Option<String> {
    info?.cursor.clone().filter(|c| !c.is_empty())
}

impl CloudflareClient {
    /// 按页码依次拉取直至结束
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        per_page: u32,
        ctx: &ErrorContext,
    ) -> Result<AggregatedResult<T>> {
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
            let envelope = self
                .call::<Vec<T>>(Method::GET, path, &query, Body::Empty, ctx)
                .await?;

            let batch = envelope.result.unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            items.extend(batch);

            match next_page(page, envelope.result_info.as_ref()) {
                Some(next) => page = next,
                None => break,
            }
        }

        log::debug!("[cloudflare] {path}: aggregated {} items", items.len());
        Ok(AggregatedResult::complete(items))
    }

    /// 按游标依次拉取直至结束
    pub(crate) async fn get_all_cursor<T: DeserializeOwned>(
        &self,
        path: &str,
        base_query: &[(&str, String)],
        ctx: &ErrorContext,
    ) -> Result<AggregatedResult<T>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = base_query.to_vec();
            if let Some(c) = &cursor {
                query.push(("cursor", c.clone()));
            }
            let envelope = self
                .call::<Vec<T>>(Method::GET, path, &query, Body::Empty, ctx)
                .await?;

            let batch = envelope.result.unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            items.extend(batch);

            cursor = next_cursor(envelope.result_info.as_ref());
            if cursor.is_none() {
                break;
            }
        }

        log::debug!("[cloudflare] {path}: aggregated {} items", items.len());
        Ok(AggregatedResult::complete(items))
    }
}
