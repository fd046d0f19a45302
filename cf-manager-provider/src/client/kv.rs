//! Workers KV endpoints

use reqwest::Method;
use reqwest::multipart::Form;
use serde_json::{Value, json};

use crate::error::{ProviderError, Result};
use crate::traits::ErrorContext;
use crate::types::{AggregatedResult, KvKey, KvNamespace};

use super::http::Body;
use super::{CloudflareClient, PAGE_SIZE_DEFAULT, segment};

fn namespaces_path(account_id: &str) -> String {
    format!("/accounts/{account_id}/storage/kv/namespaces")
}

fn value_path(account_id: &str, namespace_id: &str, key: &str) -> String {
    format!(
        "{}/{namespace_id}/values/{}",
        namespaces_path(account_id),
        segment(key)
    )
}

fn key_ctx(key: &str) -> ErrorContext {
    ErrorContext::resource(format!("kv key '{key}'"))
}

fn namespace_ctx(namespace_id: &str) -> ErrorContext {
    ErrorContext::resource(format!("kv namespace '{namespace_id}'"))
}

impl CloudflareClient {
    pub async fn list_kv_namespaces(
        &self,
        account_id: &str,
    ) -> Result<AggregatedResult<KvNamespace>> {
        self.get_all_pages(
            &namespaces_path(account_id),
            PAGE_SIZE_DEFAULT,
            &ErrorContext::resource(format!("kv namespaces of account '{account_id}'")),
        )
        .await
    }

    pub async fn create_kv_namespace(&self, account_id: &str, title: &str) -> Result<KvNamespace> {
        self.write(
            Method::POST,
            &namespaces_path(account_id),
            Body::Json(json!({ "title": title })),
            &ErrorContext::resource(format!("kv namespace '{title}'")),
        )
        .await
    }

    pub async fn delete_kv_namespace(&self, account_id: &str, namespace_id: &str) -> Result<()> {
        self.write_unit(
            Method::DELETE,
            &format!("{}/{namespace_id}", namespaces_path(account_id)),
            Body::Empty,
            &namespace_ctx(namespace_id),
        )
        .await
    }

    /// 列出全部键（游标分页），可按前缀过滤
    pub async fn list_kv_keys(
        &self,
        account_id: &str,
        namespace_id: &str,
        prefix: Option<&str>,
    ) -> Result<AggregatedResult<KvKey>> {
        let mut query = Vec::new();
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            query.push(("prefix", prefix.to_string()));
        }
        self.get_all_cursor(
            &format!("{}/{namespace_id}/keys", namespaces_path(account_id)),
            &query,
            &namespace_ctx(namespace_id),
        )
        .await
    }

    /// 读取原始值，不做任何格式解析
    pub async fn get_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<Vec<u8>> {
        self.get_raw(&value_path(account_id, namespace_id, key), &key_ctx(key))
            .await
    }

    /// 写入值（multipart：`value` 与可选的 `metadata`）
    pub async fn put_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
        value: &str,
        metadata: Option<&Value>,
    ) -> Result<()> {
        let mut form = Form::new().text("value", value.to_string());
        if let Some(metadata) = metadata {
            let encoded =
                serde_json::to_string(metadata).map_err(|e| ProviderError::SerializationError {
                    detail: e.to_string(),
                })?;
            form = form.text("metadata", encoded);
        }

        self.write_unit(
            Method::PUT,
            &value_path(account_id, namespace_id, key),
            Body::Multipart(form),
            &key_ctx(key),
        )
        .await
    }

    pub async fn delete_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<()> {
        self.write_unit(
            Method::DELETE,
            &value_path(account_id, namespace_id, key),
            Body::Empty,
            &key_ctx(key),
        )
        .await
    }
}
