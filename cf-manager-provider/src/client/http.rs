//! Cloudflare HTTP 请求方法

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::{RetryPolicy, send_with_retry};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::ApiEnvelope;
use crate::utils::log_sanitizer::body_for_log;

use super::CloudflareClient;

/// 请求体
pub(crate) enum Body {
    Empty,
    Json(Value),
    /// 原始文本，附带 Content-Type（脚本上传）
    Text {
        content_type: &'static str,
        text: String,
    },
    Multipart(Form),
}

impl Body {
    pub fn json<B: Serialize>(body: &B) -> Result<Self> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| ProviderError::SerializationError {
                detail: e.to_string(),
            })
    }
}

impl CloudflareClient {
    /// 发送请求，返回状态码与原始响应体
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<(u16, Vec<u8>)> {
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_token);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Text { content_type, text } => {
                builder.header(CONTENT_TYPE, content_type).body(text)
            }
            Body::Multipart(form) => builder.multipart(form),
        };

        let response = send_with_retry(
            builder,
            self.provider_name(),
            &method,
            &url,
            RetryPolicy::new(self.max_retries),
        )
        .await?;
        Ok((response.status, response.body))
    }

    /// 发送请求并解析响应信封
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Body,
        ctx: &ErrorContext,
    ) -> Result<ApiEnvelope<T>> {
        let (status, bytes) = self.send(method, path, query, body).await?;
        self.decode_envelope(status, &bytes, ctx)
    }

    /// 执行 GET 请求，返回 result 字段
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        ctx: &ErrorContext,
    ) -> Result<T> {
        let envelope = self.call(Method::GET, path, query, Body::Empty, ctx).await?;
        self.require_result(envelope)
    }

    /// 执行带请求体的写请求，返回 result 字段
    pub(crate) async fn write<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        ctx: &ErrorContext,
    ) -> Result<T> {
        let envelope = self.call(method, path, &[], body, ctx).await?;
        self.require_result(envelope)
    }

    /// 执行写请求，忽略 result 字段
    pub(crate) async fn write_unit(
        &self,
        method: Method,
        path: &str,
        body: Body,
        ctx: &ErrorContext,
    ) -> Result<()> {
        self.call::<Value>(method, path, &[], body, ctx).await?;
        Ok(())
    }

    /// 执行 GET 请求，返回未解码的原始响应体（脚本源码、KV 值）
    pub(crate) async fn get_raw(&self, path: &str, ctx: &ErrorContext) -> Result<Vec<u8>> {
        let (status, bytes) = self.send(Method::GET, path, &[], Body::Empty).await?;
        if (200..300).contains(&status) {
            return Ok(bytes);
        }
        // 失败时响应体通常仍是 JSON 信封
        self.decode_envelope::<Value>(status, &bytes, ctx)?;
        Err(self.status_error(status, &bytes, ctx))
    }

    /// 解析信封；`success == false` 或状态码 >= 400 时映射为错误
    pub(crate) fn decode_envelope<T: DeserializeOwned>(
        &self,
        status: u16,
        body: &[u8],
        ctx: &ErrorContext,
    ) -> Result<ApiEnvelope<T>> {
        let raw: ApiEnvelope<Value> = match serde_json::from_slice(body) {
            Ok(env) => env,
            Err(_) if status >= 400 => return Err(self.status_error(status, body, ctx)),
            Err(e) => {
                log::error!("[{}] JSON parse failed: {e}", self.provider_name());
                log::error!(
                    "[{}] Raw response: {}",
                    self.provider_name(),
                    body_for_log(body)
                );
                return Err(self.parse_error(e));
            }
        };

        if !raw.success || status >= 400 {
            let err = if raw.errors.is_empty() {
                self.status_error(status, body, ctx)
            } else {
                self.map_error(RawApiError::new(status, raw.errors), ctx)
            };
            if err.is_expected() {
                log::warn!("[{}] API error: {err}", self.provider_name());
            } else {
                log::error!("[{}] API error: {err}", self.provider_name());
            }
            return Err(err);
        }

        let result = match raw.result {
            Some(value) => Some(serde_json::from_value(value).map_err(|e| {
                log::error!("[{}] Unexpected result shape: {e}", self.provider_name());
                self.parse_error(e)
            })?),
            None => None,
        };

        Ok(ApiEnvelope {
            success: true,
            result,
            result_info: raw.result_info,
            errors: raw.errors,
            messages: raw.messages,
        })
    }

    fn require_result<T>(&self, envelope: ApiEnvelope<T>) -> Result<T> {
        envelope
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }
}
