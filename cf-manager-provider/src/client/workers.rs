//! Workers script endpoints

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::bindings::{
    SCRIPT_PART_NAME, ScriptBinding, ScriptFormat, UploadMetadata, extract_script_source,
};
use crate::error::{ProviderError, Result};
use crate::traits::{ErrorContext, ProviderErrorMapper};
use crate::types::{AggregatedResult, ScriptSettings, WorkerScript};

use super::http::Body;
use super::{CloudflareClient, PAGE_SIZE_DEFAULT, segment};

fn script_path(account_id: &str, script_name: &str) -> String {
    format!("/accounts/{account_id}/workers/scripts/{}", segment(script_name))
}

fn script_ctx(script_name: &str) -> ErrorContext {
    ErrorContext::resource(format!("workers script '{script_name}'"))
}

fn part_error(e: &reqwest::Error) -> ProviderError {
    ProviderError::SerializationError {
        detail: format!("invalid multipart part: {e}"),
    }
}

impl CloudflareClient {
    pub async fn list_scripts(&self, account_id: &str) -> Result<AggregatedResult<WorkerScript>> {
        self.get_all_pages(
            &format!("/accounts/{account_id}/workers/scripts"),
            PAGE_SIZE_DEFAULT,
            &ErrorContext::resource(format!("workers scripts of account '{account_id}'")),
        )
        .await
    }

    pub async fn get_script_content(&self, account_id: &str, script_name: &str) -> Result<String> {
        let bytes = self
            .get_raw(&script_path(account_id, script_name), &script_ctx(script_name))
            .await?;
        String::from_utf8(bytes).map_err(|e| self.parse_error(format!("script is not UTF-8: {e}")))
    }

    pub async fn upload_script(
        &self,
        account_id: &str,
        script_name: &str,
        content: &str,
    ) -> Result<WorkerScript> {
        self.write(
            Method::PUT,
            &script_path(account_id, script_name),
            Body::Text {
                content_type: ScriptFormat::ServiceWorker.content_type(),
                text: content.to_string(),
            },
            &script_ctx(script_name),
        )
        .await
    }

    pub async fn delete_script(&self, account_id: &str, script_name: &str) -> Result<()> {
        self.write_unit(
            Method::DELETE,
            &script_path(account_id, script_name),
            Body::Empty,
            &script_ctx(script_name),
        )
        .await
    }

    pub async fn get_script_settings(
        &self,
        account_id: &str,
        script_name: &str,
    ) -> Result<ScriptSettings> {
        self.get(
            &format!("{}/settings", script_path(account_id, script_name)),
            &[],
            &script_ctx(script_name),
        )
        .await
    }

    /// 更新脚本绑定
    ///
    /// Cloudflare 没有局部更新 settings 的接口：先下载当前脚本，按内容判断
    /// Service Worker / ES Module 格式，再把脚本与新的 metadata 以 multipart
    /// 形式整体重新上传。
    pub async fn update_script_bindings(
        &self,
        account_id: &str,
        script_name: &str,
        bindings: &[ScriptBinding],
    ) -> Result<WorkerScript> {
        let body = self.get_script_content(account_id, script_name).await?;
        let source = extract_script_source(&body);
        // 空源码会覆盖线上脚本
        if source.trim().is_empty() {
            return Err(ProviderError::ParseError {
                detail: format!("script '{script_name}' download contained no source"),
            });
        }
        let format = ScriptFormat::detect(&source);
        log::debug!(
            "[cloudflare] Re-uploading script '{script_name}' as {format:?} with {} bindings",
            bindings.len()
        );

        let metadata = serde_json::to_string(&UploadMetadata::new(format, bindings)).map_err(
            |e| ProviderError::SerializationError {
                detail: e.to_string(),
            },
        )?;

        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata)
                    .mime_str("application/json")
                    .map_err(|e| part_error(&e))?,
            )
            .part(
                SCRIPT_PART_NAME,
                Part::text(source)
                    .file_name(SCRIPT_PART_NAME)
                    .mime_str(format.content_type())
                    .map_err(|e| part_error(&e))?,
            );

        self.write(
            Method::PUT,
            &script_path(account_id, script_name),
            Body::Multipart(form),
            &script_ctx(script_name),
        )
        .await
    }
}
