use async_trait::async_trait;
use serde_json::Value;

use crate::bindings::ScriptBinding;
use crate::error::{ProviderError, Result};
use crate::types::{
    Account, AggregatedResult, ApiMessage, D1Database, DnsRecord, DnsRecordPayload, KvKey,
    KvNamespace, Page, PagesDeployment, PagesProject, ScriptSettings, WorkerScript, Zone,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP 状态码
    pub status: u16,
    /// 信封中的全部错误
    pub errors: Vec<ApiMessage>,
}

impl RawApiError {
    pub fn new(status: u16, errors: Vec<ApiMessage>) -> Self {
        Self { status, errors }
    }

    /// 首个错误码，用于映射
    pub fn code(&self) -> Option<i64> {
        self.errors.first().map(|e| e.code)
    }

    /// 首个错误消息
    pub fn message(&self) -> Option<String> {
        self.errors.first().map(|e| e.message.clone())
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时描述被操作的资源
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 资源描述，例如 `kv key 'foo'`
    pub resource: Option<String>,
}

impl ErrorContext {
    pub fn resource(description: impl Into<String>) -> Self {
        Self {
            resource: Some(description.into()),
        }
    }

    pub fn describe(&self) -> String {
        self.resource
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回日志中使用的标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未识别的错误（fallback），保留完整错误列表
    fn upstream_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Upstream {
            status: raw.status,
            errors: raw.errors,
        }
    }
}

/// Cloudflare v4 API capabilities, one method per upstream operation.
///
/// Every `list_*` method returning [`AggregatedResult`] walks all upstream
/// pages sequentially before returning; a failing page aborts the listing and
/// the items gathered so far are dropped.
#[async_trait]
pub trait CloudflareApi: Send + Sync {
    // ---- Accounts ----

    /// 列出 Token 可访问的账号
    async fn list_accounts(&self) -> Result<AggregatedResult<Account>>;

    // ---- Workers ----

    async fn list_scripts(&self, account_id: &str) -> Result<AggregatedResult<WorkerScript>>;

    /// Downloads script source. The body is returned as text, undecoded.
    async fn get_script_content(&self, account_id: &str, script_name: &str) -> Result<String>;

    /// Creates or replaces a script with a plain `application/javascript` body.
    async fn upload_script(
        &self,
        account_id: &str,
        script_name: &str,
        content: &str,
    ) -> Result<WorkerScript>;

    async fn delete_script(&self, account_id: &str, script_name: &str) -> Result<()>;

    async fn get_script_settings(
        &self,
        account_id: &str,
        script_name: &str,
    ) -> Result<ScriptSettings>;

    /// Replaces the bindings of a script.
    ///
    /// The upstream has no partial settings update, so implementations
    /// re-upload the current script source together with the new bindings.
    async fn update_script_bindings(
        &self,
        account_id: &str,
        script_name: &str,
        bindings: &[ScriptBinding],
    ) -> Result<WorkerScript>;

    // ---- Workers KV ----

    async fn list_kv_namespaces(&self, account_id: &str) -> Result<AggregatedResult<KvNamespace>>;

    async fn create_kv_namespace(&self, account_id: &str, title: &str) -> Result<KvNamespace>;

    async fn delete_kv_namespace(&self, account_id: &str, namespace_id: &str) -> Result<()>;

    async fn list_kv_keys(
        &self,
        account_id: &str,
        namespace_id: &str,
        prefix: Option<&str>,
    ) -> Result<AggregatedResult<KvKey>>;

    /// Reads a value. The bytes are returned exactly as stored.
    async fn get_kv_value(&self, account_id: &str, namespace_id: &str, key: &str)
    -> Result<Vec<u8>>;

    async fn put_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
        value: &str,
        metadata: Option<&Value>,
    ) -> Result<()>;

    async fn delete_kv_value(&self, account_id: &str, namespace_id: &str, key: &str)
    -> Result<()>;

    // ---- D1 ----

    /// Lists one page of databases; paging is left to the caller.
    async fn list_d1_databases(
        &self,
        account_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<D1Database>>;

    // ---- DNS ----

    async fn list_zones(&self) -> Result<AggregatedResult<Zone>>;

    async fn list_dns_records(&self, zone_id: &str) -> Result<AggregatedResult<DnsRecord>>;

    async fn create_dns_record(&self, zone_id: &str, record: &DnsRecordPayload)
    -> Result<DnsRecord>;

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordPayload,
    ) -> Result<DnsRecord>;

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    // ---- Pages ----

    async fn list_pages_projects(&self, account_id: &str) -> Result<Vec<PagesProject>>;

    async fn list_pages_deployments(
        &self,
        account_id: &str,
        project_name: &str,
    ) -> Result<Vec<PagesDeployment>>;

    async fn create_pages_deployment(
        &self,
        account_id: &str,
        project_name: &str,
        body: &Value,
    ) -> Result<PagesDeployment>;
}
