//! 类型定义模块

mod bulk;
mod credential;
mod dns;
mod kv;
mod response;

pub use bulk::{BulkOutcome, ItemResult, ItemStatus};
pub use credential::{Credential, CredentialSummary, RegisterCredentialRequest};
pub use dns::{
    ExportFormat, RecordRequest, RecordType, ZoneExport, ZoneFileDownload, ZoneRecord,
    TTL_AUTOMATIC,
};
pub use kv::{KvEntry, KvValue, PutValueRequest};
pub use response::{ApiErrorBody, ApiResponse};

// Re-export provider 库的公共类型
pub use cf_manager_provider::{
    Account, AggregatedResult, D1Database, DnsRecord, DnsRecordPayload, KvKey, KvNamespace, Page,
    PagesDeployment, PagesProject, ScriptBinding, ScriptSettings, WorkerScript, Zone,
};
